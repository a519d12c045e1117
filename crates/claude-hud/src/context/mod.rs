//! Context window tracking: estimates, reconciliation, and health.
//!
//! The context window is the scarcest resource in an assistant session. This
//! module keeps a continuously fresh view of it:
//!
//! 1. **[`tracker`]**: [`ContextTracker`] adds a cheap size estimate for every
//!    tool call and replaces it with the transcript's authoritative count at
//!    the end of each turn.
//!
//! 2. **[`transcript`]**: extracts the latest usage counters and model
//!    identifier from the NDJSON transcript, skipping malformed lines.
//!
//! 3. **[`limits`]**: per-model context ceilings.
//!
//! 4. **[`health`]**: the read-only [`ContextHealth`] snapshot consumed by
//!    the context line of the dashboard.

pub mod health;
pub mod limits;
pub mod tracker;
pub mod transcript;

// Re-export commonly used items at the module level.
pub use health::{ContextBreakdown, ContextHealth, HealthStatus, TokenSample};
pub use limits::{DEFAULT_CONTEXT_LIMIT, context_limit};
pub use tracker::{CHARS_PER_TOKEN, ContextTracker, estimate_tokens};
pub use transcript::{TranscriptScan, TranscriptUsage, scan_transcript};
