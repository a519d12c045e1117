//! Convenience re-exports for common `claude-hud` types.
//!
//! ```
//! use claude_hud::prelude::*;
//! ```
//!
//! Covers what a dashboard driver needs: the tracker, activity, readers,
//! config and the renderer. Color helpers, icon tables and the formatting
//! functions stay in their modules.

// ── Time and caching ────────────────────────────────────────────────
pub use crate::cache::TtlCache;
pub use crate::clock::{Clock, ManualClock, SystemClock};

// ── Text and layout ─────────────────────────────────────────────────
pub use crate::ansi::{TruncatePosition, strip_escapes, truncate, truncate_to_width, visible_width};
pub use crate::layout::{LayoutConstraints, LayoutEngine, LayoutMode, Line, Segment};

// ── Session state ───────────────────────────────────────────────────
pub use crate::activity::SessionActivity;
pub use crate::context::{ContextHealth, ContextTracker, HealthStatus, context_limit};
pub use crate::event::{EventKind, HudEvent};
pub use crate::session::HudSession;
pub use crate::sources::{ConfigCounts, SessionSources, TokenStats};

// ── Config and rendering ────────────────────────────────────────────
pub use crate::config::{CompactMode, ConfigCache, HudConfig};
pub use crate::render::{RenderContext, compose_box, render};
