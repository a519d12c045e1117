//! Session-long context usage tracking.
//!
//! The authoritative token count only shows up in the transcript, and only
//! after the assistant finishes a turn. Between those reconciliations the
//! tracker keeps a running estimate from the size of tool payloads so the
//! dashboard never shows a stale number:
//!
//! ```text
//! total = real_tokens (last reconciled) + estimated_delta (since then)
//! ```
//!
//! Reconciliation replaces `real_tokens` and the breakdown in one step and
//! discards the estimate. Every mutation appends a [`TokenSample`] so burn
//! rate and the sparkline history can be derived on demand.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use serde_json::Value;
use tracing::{debug, trace};

use super::health::{
    CRITICAL_PERCENT, ContextBreakdown, ContextHealth, HealthStatus, TokenSample,
};
use super::limits::context_limit;
use super::transcript::scan_transcript;
use crate::clock::{Clock, SystemClock};
use crate::event::{EventKind, HudEvent};

/// Characters per token used to estimate tool payload sizes.
pub const CHARS_PER_TOKEN: usize = 4;

/// History length that triggers truncation.
pub const MAX_HISTORY: usize = 100;
/// Samples kept after truncation.
pub const HISTORY_TRIM_TO: usize = 50;

/// Samples considered by the burn-rate window.
pub const BURN_RATE_WINDOW: usize = 10;
/// Shortest window span (minutes) that yields a burn rate.
pub const MIN_BURN_RATE_MINUTES: f64 = 0.1;

/// Samples exposed in [`ContextHealth::token_history`].
pub const SPARKLINE_SAMPLES: usize = 20;

/// Estimate tokens for a JSON payload from its serialized length.
pub fn estimate_tokens(payload: &Value) -> u64 {
    let len = serde_json::to_string(payload).map_or(0, |s| s.len());
    len.div_ceil(CHARS_PER_TOKEN) as u64
}

/// Tracks context window consumption for one assistant session.
///
/// Driven by session events ([`on_tool_use`](Self::on_tool_use),
/// [`on_session_stop`](Self::on_session_stop),
/// [`on_pre_compact`](Self::on_pre_compact), or
/// [`handle_event`](Self::handle_event)); read via
/// [`health`](Self::health).
///
/// ```
/// use claude_hud::context::ContextTracker;
/// use serde_json::json;
///
/// let mut tracker = ContextTracker::new();
/// tracker.on_tool_use(Some(&json!("123456")), None);
/// assert_eq!(tracker.total_tokens(), 2);
/// assert_eq!(tracker.health().breakdown.tool_inputs, 2);
/// ```
#[derive(Debug)]
pub struct ContextTracker<C: Clock = SystemClock> {
    clock: C,
    transcript_path: Option<PathBuf>,
    /// Modification time of the transcript at the last reconciliation.
    transcript_modified: Option<SystemTime>,
    model: Option<String>,
    real_tokens: u64,
    estimated_delta: u64,
    breakdown: ContextBreakdown,
    history: Vec<TokenSample>,
    session_start: i64,
    last_update: i64,
    compaction_count: u32,
}

impl ContextTracker<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for ContextTracker<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ContextTracker<C> {
    /// Create a tracker that reads time from `clock`.
    pub fn with_clock(clock: C) -> Self {
        let now = clock.now_ms();
        Self {
            clock,
            transcript_path: None,
            transcript_modified: None,
            model: None,
            real_tokens: 0,
            estimated_delta: 0,
            breakdown: ContextBreakdown::default(),
            history: Vec::new(),
            session_start: now,
            last_update: now,
            compaction_count: 0,
        }
    }

    // ── Event handlers ─────────────────────────────────────────────

    /// Dispatch a session event.
    ///
    /// A transcript path carried by the event replaces the stored one, but
    /// reconciliation only happens on `Stop`.
    pub fn handle_event(&mut self, event: &HudEvent) {
        self.last_update = self.clock.now_ms();

        if let Some(path) = event.transcript_path.as_deref()
            && self.transcript_path.as_deref() != Some(Path::new(path))
        {
            debug!("Transcript path set to {path}");
            self.transcript_path = Some(PathBuf::from(path));
        }

        match event.event {
            EventKind::PostToolUse => {
                self.on_tool_use(event.input.as_ref(), event.response.as_ref());
            }
            EventKind::Stop => {
                self.on_session_stop();
            }
            EventKind::PreCompact => self.on_pre_compact(),
            _ => {}
        }
    }

    /// Add the estimated size of a tool call's input and response.
    pub fn on_tool_use(&mut self, input: Option<&Value>, response: Option<&Value>) {
        self.last_update = self.clock.now_ms();

        if let Some(input) = input {
            let tokens = estimate_tokens(input);
            self.estimated_delta += tokens;
            self.breakdown.tool_inputs += tokens;
        }
        if let Some(response) = response {
            let tokens = estimate_tokens(response);
            self.estimated_delta += tokens;
            self.breakdown.tool_outputs += tokens;
        }
        trace!(
            "Estimated context: {} real + {} delta",
            self.real_tokens, self.estimated_delta
        );
        self.record_sample();
    }

    /// Reconcile against the transcript at the end of a turn.
    ///
    /// Returns `true` when the totals were replaced. Missing files,
    /// unchanged files and transcripts without usage all leave the state
    /// as it was.
    pub fn on_session_stop(&mut self) -> bool {
        self.last_update = self.clock.now_ms();
        self.reconcile()
    }

    /// Count a compaction. Totals are left for the next reconciliation.
    pub fn on_pre_compact(&mut self) {
        self.last_update = self.clock.now_ms();
        self.compaction_count += 1;
        debug!("Compaction #{} announced", self.compaction_count);
    }

    /// Point the tracker at a transcript, reconciling immediately when the
    /// path changed.
    pub fn set_transcript_path(&mut self, path: impl Into<PathBuf>) -> bool {
        let path = path.into();
        if self.transcript_path.as_ref() == Some(&path) {
            return false;
        }
        self.transcript_path = Some(path);
        self.reconcile()
    }

    /// Clear all counters and history and restart the session clock.
    pub fn reset(&mut self) {
        let now = self.clock.now_ms();
        self.real_tokens = 0;
        self.estimated_delta = 0;
        self.breakdown = ContextBreakdown::default();
        self.history.clear();
        self.session_start = now;
        self.last_update = now;
        self.compaction_count = 0;
        self.transcript_modified = None;
    }

    fn reconcile(&mut self) -> bool {
        let Some(path) = self.transcript_path.clone() else {
            return false;
        };

        let modified = match std::fs::metadata(&path).and_then(|m| m.modified()) {
            Ok(m) => m,
            Err(e) => {
                debug!("Transcript {} unavailable: {e}", path.display());
                return false;
            }
        };
        if self.transcript_modified == Some(modified) {
            trace!("Transcript unchanged since last reconciliation");
            return false;
        }

        let content = match std::fs::read_to_string(&path) {
            Ok(c) => c,
            Err(e) => {
                debug!("Failed to read transcript {}: {e}", path.display());
                return false;
            }
        };

        let scan = scan_transcript(&content);
        if scan.malformed_lines > 0 {
            debug!("Skipped {} malformed transcript lines", scan.malformed_lines);
        }

        let Some(usage) = scan.usage.filter(|u| u.total() > 0) else {
            trace!("Transcript has no usage yet");
            return false;
        };

        self.real_tokens = usage.total();
        self.estimated_delta = 0;
        self.breakdown = ContextBreakdown {
            tool_inputs: usage.input_tokens,
            tool_outputs: usage.output_tokens,
            messages: usage.cache_tokens(),
            other: 0,
        };
        if scan.model.is_some() {
            self.model = scan.model;
        }
        self.transcript_modified = Some(modified);
        self.record_sample();

        debug!(
            "Reconciled context to {} tokens (model: {})",
            self.real_tokens,
            self.model.as_deref().unwrap_or("unknown")
        );
        true
    }

    fn record_sample(&mut self) {
        self.push_sample(TokenSample {
            tokens: self.total_tokens(),
            timestamp_ms: self.clock.now_ms(),
        });
    }

    /// Append a history sample, truncating to the most recent
    /// [`HISTORY_TRIM_TO`] once [`MAX_HISTORY`] is exceeded.
    pub fn push_sample(&mut self, sample: TokenSample) {
        self.history.push(sample);
        if self.history.len() > MAX_HISTORY {
            let drop = self.history.len() - HISTORY_TRIM_TO;
            self.history.drain(..drop);
        }
    }

    // ── Derived queries ────────────────────────────────────────────

    /// Reconciled total plus the unreconciled estimate.
    pub fn total_tokens(&self) -> u64 {
        self.real_tokens + self.estimated_delta
    }

    /// Context ceiling for the current model.
    pub fn max_tokens(&self) -> u64 {
        context_limit(self.model.as_deref())
    }

    /// Usage as a whole percentage, capped at 100.
    pub fn percent(&self) -> u8 {
        let max = self.max_tokens();
        if max == 0 {
            return 100;
        }
        (100.0 * self.total_tokens() as f64 / max as f64)
            .round()
            .min(100.0) as u8
    }

    pub fn remaining(&self) -> u64 {
        self.max_tokens().saturating_sub(self.total_tokens())
    }

    /// Tokens per minute across the trailing [`BURN_RATE_WINDOW`] samples.
    pub fn burn_rate(&self) -> i64 {
        if self.history.len() < 2 {
            return 0;
        }
        let window = &self.history[self.history.len().saturating_sub(BURN_RATE_WINDOW)..];
        let (Some(first), Some(last)) = (window.first(), window.last()) else {
            return 0;
        };

        let minutes = (last.timestamp_ms - first.timestamp_ms) as f64 / 60_000.0;
        if minutes < MIN_BURN_RATE_MINUTES {
            return 0;
        }
        let delta = last.tokens as f64 - first.tokens as f64;
        (delta / minutes).round() as i64
    }

    pub fn status(&self) -> HealthStatus {
        HealthStatus::from_percent(self.percent())
    }

    pub fn should_compact(&self) -> bool {
        self.percent() >= CRITICAL_PERCENT
    }

    /// Token counts of the last [`SPARKLINE_SAMPLES`] samples.
    pub fn token_history(&self) -> Vec<u64> {
        let start = self.history.len().saturating_sub(SPARKLINE_SAMPLES);
        self.history[start..].iter().map(|s| s.tokens).collect()
    }

    /// Full sample buffer, oldest first.
    pub fn history(&self) -> &[TokenSample] {
        &self.history
    }

    pub fn breakdown(&self) -> ContextBreakdown {
        self.breakdown
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn compaction_count(&self) -> u32 {
        self.compaction_count
    }

    pub fn transcript_path(&self) -> Option<&Path> {
        self.transcript_path.as_deref()
    }

    pub fn session_start(&self) -> i64 {
        self.session_start
    }

    /// Snapshot every derived metric.
    pub fn health(&self) -> ContextHealth {
        let percent = self.percent();
        ContextHealth {
            tokens: self.total_tokens(),
            percent,
            remaining: self.remaining(),
            max_tokens: self.max_tokens(),
            burn_rate: self.burn_rate(),
            status: HealthStatus::from_percent(percent),
            should_compact: percent >= CRITICAL_PERCENT,
            breakdown: self.breakdown,
            token_history: self.token_history(),
            session_start: self.session_start,
            last_update: self.last_update,
        }
    }
}
