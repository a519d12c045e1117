//! Read-only context health snapshot and its component types.

use serde::{Deserialize, Serialize};

/// Usage percentage at which the context is critical and should be compacted.
pub const CRITICAL_PERCENT: u8 = 85;

/// Usage percentage at which the context enters the warning band.
pub const WARNING_PERCENT: u8 = 70;

/// One point of the token-usage history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenSample {
    pub tokens: u64,
    pub timestamp_ms: i64,
}

/// Disjoint token categories whose sum approximates total usage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextBreakdown {
    pub tool_outputs: u64,
    pub tool_inputs: u64,
    pub messages: u64,
    pub other: u64,
}

impl ContextBreakdown {
    pub fn total(&self) -> u64 {
        self.tool_outputs + self.tool_inputs + self.messages + self.other
    }

    /// Share of `part` in the tool/message total, as a whole percentage.
    pub fn share(&self, part: u64) -> u8 {
        let total = self.tool_outputs + self.tool_inputs + self.messages;
        if total == 0 {
            return 0;
        }
        ((part as f64 / total as f64) * 100.0).round().min(100.0) as u8
    }
}

/// Health band of the context window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    #[default]
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    pub fn from_percent(percent: u8) -> Self {
        if percent >= CRITICAL_PERCENT {
            Self::Critical
        } else if percent >= WARNING_PERCENT {
            Self::Warning
        } else {
            Self::Healthy
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "healthy",
            Self::Warning => "warning",
            Self::Critical => "critical",
        }
    }
}

impl std::fmt::Display for HealthStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Derived view of the tracker at one instant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContextHealth {
    /// Current total (reconciled plus estimated).
    pub tokens: u64,
    /// Usage of the model's ceiling, 0 to 100.
    pub percent: u8,
    pub remaining: u64,
    pub max_tokens: u64,
    /// Tokens per minute over the trailing sample window. Negative after a
    /// reconciliation lowers the total.
    pub burn_rate: i64,
    pub status: HealthStatus,
    pub should_compact: bool,
    pub breakdown: ContextBreakdown,
    /// Token counts of the most recent samples, oldest first.
    pub token_history: Vec<u64>,
    pub session_start: i64,
    pub last_update: i64,
}

impl ContextHealth {
    /// Format as a short log-friendly string.
    pub fn to_log_string(&self) -> String {
        format!(
            "context: {} tokens ({}% of {}, {}, {}/min)",
            self.tokens, self.percent, self.max_tokens, self.status, self.burn_rate
        )
    }
}
