//! Aggregated usage statistics (`~/.claude/stats-cache.json`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::SOURCE_TTL_MS;
use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatsCache {
    daily_activity: Vec<DailyActivity>,
    daily_model_tokens: Vec<DailyModelTokens>,
    model_usage: BTreeMap<String, ModelUsage>,
    total_sessions: u64,
    total_messages: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DailyActivity {
    date: String,
    message_count: u64,
    session_count: u64,
    tool_call_count: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DailyModelTokens {
    date: String,
    tokens_by_model: BTreeMap<String, u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ModelUsage {
    input_tokens: u64,
    output_tokens: u64,
    cache_read_input_tokens: u64,
    cache_creation_input_tokens: u64,
}

/// Lifetime and same-day token statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TokenStats {
    pub input_tokens: u64,
    pub output_tokens: u64,
    pub cache_read_tokens: u64,
    pub cache_creation_tokens: u64,
    /// Input plus output across all models.
    pub total_tokens: u64,
    pub today_tokens: u64,
    pub today_messages: u64,
    pub today_sessions: u64,
    pub today_tool_calls: u64,
    pub total_sessions: u64,
    pub total_messages: u64,
}

/// Read the stats cache and aggregate it for `today` (a UTC calendar day).
pub fn read_stats(path: &Path, today: NaiveDate) -> Option<TokenStats> {
    let content = std::fs::read_to_string(path).ok()?;
    let cache: StatsCache = match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            debug!("Ignoring malformed stats cache {}: {e}", path.display());
            return None;
        }
    };

    let mut stats = TokenStats {
        total_sessions: cache.total_sessions,
        total_messages: cache.total_messages,
        ..TokenStats::default()
    };
    for usage in cache.model_usage.values() {
        stats.input_tokens += usage.input_tokens;
        stats.output_tokens += usage.output_tokens;
        stats.cache_read_tokens += usage.cache_read_input_tokens;
        stats.cache_creation_tokens += usage.cache_creation_input_tokens;
    }
    stats.total_tokens = stats.input_tokens + stats.output_tokens;

    let today = today.format("%Y-%m-%d").to_string();
    if let Some(activity) = cache.daily_activity.iter().find(|d| d.date == today) {
        stats.today_messages = activity.message_count;
        stats.today_sessions = activity.session_count;
        stats.today_tool_calls = activity.tool_call_count;
    }
    if let Some(tokens) = cache.daily_model_tokens.iter().find(|d| d.date == today) {
        stats.today_tokens = tokens.tokens_by_model.values().sum();
    }

    Some(stats)
}

/// TTL-cached [`read_stats`]. "Today" is derived from the reader's clock.
#[derive(Debug)]
pub struct StatsReader<C: Clock = SystemClock> {
    path: PathBuf,
    cache: TtlCache<Option<TokenStats>>,
    clock: C,
}

impl StatsReader<SystemClock> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> StatsReader<C> {
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            path: path.into(),
            cache: TtlCache::new(SOURCE_TTL_MS),
            clock,
        }
    }

    fn load(path: &Path, now_ms: i64) -> Option<TokenStats> {
        let today = DateTime::from_timestamp_millis(now_ms)?.date_naive();
        read_stats(path, today)
    }

    pub fn read(&mut self) -> Option<&TokenStats> {
        let now = self.clock.now_ms();
        let path = &self.path;
        self.cache
            .get_or_refresh(now, || Self::load(path, now))
            .as_ref()
    }

    pub fn force_refresh(&mut self) -> Option<&TokenStats> {
        let now = self.clock.now_ms();
        let stats = Self::load(&self.path, now);
        self.cache.store(now, stats).as_ref()
    }
}
