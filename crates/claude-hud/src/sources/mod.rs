//! File-backed readers for the assistant's own state.
//!
//! Each reader owns a [`TtlCache`](crate::cache::TtlCache) and a clock, and
//! re-reads its file at most every [`SOURCE_TTL_MS`] unless asked to
//! `force_refresh`. Missing or malformed files are reported as `None` (or an
//! empty result) and cached like any other value.

pub mod context_files;
pub mod settings;
pub mod stats;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::paths::{SETTINGS_FILE, STATS_FILE};

pub use context_files::{ContextDetector, ContextFiles, detect_context_files};
pub use settings::{SettingsData, SettingsReader, read_settings};
pub use stats::{StatsReader, TokenStats, read_stats};

/// Refresh window shared by the settings, stats and context-file readers.
pub const SOURCE_TTL_MS: i64 = 30_000;

/// Configuration counts shown on the session line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConfigCounts {
    pub claude_md_count: usize,
    pub rules_count: usize,
    pub mcp_count: usize,
    pub hooks_count: usize,
    pub plugin_count: usize,
}

/// All three readers over one `.claude` directory.
#[derive(Debug)]
pub struct SessionSources<C: Clock + Copy = SystemClock> {
    pub settings: SettingsReader<C>,
    pub stats: StatsReader<C>,
    pub context: ContextDetector<C>,
}

impl SessionSources<SystemClock> {
    pub fn new(claude_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(claude_dir, SystemClock)
    }
}

impl<C: Clock + Copy> SessionSources<C> {
    pub fn with_clock(claude_dir: impl Into<PathBuf>, clock: C) -> Self {
        let dir: PathBuf = claude_dir.into();
        Self {
            settings: SettingsReader::with_clock(dir.join(SETTINGS_FILE), clock),
            stats: StatsReader::with_clock(dir.join(STATS_FILE), clock),
            context: ContextDetector::with_clock(dir, clock),
        }
    }

    /// Current counts for a working directory.
    pub fn config_counts(&mut self, cwd: Option<&Path>) -> ConfigCounts {
        let files = self.context.detect(cwd).clone();
        let settings = self.settings.read();
        ConfigCounts {
            claude_md_count: files.claude_md_count(),
            rules_count: files.project_settings_rules,
            mcp_count: settings.map_or(0, SettingsData::mcp_count),
            hooks_count: settings.map_or(0, |s| s.hooks_count),
            plugin_count: settings.map_or(0, SettingsData::plugin_count),
        }
    }

    pub fn stats(&mut self) -> Option<TokenStats> {
        self.stats.read().copied()
    }
}
