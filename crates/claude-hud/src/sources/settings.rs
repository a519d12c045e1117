//! Summary of the assistant's user settings (`~/.claude/settings.json`).

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::SOURCE_TTL_MS;
use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawSettings {
    model: Option<String>,
    enabled_plugins: BTreeMap<String, Value>,
    mcp_servers: BTreeMap<String, Value>,
    hooks: BTreeMap<String, Value>,
}

/// What the dashboard needs from the settings file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsData {
    /// Configured model, or `"unknown"`.
    pub model: String,
    /// Enabled plugins, without their `@marketplace` suffix.
    pub plugin_names: Vec<String>,
    pub mcp_names: Vec<String>,
    /// Hook commands across all events and matchers.
    pub hooks_count: usize,
}

impl SettingsData {
    pub fn plugin_count(&self) -> usize {
        self.plugin_names.len()
    }

    pub fn mcp_count(&self) -> usize {
        self.mcp_names.len()
    }
}

/// Count hook commands. Matchers with a `hooks` array contribute its length;
/// any other matcher entry counts once.
fn count_hooks(hooks: &BTreeMap<String, Value>) -> usize {
    hooks
        .values()
        .filter_map(Value::as_array)
        .flatten()
        .map(|matcher| {
            matcher
                .get("hooks")
                .and_then(Value::as_array)
                .map_or(1, Vec::len)
        })
        .sum()
}

/// Read and summarize a settings file. Missing or malformed files yield
/// `None`.
pub fn read_settings(path: &Path) -> Option<SettingsData> {
    let content = std::fs::read_to_string(path).ok()?;
    let raw: RawSettings = match serde_json::from_str(&content) {
        Ok(raw) => raw,
        Err(e) => {
            debug!("Ignoring malformed settings {}: {e}", path.display());
            return None;
        }
    };

    let plugin_names = raw
        .enabled_plugins
        .iter()
        .filter(|(_, enabled)| enabled.as_bool() == Some(true))
        .map(|(name, _)| name.split('@').next().unwrap_or(name).to_string())
        .collect();

    Some(SettingsData {
        model: raw
            .model
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "unknown".to_string()),
        plugin_names,
        mcp_names: raw.mcp_servers.into_keys().collect(),
        hooks_count: count_hooks(&raw.hooks),
    })
}

/// TTL-cached [`read_settings`].
#[derive(Debug)]
pub struct SettingsReader<C: Clock = SystemClock> {
    path: PathBuf,
    cache: TtlCache<Option<SettingsData>>,
    clock: C,
}

impl SettingsReader<SystemClock> {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, SystemClock)
    }
}

impl<C: Clock> SettingsReader<C> {
    pub fn with_clock(path: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            path: path.into(),
            cache: TtlCache::new(SOURCE_TTL_MS),
            clock,
        }
    }

    pub fn read(&mut self) -> Option<&SettingsData> {
        let path = &self.path;
        self.cache
            .get_or_refresh(self.clock.now_ms(), || read_settings(path))
            .as_ref()
    }

    /// Re-read now, regardless of the cache window.
    pub fn force_refresh(&mut self) -> Option<&SettingsData> {
        let data = read_settings(&self.path);
        self.cache.store(self.clock.now_ms(), data).as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;

    const SETTINGS: &str = r#"{
        "model": "opus",
        "enabledPlugins": {"linter@official": true, "formatter@community": false, "notes": true},
        "mcpServers": {"github": {"type": "http", "url": "https://example.invalid"}, "fs": {}},
        "permissions": {"allow": ["Bash(cargo test:*)", "Read"]},
        "hooks": {
            "PostToolUse": [{"matcher": "*", "hooks": [{"type": "command"}, {"type": "command"}]}],
            "Stop": [{"matcher": "*"}]
        }
    }"#;

    #[test]
    fn summarizes_settings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, SETTINGS).unwrap();

        let data = read_settings(&path).unwrap();
        assert_eq!(data.model, "opus");
        assert_eq!(data.plugin_names, vec!["linter", "notes"]);
        assert_eq!(data.mcp_names, vec!["fs", "github"]);
        assert_eq!(data.mcp_count(), 2);
        assert_eq!(data.plugin_count(), 2);
        assert_eq!(data.hooks_count, 3);
    }

    #[test]
    fn empty_object_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{}").unwrap();

        let data = read_settings(&path).unwrap();
        assert_eq!(data.model, "unknown");
        assert_eq!(data.plugin_count(), 0);
        assert_eq!(data.hooks_count, 0);
    }

    #[test]
    fn missing_or_malformed_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        assert!(read_settings(&path).is_none());
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(read_settings(&path).is_none());
    }

    #[test]
    fn reader_caches_for_thirty_seconds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let clock = ManualClock::new(0);
        let mut reader = SettingsReader::with_clock(&path, &clock);

        // Absence is cached like any other result.
        assert!(reader.read().is_none());
        std::fs::write(&path, SETTINGS).unwrap();
        clock.advance(29_999);
        assert!(reader.read().is_none());

        clock.advance(1);
        assert_eq!(reader.read().map(|d| d.model.as_str()), Some("opus"));

        std::fs::write(&path, r#"{"model": "sonnet"}"#).unwrap();
        assert_eq!(reader.read().map(|d| d.model.as_str()), Some("opus"));
        assert_eq!(
            reader.force_refresh().map(|d| d.model.as_str()),
            Some("sonnet")
        );
    }
}
