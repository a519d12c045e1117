//! HUD display settings.
//!
//! Stored as JSON at `$HOME/.claude/claude-hud.json`. Any subset of keys may
//! be present; missing keys take their defaults. When no file exists the icon
//! and color modes are detected from the environment instead.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};
use crate::layout::LayoutMode;
use crate::render::gradient::ColorMode;
use crate::render::icons::IconMode;
use crate::render::spinner::SpinnerStyle;

/// How long a loaded config is served before the file is read again.
pub const CONFIG_TTL_MS: i64 = 5_000;

/// Whether the dashboard uses its compact presentation.
///
/// Serialized as `"auto"`, `true` or `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "CompactRepr", into = "CompactRepr")]
pub enum CompactMode {
    /// Compact below the standard layout width.
    #[default]
    Auto,
    On,
    Off,
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum CompactRepr {
    Flag(bool),
    Named(String),
}

impl TryFrom<CompactRepr> for CompactMode {
    type Error = String;

    fn try_from(repr: CompactRepr) -> Result<Self, Self::Error> {
        match repr {
            CompactRepr::Flag(true) => Ok(Self::On),
            CompactRepr::Flag(false) => Ok(Self::Off),
            CompactRepr::Named(s) => CompactMode::parse(&s)
                .ok_or_else(|| format!("invalid compact mode '{s}' (expected auto, true or false)")),
        }
    }
}

impl From<CompactMode> for CompactRepr {
    fn from(mode: CompactMode) -> Self {
        match mode {
            CompactMode::Auto => Self::Named("auto".to_string()),
            CompactMode::On => Self::Flag(true),
            CompactMode::Off => Self::Flag(false),
        }
    }
}

impl CompactMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "auto" => Some(Self::Auto),
            "true" | "on" => Some(Self::On),
            "false" | "off" => Some(Self::Off),
            _ => None,
        }
    }
}

/// Display settings for the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HudConfig {
    pub icon_mode: IconMode,
    pub color_mode: ColorMode,
    pub animations_enabled: bool,
    pub spinner_style: SpinnerStyle,
    pub compact_mode: CompactMode,
    pub show_claude_md_count: bool,
    pub show_rules_count: bool,
    pub show_mcp_count: bool,
    pub show_hooks_count: bool,
    pub show_plugin_count: bool,
    pub show_session_duration: bool,
}

impl Default for HudConfig {
    fn default() -> Self {
        Self {
            icon_mode: IconMode::Unicode,
            color_mode: ColorMode::Ansi256,
            animations_enabled: true,
            spinner_style: SpinnerStyle::Braille,
            compact_mode: CompactMode::Auto,
            show_claude_md_count: true,
            show_rules_count: true,
            show_mcp_count: true,
            show_hooks_count: true,
            show_plugin_count: true,
            show_session_duration: true,
        }
    }
}

impl HudConfig {
    /// Defaults with icon and color modes detected via `env`.
    pub fn detected(env: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            icon_mode: IconMode::detect_from(&env),
            color_mode: ColorMode::detect_from(&env),
            ..Self::default()
        }
    }

    /// Load from the default location using the process environment.
    pub fn load() -> Self {
        match crate::paths::config_path() {
            Some(path) => Self::load_from(&path, |key| std::env::var(key).ok()),
            None => Self::detected(|key| std::env::var(key).ok()),
        }
    }

    /// Load from `path`, merging the file over the defaults.
    ///
    /// A missing or unparseable file yields environment-detected defaults.
    pub fn load_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Self {
        if path.exists() {
            match Self::read_file(path) {
                Ok(config) => {
                    debug!("Loaded HUD config from {}", path.display());
                    return config;
                }
                Err(e) => warn!("{e}; using defaults"),
            }
        }
        Self::detected(env)
    }

    fn read_file(path: &Path) -> Result<Self, String> {
        let data = std::fs::read_to_string(path)
            .map_err(|e| format!("failed to read config {}: {e}", path.display()))?;
        serde_json::from_str(&data)
            .map_err(|e| format!("failed to parse config {}: {e}", path.display()))
    }

    /// Write the config as pretty JSON, creating the parent directory.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        if let Some(dir) = path.parent()
            && !dir.as_os_str().is_empty()
        {
            std::fs::create_dir_all(dir)
                .map_err(|e| format!("failed to create {}: {e}", dir.display()))?;
        }
        let data = serde_json::to_string_pretty(self)
            .map_err(|e| format!("failed to serialize config: {e}"))?;
        std::fs::write(path, data).map_err(|e| format!("failed to write config: {e}"))?;
        debug!("Saved HUD config to {}", path.display());
        Ok(())
    }

    /// Set one key by its JSON name (`iconMode`, `showMcpCount`, ...).
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        fn flag(key: &str, value: &str) -> Result<bool, String> {
            value
                .parse::<bool>()
                .map_err(|_| format!("{key} expects true or false, got '{value}'"))
        }

        match key {
            "iconMode" => {
                self.icon_mode = IconMode::parse(value)
                    .ok_or_else(|| format!("invalid iconMode '{value}' (nerd, unicode, ascii)"))?;
            }
            "colorMode" => {
                self.color_mode = ColorMode::parse(value)
                    .ok_or_else(|| format!("invalid colorMode '{value}' (basic, 256, truecolor)"))?;
            }
            "spinnerStyle" => {
                self.spinner_style = SpinnerStyle::parse(value).ok_or_else(|| {
                    format!("invalid spinnerStyle '{value}' (braille, block, ascii, dots)")
                })?;
            }
            "compactMode" => {
                self.compact_mode = CompactMode::parse(value)
                    .ok_or_else(|| format!("invalid compactMode '{value}' (auto, true, false)"))?;
            }
            "animationsEnabled" => self.animations_enabled = flag(key, value)?,
            "showClaudeMdCount" => self.show_claude_md_count = flag(key, value)?,
            "showRulesCount" => self.show_rules_count = flag(key, value)?,
            "showMcpCount" => self.show_mcp_count = flag(key, value)?,
            "showHooksCount" => self.show_hooks_count = flag(key, value)?,
            "showPluginCount" => self.show_plugin_count = flag(key, value)?,
            "showSessionDuration" => self.show_session_duration = flag(key, value)?,
            _ => return Err(format!("unknown config key '{key}'")),
        }
        Ok(())
    }

    /// Apply `key=value` assignments in order.
    pub fn with_overrides<'a>(
        mut self,
        assignments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Self, String> {
        for assignment in assignments {
            let (key, value) = assignment
                .split_once('=')
                .ok_or_else(|| format!("expected key=value, got '{assignment}'"))?;
            self.set(key.trim(), value.trim())?;
        }
        Ok(self)
    }

    /// Load the file at `path`, apply the assignments and write it back.
    pub fn update_file<'a>(
        path: &Path,
        assignments: impl IntoIterator<Item = &'a str>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, String> {
        let merged = Self::load_from(path, env).with_overrides(assignments)?;
        merged.save(path)?;
        Ok(merged)
    }

    /// Effective compact flag for a terminal width.
    pub fn is_compact_mode(&self, terminal_width: usize) -> bool {
        match self.compact_mode {
            CompactMode::Auto => LayoutMode::from_width(terminal_width).is_compact(),
            CompactMode::On => true,
            CompactMode::Off => false,
        }
    }
}

/// Serves a [`HudConfig`] and re-reads its file at most every
/// [`CONFIG_TTL_MS`].
#[derive(Debug)]
pub struct ConfigCache<C: Clock = SystemClock> {
    path: Option<PathBuf>,
    cache: TtlCache<HudConfig>,
    clock: C,
}

impl ConfigCache<SystemClock> {
    /// Cache over the default config path.
    pub fn new() -> Self {
        Self::with_clock(crate::paths::config_path(), SystemClock)
    }
}

impl Default for ConfigCache<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> ConfigCache<C> {
    pub fn with_clock(path: Option<PathBuf>, clock: C) -> Self {
        Self {
            path,
            cache: TtlCache::new(CONFIG_TTL_MS),
            clock,
        }
    }

    pub fn get(&mut self) -> &HudConfig {
        let now = self.clock.now_ms();
        let path = self.path.as_deref();
        self.cache.get_or_refresh(now, || match path {
            Some(p) => HudConfig::load_from(p, |key| std::env::var(key).ok()),
            None => HudConfig::detected(|key| std::env::var(key).ok()),
        })
    }

    /// Forget the cached config.
    pub fn reset(&mut self) {
        self.cache.invalidate();
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}
