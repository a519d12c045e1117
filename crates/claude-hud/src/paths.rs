//! Locations of the assistant's per-user files.
//!
//! Every reader takes its directory explicitly; these helpers only supply the
//! defaults under `$HOME/.claude`.

use std::path::PathBuf;

/// Per-user configuration directory name under `$HOME`.
pub const CLAUDE_DIR: &str = ".claude";

/// HUD settings file inside [`CLAUDE_DIR`].
pub const CONFIG_FILE: &str = "claude-hud.json";
/// Assistant settings file inside [`CLAUDE_DIR`].
pub const SETTINGS_FILE: &str = "settings.json";
/// Aggregated usage statistics inside [`CLAUDE_DIR`].
pub const STATS_FILE: &str = "stats-cache.json";
/// Instruction file name, both global and per project.
pub const CLAUDE_MD: &str = "CLAUDE.md";

/// Get the user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .filter(|h| !h.is_empty())
        .map(PathBuf::from)
}

/// `$HOME/.claude`, when `HOME` is set.
pub fn claude_dir() -> Option<PathBuf> {
    home_dir().map(|h| h.join(CLAUDE_DIR))
}

/// Default HUD config path.
pub fn config_path() -> Option<PathBuf> {
    claude_dir().map(|d| d.join(CONFIG_FILE))
}

/// Expand a leading `~` to the home directory. Paths without one, or with no
/// known home, are returned as given.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix('~')
        && let Some(home) = home_dir()
    {
        return home.join(rest.trim_start_matches(['/', '\\']));
    }
    PathBuf::from(path)
}
