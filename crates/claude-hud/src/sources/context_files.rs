//! Detection of instruction and settings files that feed the session context.
//!
//! Checks, in order:
//! 1. `{claude_dir}/CLAUDE.md` (user-global)
//! 2. `{cwd}/.claude/CLAUDE.md`, then `{cwd}/CLAUDE.md` (first found wins)
//! 3. `{cwd}/.claude/settings.json` and its `permissions.allow` rule count

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::trace;

use super::SOURCE_TTL_MS;
use crate::cache::TtlCache;
use crate::clock::{Clock, SystemClock};
use crate::paths::{CLAUDE_DIR, CLAUDE_MD, SETTINGS_FILE};

/// Context files present for a working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContextFiles {
    pub global_claude_md: bool,
    /// The project instruction file in use, if any.
    pub project_claude_md: Option<PathBuf>,
    pub project_settings: bool,
    /// Allowed-permission rules in the project settings.
    pub project_settings_rules: usize,
}

impl ContextFiles {
    /// Number of CLAUDE.md files in effect.
    pub fn claude_md_count(&self) -> usize {
        usize::from(self.global_claude_md) + usize::from(self.project_claude_md.is_some())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ProjectSettings {
    permissions: Permissions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Permissions {
    allow: Vec<serde_json::Value>,
}

/// Inspect `claude_dir` and, when given, the project at `cwd`.
pub fn detect_context_files(claude_dir: &Path, cwd: Option<&Path>) -> ContextFiles {
    let mut files = ContextFiles {
        global_claude_md: claude_dir.join(CLAUDE_MD).is_file(),
        ..ContextFiles::default()
    };

    let Some(cwd) = cwd else {
        return files;
    };

    files.project_claude_md = [cwd.join(CLAUDE_DIR).join(CLAUDE_MD), cwd.join(CLAUDE_MD)]
        .into_iter()
        .find(|p| p.is_file());

    let settings_path = cwd.join(CLAUDE_DIR).join(SETTINGS_FILE);
    if settings_path.is_file() {
        files.project_settings = true;
        match std::fs::read_to_string(&settings_path)
            .ok()
            .and_then(|c| serde_json::from_str::<ProjectSettings>(&c).ok())
        {
            Some(settings) => files.project_settings_rules = settings.permissions.allow.len(),
            None => trace!("Unreadable project settings {}", settings_path.display()),
        }
    }

    files
}

/// TTL-cached [`detect_context_files`] that also refreshes whenever the
/// working directory changes.
#[derive(Debug)]
pub struct ContextDetector<C: Clock = SystemClock> {
    claude_dir: PathBuf,
    last_cwd: Option<PathBuf>,
    cache: TtlCache<ContextFiles>,
    clock: C,
}

impl ContextDetector<SystemClock> {
    pub fn new(claude_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(claude_dir, SystemClock)
    }
}

impl<C: Clock> ContextDetector<C> {
    pub fn with_clock(claude_dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            claude_dir: claude_dir.into(),
            last_cwd: None,
            cache: TtlCache::new(SOURCE_TTL_MS),
            clock,
        }
    }

    pub fn detect(&mut self, cwd: Option<&Path>) -> &ContextFiles {
        if self.last_cwd.as_deref() != cwd {
            return self.force_refresh(cwd);
        }
        let claude_dir = &self.claude_dir;
        self.cache
            .get_or_refresh(self.clock.now_ms(), || detect_context_files(claude_dir, cwd))
    }

    pub fn force_refresh(&mut self, cwd: Option<&Path>) -> &ContextFiles {
        let files = detect_context_files(&self.claude_dir, cwd);
        self.last_cwd = cwd.map(Path::to_path_buf);
        self.cache.store(self.clock.now_ms(), files)
    }
}
