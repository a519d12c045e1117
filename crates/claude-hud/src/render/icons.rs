//! Icon tables for Nerd Font, plain Unicode and ASCII terminals.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IconMode {
    Nerd,
    #[default]
    Unicode,
    Ascii,
}

impl IconMode {
    pub fn detect() -> Self {
        Self::detect_from(|key| std::env::var(key).ok())
    }

    /// Nerd Font glyphs only when explicitly enabled; Unicode otherwise.
    pub fn detect_from(env: impl Fn(&str) -> Option<String>) -> Self {
        let flag = env("NERD_FONT").or_else(|| env("CLAUDE_HUD_NERD_FONT"));
        match flag.as_deref() {
            Some("1" | "true") => Self::Nerd,
            _ => Self::Unicode,
        }
    }

    pub fn icons(self) -> &'static IconSet {
        match self {
            Self::Nerd => &NERD_ICONS,
            Self::Unicode => &UNICODE_ICONS,
            Self::Ascii => &ASCII_ICONS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Nerd => "nerd",
            Self::Unicode => "unicode",
            Self::Ascii => "ascii",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "nerd" => Some(Self::Nerd),
            "unicode" => Some(Self::Unicode),
            "ascii" => Some(Self::Ascii),
            _ => None,
        }
    }
}

impl fmt::Display for IconMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Glyphs used across the dashboard lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IconSet {
    pub model: &'static str,
    pub claude_md: &'static str,
    pub rules: &'static str,
    pub mcps: &'static str,
    pub hooks: &'static str,
    pub timer: &'static str,
    pub warning: &'static str,
    pub running: &'static str,
    pub completed: &'static str,
    pub error: &'static str,
    pub pending: &'static str,
    pub agent: &'static str,
    pub tool: &'static str,
    pub todo_active: &'static str,
    pub todo_done: &'static str,
    pub todo_item: &'static str,
    pub separator: &'static str,
}

pub const NERD_ICONS: IconSet = IconSet {
    model: "\u{f108}",
    claude_md: "\u{f15c}",
    rules: "\u{f0cb}",
    mcps: "\u{f1e6}",
    hooks: "\u{f069}",
    timer: "\u{f017}",
    warning: "\u{f071}",
    running: "\u{f192}",
    completed: "\u{f00c}",
    error: "\u{f00d}",
    pending: "\u{f10c}",
    agent: "\u{f135}",
    tool: "\u{f0ad}",
    todo_active: "\u{f0e7}",
    todo_done: "\u{f00c}",
    todo_item: "\u{f111}",
    separator: "\u{e0b0}",
};

pub const UNICODE_ICONS: IconSet = IconSet {
    model: "■",
    claude_md: "#",
    rules: "R",
    mcps: "M",
    hooks: "H",
    timer: "⏱",
    warning: "⚠",
    running: "●",
    completed: "✓",
    error: "✗",
    pending: "○",
    agent: "@",
    tool: "*",
    todo_active: "▸",
    todo_done: "✓",
    todo_item: "•",
    separator: "|",
};

pub const ASCII_ICONS: IconSet = IconSet {
    model: "[M]",
    claude_md: "#",
    rules: "R",
    mcps: "M",
    hooks: "H",
    timer: "T",
    warning: "!",
    running: "*",
    completed: "+",
    error: "x",
    pending: "o",
    agent: "@",
    tool: "*",
    todo_active: ">",
    todo_done: "+",
    todo_item: "-",
    separator: "|",
};
