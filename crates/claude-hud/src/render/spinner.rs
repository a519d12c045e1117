//! Time-derived spinner frames. No state: the frame is a function of the
//! timestamp, so every redraw advances the animation.

use std::fmt;

use serde::{Deserialize, Serialize};

pub const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
pub const BLOCK_FRAMES: &[&str] = &["▖", "▘", "▝", "▗"];
pub const ASCII_FRAMES: &[&str] = &["|", "/", "-", "\\"];
pub const DOTS_FRAMES: &[&str] = &[".  ", ".. ", "...", " ..", "  .", "   "];

/// Default frame interval in milliseconds.
pub const DEFAULT_INTERVAL_MS: i64 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpinnerStyle {
    #[default]
    Braille,
    Block,
    Ascii,
    Dots,
}

impl SpinnerStyle {
    pub fn frames(self) -> &'static [&'static str] {
        match self {
            Self::Braille => BRAILLE_FRAMES,
            Self::Block => BLOCK_FRAMES,
            Self::Ascii => ASCII_FRAMES,
            Self::Dots => DOTS_FRAMES,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Braille => "braille",
            Self::Block => "block",
            Self::Ascii => "ascii",
            Self::Dots => "dots",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "braille" => Some(Self::Braille),
            "block" => Some(Self::Block),
            "ascii" => Some(Self::Ascii),
            "dots" => Some(Self::Dots),
            _ => None,
        }
    }
}

impl fmt::Display for SpinnerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Frame shown at `timestamp_ms` for a given interval.
pub fn spinner_frame(timestamp_ms: i64, style: SpinnerStyle, interval_ms: i64) -> &'static str {
    let frames = style.frames();
    let tick = timestamp_ms.max(0) / interval_ms.max(1);
    frames[(tick as usize) % frames.len()]
}

/// First frame, for paused or completed states.
pub fn static_frame(style: SpinnerStyle) -> &'static str {
    style.frames()[0]
}
