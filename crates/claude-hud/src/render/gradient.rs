//! Percentage-driven gradient coloring and progress bars.
//!
//! Colors are interpolated between fixed palette stops at 0, 50, 70, 85, 95
//! and 100 percent, then emitted in the richest mode the terminal supports.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ansi::RESET;

/// Color capability of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColorMode {
    #[serde(rename = "basic")]
    Basic,
    #[default]
    #[serde(rename = "256")]
    Ansi256,
    #[serde(rename = "truecolor")]
    TrueColor,
}

impl ColorMode {
    /// Detect from the process environment.
    pub fn detect() -> Self {
        Self::detect_from(|key| std::env::var(key).ok())
    }

    /// Detect using `env` as the variable lookup.
    pub fn detect_from(env: impl Fn(&str) -> Option<String>) -> Self {
        let color_term = env("COLORTERM").unwrap_or_default();
        let term = env("TERM").unwrap_or_default();

        if color_term == "truecolor" || color_term == "24bit" {
            return Self::TrueColor;
        }
        if term.contains("256color") || color_term == "256" {
            return Self::Ansi256;
        }
        if env("WT_SESSION").is_some_and(|v| !v.is_empty()) {
            return Self::TrueColor;
        }
        match env("TERM_PROGRAM").as_deref() {
            Some("iTerm.app" | "vscode") => Self::TrueColor,
            _ => Self::Ansi256,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Ansi256 => "256",
            Self::TrueColor => "truecolor",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic" => Some(Self::Basic),
            "256" => Some(Self::Ansi256),
            "truecolor" => Some(Self::TrueColor),
            _ => None,
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

const fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

const GREEN: Rgb = rgb(0, 200, 80);
const GREEN_BRIGHT: Rgb = rgb(50, 255, 100);
const YELLOW: Rgb = rgb(255, 200, 0);
const ORANGE: Rgb = rgb(255, 140, 0);
const RED: Rgb = rgb(255, 60, 60);
const RED_DARK: Rgb = rgb(200, 0, 0);
const DIM: Rgb = rgb(100, 100, 100);

/// `(start percent, span, from, to)` for each gradient band.
const STOPS: [(f64, f64, Rgb, Rgb); 5] = [
    (0.0, 50.0, GREEN, GREEN_BRIGHT),
    (50.0, 20.0, GREEN_BRIGHT, YELLOW),
    (70.0, 15.0, YELLOW, ORANGE),
    (85.0, 10.0, ORANGE, RED),
    (95.0, 5.0, RED, RED_DARK),
];

const FULL_BLOCK: char = '█';
const EMPTY_BLOCK: char = '░';

fn lerp(from: u8, to: u8, ratio: f64) -> u8 {
    (from as f64 + (to as f64 - from as f64) * ratio)
        .round()
        .clamp(0.0, 255.0) as u8
}

fn interpolate(from: Rgb, to: Rgb, ratio: f64) -> Rgb {
    rgb(
        lerp(from.r, to.r, ratio),
        lerp(from.g, to.g, ratio),
        lerp(from.b, to.b, ratio),
    )
}

/// Map to the 6×6×6 cube of the 256-color palette.
pub fn rgb_to_256(c: Rgb) -> u8 {
    let level = |v: u8| (v as f64 / 255.0 * 5.0).round() as u8;
    16 + 36 * level(c.r) + 6 * level(c.g) + level(c.b)
}

/// Foreground escape for `c` in the given mode.
pub fn fg(c: Rgb, mode: ColorMode) -> String {
    match mode {
        ColorMode::TrueColor => format!("\x1b[38;2;{};{};{}m", c.r, c.g, c.b),
        ColorMode::Ansi256 => format!("\x1b[38;5;{}m", rgb_to_256(c)),
        ColorMode::Basic => {
            let code = if c.r > c.g && c.r > c.b {
                31
            } else if c.g > c.r && c.g > c.b {
                32
            } else if c.r > 200 && c.g > 200 {
                33
            } else {
                37
            };
            format!("\x1b[{code}m")
        }
    }
}

/// Interpolated palette color for a percentage.
pub fn gradient_rgb(percent: f64) -> Rgb {
    let p = percent.clamp(0.0, 100.0);
    let (start, span, from, to) = STOPS
        .iter()
        .rev()
        .find(|(start, ..)| p >= *start)
        .copied()
        .unwrap_or(STOPS[0]);
    interpolate(from, to, (p - start) / span)
}

/// Foreground escape for the gradient color at `percent`.
pub fn gradient_color(percent: u8, mode: ColorMode) -> String {
    fg(gradient_rgb(percent as f64), mode)
}

fn sub_block(fraction: f64) -> Option<char> {
    match fraction {
        f if f >= 0.875 => Some('▉'),
        f if f >= 0.75 => Some('▊'),
        f if f >= 0.625 => Some('▋'),
        f if f >= 0.5 => Some('▌'),
        f if f >= 0.375 => Some('▍'),
        f if f >= 0.25 => Some('▎'),
        f if f >= 0.125 => Some('▏'),
        _ => None,
    }
}

/// Progress bar of exactly `width` cells with an eighth-block partial cell.
pub fn gradient_bar(percent: u8, width: usize, mode: ColorMode) -> String {
    let percent = percent.min(100);
    let fill = percent as f64 / 100.0 * width as f64;
    let full = (fill.floor() as usize).min(width);
    let partial = if full < width {
        sub_block(fill - full as f64)
    } else {
        None
    };
    let empty = width - full - usize::from(partial.is_some());

    let mut bar = gradient_color(percent, mode);
    bar.extend(std::iter::repeat_n(FULL_BLOCK, full));
    bar.extend(partial);
    bar.push_str(&fg(DIM, mode));
    bar.extend(std::iter::repeat_n(EMPTY_BLOCK, empty));
    bar.push_str(RESET);
    bar
}

/// Progress bar without partial cells.
pub fn simple_bar(percent: u8, width: usize, mode: ColorMode) -> String {
    let percent = percent.min(100);
    let filled = ((percent as f64 / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);

    let mut bar = gradient_color(percent, mode);
    bar.extend(std::iter::repeat_n(FULL_BLOCK, filled));
    bar.push_str(&fg(DIM, mode));
    bar.extend(std::iter::repeat_n(EMPTY_BLOCK, width - filled));
    bar.push_str(RESET);
    bar
}

/// `NN%` in the gradient color.
pub fn colored_percent(percent: u8, mode: ColorMode) -> String {
    format!("{}{percent}%{RESET}", gradient_color(percent, mode))
}
