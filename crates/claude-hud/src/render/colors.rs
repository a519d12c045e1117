//! ANSI SGR styling helpers. Every wrapper terminates its own style.

use crate::ansi::RESET;

pub const DIM: &str = "\x1b[2m";
pub const BOLD: &str = "\x1b[1m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";
pub const CYAN: &str = "\x1b[36m";
pub const WHITE: &str = "\x1b[37m";

pub const BRIGHT_RED: &str = "\x1b[91m";
pub const BRIGHT_GREEN: &str = "\x1b[92m";
pub const BRIGHT_YELLOW: &str = "\x1b[93m";
pub const BRIGHT_CYAN: &str = "\x1b[96m";

/// Wrap `text` in `code` and a reset.
pub fn paint(code: &str, text: &str) -> String {
    format!("{code}{text}{RESET}")
}

pub fn red(text: &str) -> String {
    paint(RED, text)
}

pub fn green(text: &str) -> String {
    paint(GREEN, text)
}

pub fn yellow(text: &str) -> String {
    paint(YELLOW, text)
}

pub fn blue(text: &str) -> String {
    paint(BLUE, text)
}

pub fn magenta(text: &str) -> String {
    paint(MAGENTA, text)
}

pub fn cyan(text: &str) -> String {
    paint(CYAN, text)
}

pub fn white(text: &str) -> String {
    paint(WHITE, text)
}

pub fn bright_red(text: &str) -> String {
    paint(BRIGHT_RED, text)
}

pub fn bright_green(text: &str) -> String {
    paint(BRIGHT_GREEN, text)
}

pub fn bright_yellow(text: &str) -> String {
    paint(BRIGHT_YELLOW, text)
}

pub fn bright_cyan(text: &str) -> String {
    paint(BRIGHT_CYAN, text)
}

pub fn dim(text: &str) -> String {
    paint(DIM, text)
}

pub fn bold(text: &str) -> String {
    paint(BOLD, text)
}

/// 256-color foreground escape.
pub fn fg256(code: u8) -> String {
    format!("\x1b[38;5;{code}m")
}

/// 256-color background escape.
pub fn bg256(code: u8) -> String {
    format!("\x1b[48;5;{code}m")
}

pub fn color256(text: &str, fg: u8, bg: Option<u8>) -> String {
    let bg = bg.map(bg256).unwrap_or_default();
    format!("{}{bg}{text}{RESET}", fg256(fg))
}

/// Truecolor foreground escape.
pub fn fg_rgb(r: u8, g: u8, b: u8) -> String {
    format!("\x1b[38;2;{r};{g};{b}m")
}

pub fn color_rgb(text: &str, r: u8, g: u8, b: u8) -> String {
    format!("{}{text}{RESET}", fg_rgb(r, g, b))
}

/// Threshold color for a usage percentage: red at 85, yellow at 70.
pub fn context_color(percent: u8) -> &'static str {
    if percent >= 85 {
        RED
    } else if percent >= 70 {
        YELLOW
    } else {
        GREEN
    }
}
