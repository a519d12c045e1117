//! ANSI-aware text measurement and truncation.
//!
//! Styled status text carries SGR color codes, OSC hyperlinks and the odd
//! cursor sequence. Widths are measured on the visible characters only, and
//! truncation copies escape sequences through whole so a cut never leaves a
//! half-written sequence on the terminal.
//!
//! Width is counted in `char`s. Wide (CJK, emoji) graphemes count as one
//! column; callers that render such text accept some misalignment.

const ESC: char = '\x1b';
const BEL: char = '\x07';

/// SGR reset. Appended after a truncation so styles never bleed into later
/// content.
pub const RESET: &str = "\x1b[0m";

/// The single character used to mark a cut.
pub const ELLIPSIS: char = '…';

/// Length (in chars) of the escape sequence starting at `chars[start]`.
///
/// `chars[start]` must be `ESC`. Unterminated sequences run to the end of
/// the input so they are treated as one unit rather than leaking bytes.
fn escape_len(chars: &[char], start: usize) -> usize {
    let rest = &chars[start + 1..];
    match rest.first() {
        // CSI: ESC [ params <final letter>
        Some('[') => match rest[1..].iter().position(|c| c.is_ascii_alphabetic()) {
            Some(pos) => pos + 3,
            None => chars.len() - start,
        },
        // OSC: ESC ] ... BEL
        Some(']') => match rest[1..].iter().position(|&c| c == BEL) {
            Some(pos) => pos + 3,
            None => chars.len() - start,
        },
        // DCS / SOS / PM / APC: ESC P|X|^|_ ... ESC \
        Some('P' | 'X' | '^' | '_') => {
            let body = &rest[1..];
            match body.windows(2).position(|w| w[0] == ESC && w[1] == '\\') {
                Some(pos) => pos + 4,
                None => chars.len() - start,
            }
        }
        // Any other two-character escape.
        Some(_) => 2,
        None => 1,
    }
}

/// Remove all recognized escape sequences, leaving visible text.
pub fn strip_escapes(s: &str) -> String {
    if !s.contains(ESC) {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == ESC {
            i += escape_len(&chars, i);
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }
    out
}

/// Number of visible characters in `s`.
pub fn visible_width(s: &str) -> usize {
    strip_escapes(s).chars().count()
}

/// Cut styled text down to `max_width` visible columns.
///
/// Text that already fits is returned unchanged. Otherwise the result is the
/// longest visible prefix of `max_width - 1` characters (with every escape
/// sequence encountered on the way kept intact), an ellipsis, and a style
/// reset.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if visible_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    if max_width == 1 {
        return ELLIPSIS.to_string();
    }

    let chars: Vec<char> = s.chars().collect();
    let budget = max_width - 1;
    let mut out = String::with_capacity(s.len());
    let mut visible = 0;
    let mut i = 0;

    while i < chars.len() && visible < budget {
        if chars[i] == ESC {
            let len = escape_len(&chars, i);
            out.extend(&chars[i..i + len]);
            i += len;
        } else {
            out.push(chars[i]);
            visible += 1;
            i += 1;
        }
    }

    out.push(ELLIPSIS);
    out.push_str(RESET);
    out
}

/// Where [`truncate`] places the ellipsis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TruncatePosition {
    Start,
    Middle,
    #[default]
    End,
}

/// Truncate plain (unstyled) text to `max_len` characters.
///
/// Limits of three or fewer get a hard cut with no ellipsis.
pub fn truncate(text: &str, max_len: usize, position: TruncatePosition) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_len {
        return text.to_string();
    }
    if max_len <= 3 {
        return chars[..max_len].iter().collect();
    }

    let available = max_len - 1;
    let mut out = String::with_capacity(max_len * 4);
    match position {
        TruncatePosition::Start => {
            out.push(ELLIPSIS);
            out.extend(&chars[chars.len() - available..]);
        }
        TruncatePosition::Middle => {
            let head = available / 2;
            let tail = available - head;
            out.extend(&chars[..head]);
            out.push(ELLIPSIS);
            out.extend(&chars[chars.len() - tail..]);
        }
        TruncatePosition::End => {
            out.extend(&chars[..available]);
            out.push(ELLIPSIS);
        }
    }
    out
}

/// Shorten a file path, keeping the file name visible.
///
/// Accepts both `/` and `\` separators. Returns `.../name` when the name
/// fits, otherwise the name itself cut to `max_len - 3` plus `...`.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let filename = path
        .split(['/', '\\'])
        .filter(|part| !part.is_empty())
        .last()
        .unwrap_or(path);

    if filename.chars().count() >= max_len {
        let keep: String = filename.chars().take(max_len.saturating_sub(3)).collect();
        return format!("{keep}...");
    }

    format!(".../{filename}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_width_is_char_count() {
        for s in ["", "hello", "model: opus", "│ ▸ ✓ …"] {
            assert_eq!(visible_width(s), s.chars().count(), "{s:?}");
        }
    }

    #[test]
    fn strips_sgr_and_osc() {
        let styled = "\x1b[1;36mopus\x1b[0m \x1b]8;;https://x.dev\x07link\x1b]8;;\x07";
        assert_eq!(strip_escapes(styled), "opus link");
        assert_eq!(visible_width(styled), 9);
    }

    #[test]
    fn strips_dcs_and_two_char_escapes() {
        assert_eq!(strip_escapes("a\x1bPq#0\x1b\\b"), "ab");
        assert_eq!(strip_escapes("a\x1b7b\x1b8c"), "abc");
    }

    #[test]
    fn strips_private_csi_fully() {
        assert_eq!(strip_escapes("\x1b[?25lhidden"), "hidden");
    }

    #[test]
    fn unterminated_escape_is_swallowed() {
        assert_eq!(strip_escapes("ok\x1b[38;5"), "ok");
        assert_eq!(strip_escapes("ok\x1b"), "ok");
    }

    #[test]
    fn truncate_keeps_fitting_text() {
        let s = "\x1b[32mfits\x1b[0m";
        assert_eq!(truncate_to_width(s, 4), s);
        assert_eq!(truncate_to_width(s, 40), s);
    }

    #[test]
    fn truncate_edge_widths() {
        assert_eq!(truncate_to_width("abcdef", 0), "");
        assert_eq!(truncate_to_width("abcdef", 1), "…");
    }

    #[test]
    fn truncate_preserves_escapes_and_resets() {
        let s = "\x1b[31mabcdef\x1b[0m";
        let cut = truncate_to_width(s, 4);
        assert_eq!(cut, "\x1b[31mabc…\x1b[0m");
        assert_eq!(visible_width(&cut), 4);
    }

    #[test]
    fn truncate_never_splits_an_escape() {
        let s = "ab\x1b[38;2;255;140;0mcdefgh";
        let cut = truncate_to_width(s, 3);
        assert_eq!(cut, "ab…\x1b[0m");
        let cut = truncate_to_width(s, 4);
        assert_eq!(cut, "ab\x1b[38;2;255;140;0mc…\x1b[0m");
    }

    #[test]
    fn truncated_width_never_exceeds_limit() {
        let samples = [
            "plain text that is long",
            "\x1b[1mbold\x1b[0m and \x1b[2mdim\x1b[0m",
            "▸ running Read:.../main.rs",
            "\x1b]8;;file:///tmp\x07tmp\x1b]8;;\x07 dir",
        ];
        for s in samples {
            for w in 0..30 {
                let out = truncate_to_width(s, w);
                assert!(visible_width(&out) <= w, "{s:?} at {w}: {out:?}");
            }
        }
    }

    #[test]
    fn plain_truncate_positions() {
        assert_eq!(truncate("abcdefghij", 6, TruncatePosition::End), "abcde…");
        assert_eq!(truncate("abcdefghij", 6, TruncatePosition::Start), "…fghij");
        assert_eq!(truncate("abcdefghij", 6, TruncatePosition::Middle), "ab…hij");
        assert_eq!(truncate("abcdefghij", 3, TruncatePosition::End), "abc");
        assert_eq!(truncate("short", 10, TruncatePosition::End), "short");
    }

    #[test]
    fn path_truncation_keeps_filename() {
        assert_eq!(truncate_path("src/main.rs", 20), "src/main.rs");
        assert_eq!(
            truncate_path("/home/dev/project/src/render/layout.rs", 20),
            ".../layout.rs"
        );
        assert_eq!(
            truncate_path("C:\\work\\repo\\a_very_long_file_name.rs", 12),
            "a_very_lo..."
        );
    }
}
