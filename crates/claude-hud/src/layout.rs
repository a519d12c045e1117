//! Priority-based, width-adaptive line layout.
//!
//! Producers describe a dashboard row as a [`Line`]: an ordered list of
//! left-anchored [`Segment`]s and an ordered list of right-anchored ones, each
//! tagged with a display priority (0 = critical, 3 = optional). The
//! [`LayoutEngine`] resolves a `Line` into one printable string:
//!
//! 1. The **terminal width** picks a [`LayoutMode`], which sets the priority
//!    cutoff. Segments above the cutoff are dropped.
//! 2. The **box inner width** is used only to right-align the surviving
//!    right-hand content. If the two sides would come within two columns of
//!    each other, the right side is dropped. Lines never wrap or overflow.
//!
//! The rule is deliberately asymmetric: a priority-0 segment on the right is
//! always kept, while left-hand segments are always subject to the cutoff.
//! Ordering is the producer's job; the engine never reorders segments.

use crate::ansi::visible_width;

/// Separator placed between adjacent segments on the same side.
pub const SEGMENT_SEPARATOR: &str = "  ";

/// Minimum number of spaces between left and right content.
pub const MIN_GAP: usize = 2;

/// Width assumed when the terminal size cannot be determined.
pub const DEFAULT_TERMINAL_WIDTH: usize = 80;

/// Lowest (least important) display priority.
pub const LOWEST_PRIORITY: u8 = 3;

// ── Segments and lines ─────────────────────────────────────────────

/// One piece of styled status content tagged with a display priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    /// Styled text, possibly containing ANSI escapes.
    pub content: String,
    /// 0 = critical, 1 = important, 2 = secondary, 3 = optional.
    pub priority: u8,
    /// Columns this content needs to be worth showing. A left segment is
    /// dropped when fewer columns than this remain on the row.
    pub min_width: Option<usize>,
}

impl Segment {
    /// Create a segment. Priorities above 3 are clamped to 3.
    pub fn new(content: impl Into<String>, priority: u8) -> Self {
        Self {
            content: content.into(),
            priority: priority.min(LOWEST_PRIORITY),
            min_width: None,
        }
    }

    /// Shorthand for a priority-0 segment.
    pub fn critical(content: impl Into<String>) -> Self {
        Self::new(content, 0)
    }

    pub fn with_min_width(mut self, width: usize) -> Self {
        self.min_width = Some(width);
        self
    }
}

/// A dashboard row before layout: left and right segment lists.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub left: Vec<Segment>,
    pub right: Vec<Segment>,
}

impl Line {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a left-anchored segment.
    pub fn push_left(&mut self, content: impl Into<String>, priority: u8) {
        self.left.push(Segment::new(content, priority));
    }

    /// Append a right-anchored segment.
    pub fn push_right(&mut self, content: impl Into<String>, priority: u8) {
        self.right.push(Segment::new(content, priority));
    }

    /// Builder form of [`push_left`](Self::push_left).
    pub fn with_left(mut self, content: impl Into<String>, priority: u8) -> Self {
        self.push_left(content, priority);
        self
    }

    /// Builder form of [`push_right`](Self::push_right).
    pub fn with_right(mut self, content: impl Into<String>, priority: u8) -> Self {
        self.push_right(content, priority);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty() && self.right.is_empty()
    }
}

// ── Modes and constraints ──────────────────────────────────────────

/// Width class of the terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutMode {
    /// Under 60 columns.
    UltraCompact,
    /// 60 to 79 columns.
    Compact,
    /// 80 to 119 columns.
    Standard,
    /// 120 columns and wider.
    Wide,
}

impl LayoutMode {
    pub fn from_width(width: usize) -> Self {
        match width {
            0..60 => Self::UltraCompact,
            60..80 => Self::Compact,
            80..120 => Self::Standard,
            _ => Self::Wide,
        }
    }

    /// Highest segment priority that survives in this mode.
    pub fn max_priority(self) -> u8 {
        match self {
            Self::UltraCompact => 0,
            Self::Compact => 1,
            Self::Standard => 2,
            Self::Wide => 3,
        }
    }

    /// Width of the context progress bar.
    pub fn bar_width(self) -> usize {
        match self {
            Self::UltraCompact => 8,
            Self::Compact => 12,
            Self::Standard => 15,
            Self::Wide => 20,
        }
    }

    /// Maximum characters for free-text descriptions (todos, agents).
    pub fn max_desc_length(self) -> usize {
        match self {
            Self::UltraCompact => 20,
            Self::Compact => 30,
            Self::Standard => 40,
            Self::Wide => 60,
        }
    }

    /// Maximum characters for tool target paths.
    pub fn max_path_length(self) -> usize {
        match self {
            Self::UltraCompact | Self::Compact => 15,
            Self::Standard => 20,
            Self::Wide => 30,
        }
    }

    /// How many distinct completed tools to summarize.
    pub fn max_tools_shown(self) -> usize {
        match self {
            Self::UltraCompact | Self::Compact => 4,
            Self::Standard => 5,
            Self::Wide => 6,
        }
    }

    pub fn is_compact(self) -> bool {
        matches!(self, Self::UltraCompact | Self::Compact)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::UltraCompact => "ultra-compact",
            Self::Compact => "compact",
            Self::Standard => "standard",
            Self::Wide => "wide",
        }
    }
}

impl std::fmt::Display for LayoutMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size limits producers use when building lines for a given terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutConstraints {
    pub terminal_width: usize,
    pub mode: LayoutMode,
    pub bar_width: usize,
    pub max_path_length: usize,
    pub max_desc_length: usize,
    pub max_tools_shown: usize,
    pub is_compact: bool,
}

impl LayoutConstraints {
    pub fn for_width(terminal_width: usize) -> Self {
        let mode = LayoutMode::from_width(terminal_width);
        Self {
            terminal_width,
            mode,
            bar_width: mode.bar_width(),
            max_path_length: mode.max_path_length(),
            max_desc_length: mode.max_desc_length(),
            max_tools_shown: mode.max_tools_shown(),
            is_compact: mode.is_compact(),
        }
    }
}

/// Pick a width: the size reported by the terminal, then a `COLUMNS`-style
/// value, then [`DEFAULT_TERMINAL_WIDTH`]. Zero counts as unknown.
pub fn terminal_width_from(detected: Option<usize>, columns: Option<&str>) -> usize {
    detected
        .filter(|&w| w > 0)
        .or_else(|| {
            columns
                .and_then(|c| c.trim().parse::<usize>().ok())
                .filter(|&w| w > 0)
        })
        .unwrap_or(DEFAULT_TERMINAL_WIDTH)
}

/// Width of the attached terminal, falling back to `COLUMNS` when stdout is
/// not a terminal (piped output, status-line hooks).
pub fn detect_terminal_width() -> usize {
    let detected = crossterm::terminal::size().ok().map(|(w, _)| usize::from(w));
    terminal_width_from(detected, std::env::var("COLUMNS").ok().as_deref())
}

// ── Engine ─────────────────────────────────────────────────────────

/// Resolves [`Line`]s into printable rows for one terminal width.
///
/// Construct one per frame (it is a pair of integers) with the width that
/// should drive priority filtering.
#[derive(Debug, Clone, Copy)]
pub struct LayoutEngine {
    terminal_width: usize,
    mode: LayoutMode,
}

impl LayoutEngine {
    pub fn new(terminal_width: usize) -> Self {
        Self {
            terminal_width,
            mode: LayoutMode::from_width(terminal_width),
        }
    }

    /// Engine sized from the environment (see [`detect_terminal_width`]).
    pub fn detect() -> Self {
        Self::new(detect_terminal_width())
    }

    pub fn terminal_width(&self) -> usize {
        self.terminal_width
    }

    pub fn mode(&self) -> LayoutMode {
        self.mode
    }

    pub fn constraints(&self) -> LayoutConstraints {
        LayoutConstraints::for_width(self.terminal_width)
    }

    /// Resolve a line into a single row no wider than `inner_width` plus
    /// whatever the left content alone occupies.
    pub fn render_line(&self, line: &Line, inner_width: usize) -> String {
        let max_priority = self.mode.max_priority();

        let mut used = 0;
        let mut kept = Vec::with_capacity(line.left.len());
        for segment in line
            .left
            .iter()
            .filter(|s| s.priority <= max_priority && !s.content.is_empty())
        {
            let separator = if kept.is_empty() { 0 } else { SEGMENT_SEPARATOR.len() };
            if let Some(min) = segment.min_width
                && inner_width.saturating_sub(used + separator) < min
            {
                continue;
            }
            used += separator + visible_width(&segment.content);
            kept.push(segment);
        }
        let left = join_segments(kept.into_iter());

        // Critical right-side items surface even in ultra-compact mode.
        let right = join_segments(line.right.iter().filter(|s| {
            (s.priority == 0 || s.priority <= max_priority) && !s.content.is_empty()
        }));

        if right.is_empty() {
            return left;
        }

        align_left_right(&left, &right, inner_width)
    }
}

fn join_segments<'a>(segments: impl Iterator<Item = &'a Segment>) -> String {
    segments
        .map(|s| s.content.as_str())
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

/// Place `left` and `right` on one row of `total_width` columns.
///
/// Returns `left` alone when fewer than [`MIN_GAP`] columns would separate
/// the two sides.
pub fn align_left_right(left: &str, right: &str, total_width: usize) -> String {
    let used = visible_width(left) + visible_width(right);
    let gap = total_width.saturating_sub(used);
    if used > total_width || gap < MIN_GAP {
        return left.to_string();
    }
    format!("{left}{}{right}", " ".repeat(gap))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_thresholds() {
        assert_eq!(LayoutMode::from_width(0), LayoutMode::UltraCompact);
        assert_eq!(LayoutMode::from_width(59), LayoutMode::UltraCompact);
        assert_eq!(LayoutMode::from_width(60), LayoutMode::Compact);
        assert_eq!(LayoutMode::from_width(79), LayoutMode::Compact);
        assert_eq!(LayoutMode::from_width(80), LayoutMode::Standard);
        assert_eq!(LayoutMode::from_width(119), LayoutMode::Standard);
        assert_eq!(LayoutMode::from_width(120), LayoutMode::Wide);
    }

    #[test]
    fn cutoffs_follow_mode() {
        let cutoffs: Vec<u8> = [50, 70, 100, 150]
            .into_iter()
            .map(|w| LayoutMode::from_width(w).max_priority())
            .collect();
        assert_eq!(cutoffs, vec![0, 1, 2, 3]);
    }

    #[test]
    fn right_dropped_when_gap_too_small() {
        let line = Line::new().with_left("ABCDE", 0).with_right("XY", 0);
        let engine = LayoutEngine::new(150);
        assert_eq!(engine.render_line(&line, 8), "ABCDE");
        assert_eq!(engine.render_line(&line, 9), "ABCDE  XY");
    }

    #[test]
    fn ultra_compact_keeps_critical_right_only() {
        let line = Line::new()
            .with_left("model", 0)
            .with_left("counts", 1)
            .with_right("!", 0)
            .with_right("12m", 1);
        let engine = LayoutEngine::new(50);
        assert_eq!(engine.render_line(&line, 20), format!("model{}!", " ".repeat(14)));
    }

    #[test]
    fn left_priority_zero_survives_ultra_compact() {
        let line = Line::new().with_left("a", 0).with_left("b", 1);
        assert_eq!(LayoutEngine::new(40).render_line(&line, 40), "a");
        assert_eq!(LayoutEngine::new(70).render_line(&line, 40), "a  b");
    }

    #[test]
    fn empty_segments_are_skipped_without_double_separators() {
        let line = Line::new()
            .with_left("a", 0)
            .with_left("", 0)
            .with_left("c", 0)
            .with_right("", 0);
        assert_eq!(LayoutEngine::new(100).render_line(&line, 40), "a  c");
    }

    #[test]
    fn segments_needing_more_room_are_dropped() {
        let engine = LayoutEngine::new(120);
        let line = Line {
            left: vec![
                Segment::critical("ctx 12k"),
                Segment::new("▁▂▃▄▅▆▇█", 2).with_min_width(8),
                Segment::new("burn", 1),
            ],
            right: vec![],
        };
        // 7 + 2 + 8 columns fit in 17.
        assert_eq!(engine.render_line(&line, 17), "ctx 12k  ▁▂▃▄▅▆▇█  burn");
        // One column short: the trend goes, later segments still follow.
        assert_eq!(engine.render_line(&line, 16), "ctx 12k  burn");
    }

    #[test]
    fn order_is_preserved() {
        let line = Line::new()
            .with_left("low", 2)
            .with_left("high", 0)
            .with_left("mid", 1);
        assert_eq!(LayoutEngine::new(100).render_line(&line, 80), "low  high  mid");
    }

    #[test]
    fn alignment_uses_visible_width() {
        let left = "\x1b[36mab\x1b[0m";
        let right = "\x1b[2mcd\x1b[0m";
        let out = align_left_right(left, right, 10);
        assert_eq!(visible_width(&out), 10);
        assert!(out.starts_with(left) && out.ends_with(right));
    }

    #[test]
    fn oversized_content_does_not_underflow() {
        assert_eq!(align_left_right("0123456789", "abc", 5), "0123456789");
    }

    #[test]
    fn constraints_per_mode() {
        let c = LayoutConstraints::for_width(130);
        assert_eq!(c.mode, LayoutMode::Wide);
        assert_eq!(c.bar_width, 20);
        assert_eq!(c.max_desc_length, 60);
        assert_eq!(c.max_path_length, 30);
        assert_eq!(c.max_tools_shown, 6);
        assert!(!c.is_compact);
        assert!(LayoutConstraints::for_width(65).is_compact);
    }

    #[test]
    fn terminal_width_parsing() {
        assert_eq!(terminal_width_from(None, Some("132")), 132);
        assert_eq!(terminal_width_from(None, Some("0")), DEFAULT_TERMINAL_WIDTH);
        assert_eq!(terminal_width_from(None, Some("wide")), DEFAULT_TERMINAL_WIDTH);
        assert_eq!(terminal_width_from(None, None), DEFAULT_TERMINAL_WIDTH);
    }

    #[test]
    fn reported_terminal_size_beats_columns() {
        assert_eq!(terminal_width_from(Some(100), Some("200")), 100);
        assert_eq!(terminal_width_from(Some(100), None), 100);
        // A zero-sized terminal is treated as unknown.
        assert_eq!(terminal_width_from(Some(0), Some("200")), 200);
        assert_eq!(terminal_width_from(Some(0), None), DEFAULT_TERMINAL_WIDTH);
        // Whatever the test harness is attached to, some width comes back.
        assert!(LayoutEngine::detect().terminal_width() > 0);
    }

    #[test]
    fn priority_is_clamped() {
        assert_eq!(Segment::new("x", 9).priority, LOWEST_PRIORITY);
    }
}
