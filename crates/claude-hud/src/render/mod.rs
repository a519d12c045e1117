//! Dashboard rendering: line producers and the bordered box.
//!
//! Producers turn a [`RenderContext`] into [`Line`]s without knowing the
//! terminal. [`render`] resolves them through a [`LayoutEngine`] and
//! [`compose_box`] clips, pads and frames the result:
//!
//! ```text
//! ╭──────────────────────────────────────────────────────────╮
//! │ Opus ████▌░░░░░░░ 38%  2#  3M              12m           │
//! │ ● Edit:.../layout.rs  ✓ Read×4 Grep×2                    │
//! ╰──────────────────────────────────────────────────────────╯
//! ```

pub mod agents_line;
pub mod colors;
pub mod context_line;
pub mod format;
pub mod gradient;
pub mod icons;
pub mod session_line;
pub mod spinner;
pub mod stats_line;
pub mod todos_line;
pub mod tools_line;

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::activity::SessionActivity;
use crate::ansi::{RESET, truncate_to_width, visible_width};
use crate::config::HudConfig;
use crate::context::ContextHealth;
use crate::layout::{LayoutEngine, Line};
use crate::sources::{ConfigCounts, TokenStats};

use colors::dim;

/// Narrowest box drawn, whatever the terminal width.
pub const MIN_BOX_WIDTH: usize = 60;

/// Columns taken by `│ ` and ` │`.
pub const BOX_CHROME: usize = 4;

const NBSP: char = '\u{a0}';

const VERTICAL: &str = "│";
const HORIZONTAL: &str = "─";
const TOP_LEFT: &str = "╭";
const TOP_RIGHT: &str = "╮";
const BOTTOM_LEFT: &str = "╰";
const BOTTOM_RIGHT: &str = "╯";

/// Everything the producers draw from.
///
/// Deserializable so the one-shot renderer can take it as JSON; missing
/// fields default to empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RenderContext {
    /// Model display name.
    pub model: Option<String>,
    pub context: ContextHealth,
    #[serde(flatten)]
    pub counts: ConfigCounts,
    /// Preformatted session length.
    pub session_duration: Option<String>,
    #[serde(flatten)]
    pub activity: SessionActivity,
    pub stats: Option<TokenStats>,
    pub compaction_count: u32,
    /// Render time in epoch milliseconds (drives elapsed times and spinners).
    pub now_ms: i64,
}

/// Box width for a terminal: 90% of it, never below [`MIN_BOX_WIDTH`].
pub fn box_width(terminal_width: usize) -> usize {
    (terminal_width * 9 / 10).max(MIN_BOX_WIDTH)
}

/// Width available to content inside the box.
pub fn inner_width(terminal_width: usize) -> usize {
    box_width(terminal_width) - BOX_CHROME
}

/// Run every producer in display order.
pub fn collect_lines(ctx: &RenderContext, config: &HudConfig, engine: &LayoutEngine) -> Vec<Line> {
    let constraints = engine.constraints();
    let compact = config.is_compact_mode(engine.terminal_width());

    let mut lines = Vec::new();
    lines.extend(session_line::session_line(ctx, config, &constraints));
    if !compact {
        lines.extend(context_line::context_line(ctx, config, &constraints));
    }
    lines.extend(tools_line::tools_line(ctx, config, &constraints));
    lines.extend(agents_line::agents_lines(ctx, config, &constraints));
    lines.extend(todos_line::todos_line(ctx, config, &constraints));
    if !compact {
        lines.extend(stats_line::stats_line(ctx, config, &constraints));
    }
    lines
}

/// Render the full dashboard: one string per terminal row, no newlines.
/// Empty when there is nothing to show.
pub fn render(ctx: &RenderContext, config: &HudConfig, engine: &LayoutEngine) -> Vec<String> {
    let inner = inner_width(engine.terminal_width());
    let rows: Vec<String> = collect_lines(ctx, config, engine)
        .iter()
        .map(|line| engine.render_line(line, inner))
        .collect();
    compose_box(&rows, engine.terminal_width())
}

/// Frame content rows in a dimmed rounded border.
///
/// Rows are clipped to the inner width, padded, and have their spaces
/// replaced by no-break spaces so the terminal never re-wraps them. Empty
/// rows are dropped; no rows means no box.
pub fn compose_box(rows: &[String], terminal_width: usize) -> Vec<String> {
    let rows: Vec<&String> = rows.iter().filter(|r| !r.is_empty()).collect();
    if rows.is_empty() {
        return Vec::new();
    }

    let width = box_width(terminal_width);
    let inner = width - BOX_CHROME;
    let border = dim(VERTICAL);
    let rule = dim(&HORIZONTAL.repeat(width - 2));

    let mut out = Vec::with_capacity(rows.len() + 2);
    out.push(format!("{RESET}{}{rule}{}", dim(TOP_LEFT), dim(TOP_RIGHT)));
    for row in rows {
        let clipped = truncate_to_width(row, inner);
        let padding = inner.saturating_sub(visible_width(&clipped));
        let padded = format!("{clipped}{}", " ".repeat(padding));
        let padded = padded.replace(' ', &NBSP.to_string());
        out.push(format!("{RESET}{border} {padded} {border}"));
    }
    out.push(format!(
        "{RESET}{}{rule}{}",
        dim(BOTTOM_LEFT),
        dim(BOTTOM_RIGHT)
    ));
    out
}

/// Print one frame and flush.
///
/// Frames follow each other down the output: every frame after the first
/// is preceded by a blank line. An empty frame prints nothing.
pub fn write_frame(out: &mut impl Write, rows: &[String], after_previous: bool) -> Result<(), String> {
    if rows.is_empty() {
        return Ok(());
    }
    let mut emit = || -> std::io::Result<()> {
        if after_previous {
            writeln!(out)?;
        }
        for row in rows {
            writeln!(out, "{row}")?;
        }
        out.flush()
    };
    emit().map_err(|e| format!("failed to write output: {e}"))
}
