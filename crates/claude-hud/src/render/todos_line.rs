//! Todo progress row.

use super::RenderContext;
use super::colors::{bright_yellow, dim, green};
use crate::ansi::{TruncatePosition, truncate};
use crate::config::HudConfig;
use crate::layout::{LayoutConstraints, Line};

/// The in-progress item (or "Done" once everything is completed) with
/// `completed/total` on the right. Nothing while work is pending but none
/// is in progress.
pub fn todos_line(
    ctx: &RenderContext,
    config: &HudConfig,
    constraints: &LayoutConstraints,
) -> Option<Line> {
    let activity = &ctx.activity;
    if activity.todos.is_empty() {
        return None;
    }
    let icons = config.icon_mode.icons();
    let (completed, total) = activity.todo_progress();

    let left = match activity.todo_in_progress() {
        Some(item) => format!(
            "{} {}",
            bright_yellow(icons.todo_active),
            truncate(&item.content, constraints.max_desc_length, TruncatePosition::End)
        ),
        None if completed == total => format!("{} {}", green(icons.todo_done), dim("Done")),
        None => return None,
    };

    Some(
        Line::new()
            .with_left(left, 0)
            .with_right(dim(&format!("{completed}/{total}")), 1),
    )
}
