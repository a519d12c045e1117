//! Tool activity row: the latest running tools and a tally of finished ones.

use super::RenderContext;
use super::colors::{bright_yellow, cyan, dim, green};
use super::spinner::{DEFAULT_INTERVAL_MS, spinner_frame};
use crate::activity::ToolEntry;
use crate::ansi::truncate_path;
use crate::config::HudConfig;
use crate::layout::{LayoutConstraints, Line};

/// Running tools shown at once.
pub const MAX_RUNNING_SHOWN: usize = 2;

fn running_tool(tool: &ToolEntry, icon: &str, max_path: usize) -> String {
    let target = tool
        .target
        .as_deref()
        .map(|t| dim(&format!(":{}", truncate_path(t, max_path))))
        .unwrap_or_default();
    format!("{} {}{target}", bright_yellow(icon), cyan(&tool.name))
}

pub fn tools_line(
    ctx: &RenderContext,
    config: &HudConfig,
    constraints: &LayoutConstraints,
) -> Option<Line> {
    let activity = &ctx.activity;
    if activity.tools.is_empty() {
        return None;
    }
    let icons = config.icon_mode.icons();
    let running_icon = if config.animations_enabled {
        spinner_frame(ctx.now_ms, config.spinner_style, DEFAULT_INTERVAL_MS)
    } else {
        icons.running
    };

    let mut line = Line::new();

    let running: Vec<&ToolEntry> = activity.running_tools().collect();
    for tool in &running[running.len().saturating_sub(MAX_RUNNING_SHOWN)..] {
        line.push_left(
            running_tool(tool, running_icon, constraints.max_path_length),
            0,
        );
    }

    let counts = activity.completed_tool_counts();
    if !counts.is_empty() {
        let tally: Vec<String> = counts
            .iter()
            .take(constraints.max_tools_shown)
            .map(|(name, n)| format!("{name}{}", dim(&format!("×{n}"))))
            .collect();
        line.push_right(
            format!("{} {}", green(icons.completed), tally.join(" ")),
            2,
        );
    }

    // Nothing running: the tally takes the left side.
    if line.left.is_empty() {
        line.left = std::mem::take(&mut line.right);
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::{SessionActivity, ToolStatus};
    use crate::ansi::strip_escapes;
    use crate::layout::LayoutEngine;

    fn tool(id: &str, name: &str, target: Option<&str>, status: ToolStatus) -> ToolEntry {
        ToolEntry {
            id: id.to_string(),
            name: name.to_string(),
            target: target.map(str::to_string),
            status,
            start_ms: 0,
            end_ms: None,
        }
    }

    fn ctx(tools: Vec<ToolEntry>) -> RenderContext {
        RenderContext {
            activity: SessionActivity::from_parts(tools, vec![], vec![]),
            ..RenderContext::default()
        }
    }

    fn static_icons() -> HudConfig {
        HudConfig {
            animations_enabled: false,
            ..HudConfig::default()
        }
    }

    fn rendered(ctx: &RenderContext, width: usize) -> Option<String> {
        let engine = LayoutEngine::new(width);
        let line = tools_line(ctx, &static_icons(), &engine.constraints())?;
        Some(strip_escapes(&engine.render_line(&line, 100)))
    }

    #[test]
    fn no_tools_no_line() {
        assert!(rendered(&ctx(vec![]), 120).is_none());
    }

    #[test]
    fn shows_last_two_running_with_targets() {
        let out = rendered(
            &ctx(vec![
                tool("1", "Grep", Some("fn main"), ToolStatus::Running),
                tool("2", "Read", Some("/home/dev/project/src/render/mod.rs"), ToolStatus::Running),
                tool("3", "Bash", Some("ls"), ToolStatus::Running),
                tool("4", "Edit", None, ToolStatus::Completed),
            ]),
            120,
        )
        .unwrap();
        assert!(!out.contains("Grep"));
        assert!(out.starts_with("● Read:.../mod.rs  ● Bash:ls"));
        assert!(out.ends_with("✓ Edit×1"));
    }

    #[test]
    fn completed_moves_left_when_idle() {
        let out = rendered(
            &ctx(vec![
                tool("1", "Read", None, ToolStatus::Completed),
                tool("2", "Read", None, ToolStatus::Error),
                tool("3", "Bash", None, ToolStatus::Completed),
            ]),
            120,
        )
        .unwrap();
        assert_eq!(out, "✓ Read×2 Bash×1");
    }

    #[test]
    fn tally_dropped_on_narrow_terminals() {
        let out = rendered(
            &ctx(vec![
                tool("1", "Read", None, ToolStatus::Running),
                tool("2", "Edit", None, ToolStatus::Completed),
            ]),
            70,
        )
        .unwrap();
        assert_eq!(out, "● Read");
    }

    #[test]
    fn tally_limited_by_layout() {
        let tools = ["A", "B", "C", "D", "E", "F", "G"]
            .iter()
            .enumerate()
            .map(|(i, n)| tool(&i.to_string(), n, None, ToolStatus::Completed))
            .collect();
        let out = rendered(&ctx(tools), 90).unwrap();
        assert_eq!(out, "✓ A×1 B×1 C×1 D×1 E×1");
    }

    #[test]
    fn animated_icon_is_spinner_frame() {
        let mut c = ctx(vec![tool("1", "Read", None, ToolStatus::Running)]);
        c.now_ms = 80;
        let engine = LayoutEngine::new(120);
        let line = tools_line(&c, &HudConfig::default(), &engine.constraints()).unwrap();
        assert!(strip_escapes(&line.left[0].content).starts_with("⠙ Read"));
    }
}
