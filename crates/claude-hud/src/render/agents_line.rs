//! Sub-agent rows, one per shown agent.

use super::RenderContext;
use super::colors::{bright_yellow, dim, green, magenta};
use super::format::format_elapsed;
use crate::activity::{AgentEntry, AgentStatus};
use crate::ansi::{TruncatePosition, truncate};
use crate::config::HudConfig;
use crate::layout::{LayoutConstraints, Line};

fn agent_line(
    agent: &AgentEntry,
    config: &HudConfig,
    constraints: &LayoutConstraints,
    now_ms: i64,
) -> Line {
    let icons = config.icon_mode.icons();
    let status = match agent.status {
        AgentStatus::Running => bright_yellow(icons.running),
        AgentStatus::Completed => green(icons.completed),
    };
    let model = agent
        .model
        .as_deref()
        .map(|m| dim(&format!("[{m}]")))
        .unwrap_or_default();

    let mut line = Line::new().with_left(
        format!("{status} {}{model}", magenta(&agent.agent_type)),
        0,
    );
    if let Some(description) = agent.description.as_deref().filter(|d| !d.is_empty()) {
        line.push_left(
            dim(&truncate(
                description,
                constraints.max_desc_length,
                TruncatePosition::End,
            )),
            1,
        );
    }
    line.with_right(dim(&format_elapsed(agent.elapsed_ms(now_ms))), 1)
}

/// Lines for the running agents and the two most recently completed ones,
/// three at most.
pub fn agents_lines(
    ctx: &RenderContext,
    config: &HudConfig,
    constraints: &LayoutConstraints,
) -> Vec<Line> {
    ctx.activity
        .agents_to_show()
        .into_iter()
        .map(|agent| agent_line(agent, config, constraints, ctx.now_ms))
        .collect()
}
