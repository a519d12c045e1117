//! Context health row: usage against the ceiling, burn rate, trend and
//! what the window is spent on.

use super::RenderContext;
use super::colors::{dim, paint, red, yellow};
use super::format::{format_burn_rate, format_tokens, sparkline};
use crate::config::HudConfig;
use crate::context::HealthStatus;
use crate::layout::{LayoutConstraints, Line, Segment};

/// Burn rate (tokens/min) above which it is highlighted.
pub const HIGH_BURN_RATE: i64 = 5_000;

fn status_color(status: HealthStatus) -> &'static str {
    match status {
        HealthStatus::Healthy => super::colors::GREEN,
        HealthStatus::Warning => super::colors::YELLOW,
        HealthStatus::Critical => super::colors::RED,
    }
}

pub fn context_line(
    ctx: &RenderContext,
    config: &HudConfig,
    constraints: &LayoutConstraints,
) -> Option<Line> {
    let health = &ctx.context;
    if health.max_tokens == 0 || (health.tokens == 0 && health.token_history.is_empty()) {
        return None;
    }
    let color = status_color(health.status);

    let mut line = Line::new();
    line.push_left(
        format!(
            "{} {}{}",
            dim("ctx"),
            paint(color, &format_tokens(health.tokens)),
            dim(&format!(
                "/{} ({} left)",
                format_tokens(health.max_tokens),
                format_tokens(health.remaining)
            ))
        ),
        0,
    );

    let rate = format_burn_rate(health.burn_rate);
    let rate = if health.burn_rate > HIGH_BURN_RATE {
        yellow(&rate)
    } else {
        rate
    };
    line.push_left(format!("{} {rate}", dim("burn")), 1);

    // The trend is shown whole or not at all.
    let trend = sparkline(&health.token_history, constraints.bar_width);
    if !trend.is_empty() {
        let width = trend.chars().count();
        line.left.push(Segment::new(paint(color, &trend), 2).with_min_width(width));
    }

    let breakdown = &health.breakdown;
    if breakdown.total() > 0 {
        line.push_right(
            dim(&format!(
                "out:{}% in:{}%",
                breakdown.share(breakdown.tool_outputs),
                breakdown.share(breakdown.tool_inputs)
            )),
            3,
        );
    }

    if ctx.compaction_count > 0 {
        line.push_right(dim(&format!("compacted×{}", ctx.compaction_count)), 2);
    }

    let badge = format!("{} {}", config.icon_mode.icons().warning, health.status.as_str());
    match health.status {
        HealthStatus::Healthy => {}
        HealthStatus::Warning => line.push_right(yellow(&badge), 1),
        HealthStatus::Critical => line.push_right(red(&badge), 0),
    }

    Some(line)
}
