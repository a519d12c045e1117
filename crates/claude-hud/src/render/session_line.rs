//! First dashboard row: model, context bar, config counts and session time.

use super::RenderContext;
use super::colors::{bold, cyan, dim, red};
use super::format::format_tokens;
use super::gradient::{ColorMode, colored_percent, gradient_bar, simple_bar};
use crate::config::HudConfig;
use crate::context::health::CRITICAL_PERCENT;
use crate::layout::{LayoutConstraints, Line};
use crate::render::icons::IconMode;

/// Usage at which the compaction warning replaces everything optional.
pub const COMPACT_WARNING_PERCENT: u8 = 95;

pub fn session_line(
    ctx: &RenderContext,
    config: &HudConfig,
    constraints: &LayoutConstraints,
) -> Option<Line> {
    let icons = config.icon_mode.icons();
    let nerd = config.icon_mode == IconMode::Nerd;
    let percent = ctx.context.percent.min(100);
    let model = ctx.model.as_deref().unwrap_or("Unknown");

    // No partial cells with the basic palette.
    let bar = match config.color_mode {
        ColorMode::Basic => simple_bar(percent, constraints.bar_width, config.color_mode),
        _ => gradient_bar(percent, constraints.bar_width, config.color_mode),
    };

    let mut line = Line::new();
    line.push_left(cyan(&bold(model)), 0);
    line.push_left(
        format!("{bar} {}", colored_percent(percent, config.color_mode)),
        0,
    );

    let counts = &ctx.counts;
    let mut parts = Vec::new();
    if counts.claude_md_count > 0 && config.show_claude_md_count {
        let glyph = if nerd { icons.claude_md } else { "#" };
        parts.push(format!("{}{glyph}", counts.claude_md_count));
    }
    if counts.rules_count > 0 && config.show_rules_count {
        parts.push(format!("{}R", counts.rules_count));
    }
    if counts.mcp_count > 0 && config.show_mcp_count {
        parts.push(format!("{}M", counts.mcp_count));
    }
    if counts.hooks_count > 0 && config.show_hooks_count {
        parts.push(format!("{}H", counts.hooks_count));
    }
    if counts.plugin_count > 0 && config.show_plugin_count {
        parts.push(format!("{}P", counts.plugin_count));
    }
    if !parts.is_empty() {
        line.push_left(dim(&parts.join(" ")), 2);
    }

    if config.show_session_duration
        && let Some(duration) = ctx.session_duration.as_deref().filter(|d| !d.is_empty())
    {
        line.push_right(dim(duration), 1);
    }

    if percent >= CRITICAL_PERCENT {
        let breakdown = &ctx.context.breakdown;
        if breakdown.total() > 0 {
            line.push_right(
                dim(&format!(
                    "{}+{}",
                    format_tokens(breakdown.tool_inputs),
                    format_tokens(breakdown.messages)
                )),
                3,
            );
        }
    }

    if percent >= COMPACT_WARNING_PERCENT {
        let glyph = if nerd { icons.warning } else { "!" };
        line.push_right(red(&format!("{glyph} COMPACT")), 0);
    }

    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_escapes;
    use crate::context::{ContextBreakdown, ContextHealth};
    use crate::layout::LayoutEngine;
    use crate::sources::ConfigCounts;

    fn ctx(percent: u8) -> RenderContext {
        RenderContext {
            model: Some("Opus".to_string()),
            context: ContextHealth {
                percent,
                breakdown: ContextBreakdown {
                    tool_inputs: 150_000,
                    tool_outputs: 2_000,
                    messages: 40_000,
                    other: 0,
                },
                ..ContextHealth::default()
            },
            counts: ConfigCounts {
                claude_md_count: 2,
                rules_count: 0,
                mcp_count: 3,
                hooks_count: 1,
                plugin_count: 0,
            },
            session_duration: Some("12m".to_string()),
            ..RenderContext::default()
        }
    }

    fn rendered(ctx: &RenderContext, config: &HudConfig, width: usize) -> String {
        let engine = LayoutEngine::new(width);
        let line = session_line(ctx, config, &engine.constraints()).unwrap();
        strip_escapes(&engine.render_line(&line, 100))
    }

    #[test]
    fn wide_terminal_shows_everything() {
        let out = rendered(&ctx(40), &HudConfig::default(), 140);
        assert!(out.starts_with("Opus  "));
        assert!(out.contains("40%"));
        assert!(out.contains("2# 3M 1H"));
        assert!(out.ends_with("12m"));
        assert!(!out.contains("COMPACT"));
    }

    #[test]
    fn hidden_counts_respect_config() {
        let config = HudConfig {
            show_mcp_count: false,
            show_session_duration: false,
            ..HudConfig::default()
        };
        let out = rendered(&ctx(40), &config, 140);
        assert!(out.contains("2# 1H"));
        assert!(!out.contains("12m"));
    }

    #[test]
    fn high_usage_adds_breakdown_and_warning() {
        let out = rendered(&ctx(96), &HudConfig::default(), 140);
        assert!(out.contains("150k+40k"));
        assert!(out.ends_with("! COMPACT"));
    }

    #[test]
    fn compact_warning_survives_ultra_compact() {
        let out = rendered(&ctx(96), &HudConfig::default(), 40);
        assert!(out.ends_with("! COMPACT"));
        assert!(!out.contains("12m"));
        assert!(!out.contains("2#"));
    }

    #[test]
    fn plugin_count_is_optional() {
        let mut with_plugins = ctx(40);
        with_plugins.counts.plugin_count = 4;
        let out = rendered(&with_plugins, &HudConfig::default(), 140);
        assert!(out.contains("2# 3M 1H 4P"));

        let config = HudConfig {
            show_plugin_count: false,
            ..HudConfig::default()
        };
        let out = rendered(&with_plugins, &config, 140);
        assert!(out.contains("2# 3M 1H"));
        assert!(!out.contains("4P"));
    }

    #[test]
    fn basic_colors_draw_whole_cells() {
        let engine = LayoutEngine::new(140);
        let config = HudConfig {
            color_mode: ColorMode::Basic,
            ..HudConfig::default()
        };
        let line = session_line(&ctx(37), &config, &engine.constraints()).unwrap();
        let bar = strip_escapes(&line.left[1].content);
        let cells: String = bar.chars().take(20).collect();
        assert!(cells.chars().all(|c| c == '█' || c == '░'), "{cells}");
        assert_eq!(cells.chars().filter(|&c| c == '█').count(), 7);

        // The gradient bar ends its fill on a partial cell.
        let line = session_line(&ctx(37), &HudConfig::default(), &engine.constraints()).unwrap();
        let bar = strip_escapes(&line.left[1].content);
        assert!(bar.chars().take(20).any(|c| c != '█' && c != '░'));
    }

    #[test]
    fn bar_width_follows_layout() {
        let engine = LayoutEngine::new(140);
        let line = session_line(&ctx(0), &HudConfig::default(), &engine.constraints()).unwrap();
        let bar = strip_escapes(&line.left[1].content);
        assert_eq!(bar.chars().count(), 20 + " 0%".len());
    }
}
