//! Daily usage row from the aggregated stats cache.

use super::RenderContext;
use super::colors::{cyan, dim};
use super::format::format_tokens_precise;
use crate::config::HudConfig;
use crate::layout::{LayoutConstraints, Line};

pub fn stats_line(
    ctx: &RenderContext,
    _config: &HudConfig,
    _constraints: &LayoutConstraints,
) -> Option<Line> {
    let stats = ctx.stats.as_ref()?;
    if stats.today_tokens == 0 && stats.today_messages == 0 && stats.cache_read_tokens == 0 {
        return None;
    }

    let mut line = Line::new().with_left(
        format!(
            "{} {}{}",
            dim("today"),
            format_tokens_precise(stats.today_tokens),
            dim(&format!(" · {} msgs", stats.today_messages))
        ),
        1,
    );
    if stats.today_sessions > 0 {
        line.push_left(dim(&format!("{} sessions", stats.today_sessions)), 3);
    }
    if stats.cache_read_tokens > 0 {
        line.push_right(
            cyan(&format!(
                "{} cached",
                format_tokens_precise(stats.cache_read_tokens)
            )),
            2,
        );
    }
    Some(line)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ansi::strip_escapes;
    use crate::layout::LayoutEngine;
    use crate::sources::TokenStats;

    fn ctx(stats: Option<TokenStats>) -> RenderContext {
        RenderContext {
            stats,
            ..RenderContext::default()
        }
    }

    #[test]
    fn absent_or_idle_stats_hide_the_row() {
        let engine = LayoutEngine::new(120);
        let c = engine.constraints();
        assert!(stats_line(&ctx(None), &HudConfig::default(), &c).is_none());
        assert!(stats_line(&ctx(Some(TokenStats::default())), &HudConfig::default(), &c).is_none());
    }

    #[test]
    fn today_and_cache() {
        let engine = LayoutEngine::new(120);
        let stats = TokenStats {
            today_tokens: 12_340,
            today_messages: 8,
            today_sessions: 2,
            cache_read_tokens: 9_000,
            ..TokenStats::default()
        };
        let line = stats_line(&ctx(Some(stats)), &HudConfig::default(), &engine.constraints()).unwrap();
        let out = strip_escapes(&engine.render_line(&line, 80));
        assert!(out.starts_with("today 12.3k · 8 msgs  2 sessions"));
        assert!(out.ends_with("9.0k cached"));
    }
}
