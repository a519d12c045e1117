//! Live session state for watch mode.
//!
//! [`HudSession`] owns everything that changes while the assistant runs
//! (context tracker, tool/agent/todo activity, the file-backed readers) and
//! folds each incoming [`HudEvent`] into it. [`HudSession::render_context`]
//! snapshots the result for the renderer.

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::activity::SessionActivity;
use crate::clock::{Clock, SystemClock};
use crate::context::ContextTracker;
use crate::event::{EventKind, HudEvent};
use crate::render::RenderContext;
use crate::render::format::format_session_duration;
use crate::sources::SessionSources;

/// Placeholder model name written by the settings reader when none is set.
const UNKNOWN_MODEL: &str = "unknown";

#[derive(Debug)]
pub struct HudSession<C: Clock + Copy = SystemClock> {
    clock: C,
    tracker: ContextTracker<C>,
    activity: SessionActivity,
    sources: SessionSources<C>,
    cwd: Option<PathBuf>,
    events_seen: u64,
}

impl HudSession<SystemClock> {
    pub fn new(claude_dir: impl Into<PathBuf>) -> Self {
        Self::with_clock(claude_dir, SystemClock)
    }
}

impl<C: Clock + Copy> HudSession<C> {
    pub fn with_clock(claude_dir: impl Into<PathBuf>, clock: C) -> Self {
        Self {
            clock,
            tracker: ContextTracker::with_clock(clock),
            activity: SessionActivity::new(),
            sources: SessionSources::with_clock(claude_dir, clock),
            cwd: None,
            events_seen: 0,
        }
    }

    /// Start from a known working directory instead of waiting for an
    /// event to carry one.
    pub fn with_cwd(mut self, cwd: impl Into<PathBuf>) -> Self {
        self.cwd = Some(cwd.into());
        self
    }

    /// Fold one event into the session.
    ///
    /// `SessionStart` wipes the tracker and the activity lists before the
    /// event is applied, so a new conversation starts from an empty box.
    pub fn handle_event(&mut self, event: &HudEvent) {
        self.events_seen += 1;
        trace!("Event #{}: {:?}", self.events_seen, event.event);

        if event.event == EventKind::SessionStart {
            debug!("New session, resetting tracker");
            self.tracker.reset();
        }
        if let Some(cwd) = event.cwd.as_deref().filter(|c| !c.is_empty()) {
            self.cwd = Some(PathBuf::from(cwd));
        }

        self.tracker.handle_event(event);
        self.activity.handle_event(event, self.clock.now_ms());
        trace!("{}", self.tracker.health().to_log_string());
    }

    pub fn tracker(&self) -> &ContextTracker<C> {
        &self.tracker
    }

    pub fn activity(&self) -> &SessionActivity {
        &self.activity
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn events_seen(&self) -> u64 {
        self.events_seen
    }

    /// Everything the renderer needs, as of now.
    ///
    /// The model comes from the transcript when one has been reconciled,
    /// otherwise from the user's settings.
    pub fn render_context(&mut self) -> RenderContext {
        let now = self.clock.now_ms();
        let counts = self.sources.config_counts(self.cwd.as_deref());
        let stats = self.sources.stats();

        let model = match self.tracker.model() {
            Some(m) => Some(m.to_string()),
            None => self
                .sources
                .settings
                .read()
                .map(|s| s.model.clone())
                .filter(|m| m != UNKNOWN_MODEL),
        };

        RenderContext {
            model,
            context: self.tracker.health(),
            counts,
            session_duration: Some(format_session_duration(
                now - self.tracker.session_start(),
            )),
            activity: self.activity.clone(),
            stats,
            compaction_count: self.tracker.compaction_count(),
            now_ms: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ToolStatus;
    use crate::clock::ManualClock;
    use serde_json::json;
    use std::fs;

    #[test]
    fn tool_events_feed_tracker_and_activity() {
        let home = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(1_000);
        let mut session = HudSession::with_clock(home.path(), &clock);

        session.handle_event(
            &HudEvent::new(EventKind::PreToolUse)
                .with_tool("Read", "t1")
                .with_input(json!("123456")),
        );
        assert_eq!(session.activity().tools[0].status, ToolStatus::Running);

        clock.advance(2_000);
        session.handle_event(
            &HudEvent::new(EventKind::PostToolUse)
                .with_tool("Read", "t1")
                .with_input(json!("123456")),
        );
        assert_eq!(session.activity().tools[0].status, ToolStatus::Completed);
        assert_eq!(session.tracker().total_tokens(), 2);

        let ctx = session.render_context();
        assert_eq!(ctx.context.tokens, 2);
        assert_eq!(ctx.now_ms, 3_000);
        assert_eq!(ctx.session_duration.as_deref(), Some("<1m"));
        assert_eq!(session.events_seen(), 2);
    }

    #[test]
    fn session_start_clears_everything() {
        let home = tempfile::tempdir().unwrap();
        let clock = ManualClock::new(0);
        let mut session = HudSession::with_clock(home.path(), &clock);
        session.handle_event(
            &HudEvent::new(EventKind::PostToolUse)
                .with_tool("Bash", "t1")
                .with_input(json!({"command": "cargo doc"})),
        );
        session.handle_event(&HudEvent::new(EventKind::PreCompact));
        assert!(session.tracker().total_tokens() > 0);

        session.handle_event(&HudEvent::new(EventKind::SessionStart));
        let ctx = session.render_context();
        assert_eq!(ctx.context.tokens, 0);
        assert!(ctx.activity.tools.is_empty());
    }

    #[test]
    fn model_falls_back_to_settings() {
        let home = tempfile::tempdir().unwrap();
        fs::write(home.path().join("settings.json"), r#"{"model": "sonnet"}"#).unwrap();
        let clock = ManualClock::new(0);
        let mut session = HudSession::with_clock(home.path(), &clock);
        assert_eq!(session.render_context().model.as_deref(), Some("sonnet"));
    }

    #[test]
    fn cwd_follows_events() {
        let home = tempfile::tempdir().unwrap();
        let project = tempfile::tempdir().unwrap();
        fs::write(project.path().join("CLAUDE.md"), "# rules").unwrap();
        let clock = ManualClock::new(0);
        let mut session = HudSession::with_clock(home.path(), &clock);
        assert_eq!(session.render_context().counts.claude_md_count, 0);

        let mut ev = HudEvent::new(EventKind::UserPromptSubmit);
        ev.cwd = Some(project.path().to_string_lossy().into_owned());
        session.handle_event(&ev);
        assert_eq!(session.cwd(), Some(project.path()));
        assert_eq!(session.render_context().counts.claude_md_count, 1);
    }
}
