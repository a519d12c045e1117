//! Session events delivered by the assistant's hook system.
//!
//! Events arrive as one JSON object per line. Both the HUD's own camelCase
//! shape (`{"event": "PostToolUse", "transcriptPath": ...}`) and the raw hook
//! payload field names (`hook_event_name`, `tool_name`, `tool_input`, ...)
//! are accepted.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lifecycle point an event was emitted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    PreToolUse,
    PostToolUse,
    Stop,
    SubagentStop,
    PreCompact,
    UserPromptSubmit,
    SessionStart,
    /// Any tag this build does not know about. Accepted and ignored.
    #[serde(other)]
    Unknown,
}

/// A single session event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HudEvent {
    #[serde(alias = "hook_event_name")]
    pub event: EventKind,
    #[serde(default, alias = "transcript_path")]
    pub transcript_path: Option<String>,
    #[serde(default, alias = "tool_name")]
    pub tool: Option<String>,
    #[serde(default, alias = "tool_use_id")]
    pub tool_use_id: Option<String>,
    #[serde(default, alias = "tool_input")]
    pub input: Option<Value>,
    #[serde(default, alias = "tool_response")]
    pub response: Option<Value>,
    #[serde(default)]
    pub cwd: Option<String>,
    #[serde(default, alias = "session_id")]
    pub session_id: Option<String>,
}

impl HudEvent {
    /// Event with only a kind set.
    pub fn new(event: EventKind) -> Self {
        Self {
            event,
            transcript_path: None,
            tool: None,
            tool_use_id: None,
            input: None,
            response: None,
            cwd: None,
            session_id: None,
        }
    }

    /// Parse one line of the event stream. Blank lines and malformed JSON
    /// yield `None`.
    pub fn parse_line(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        serde_json::from_str(line).ok()
    }

    pub fn with_tool(mut self, name: impl Into<String>, id: impl Into<String>) -> Self {
        self.tool = Some(name.into());
        self.tool_use_id = Some(id.into());
        self
    }

    pub fn with_input(mut self, input: Value) -> Self {
        self.input = Some(input);
        self
    }

    pub fn with_response(mut self, response: Value) -> Self {
        self.response = Some(response);
        self
    }

    pub fn with_transcript(mut self, path: impl Into<String>) -> Self {
        self.transcript_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parses_hud_shape() {
        let ev = HudEvent::parse_line(
            r#"{"event":"PostToolUse","transcriptPath":"/tmp/t.jsonl","tool":"Read","toolUseId":"t1","input":{"file_path":"a.rs"}}"#,
        )
        .unwrap();
        assert_eq!(ev.event, EventKind::PostToolUse);
        assert_eq!(ev.transcript_path.as_deref(), Some("/tmp/t.jsonl"));
        assert_eq!(ev.tool.as_deref(), Some("Read"));
        assert_eq!(ev.input, Some(json!({"file_path": "a.rs"})));
        assert!(ev.response.is_none());
    }

    #[test]
    fn parses_hook_payload_shape() {
        let ev = HudEvent::parse_line(
            r#"{"hook_event_name":"PreToolUse","transcript_path":"/t","tool_name":"Bash","tool_use_id":"x","tool_input":{"command":"ls"}}"#,
        )
        .unwrap();
        assert_eq!(ev.event, EventKind::PreToolUse);
        assert_eq!(ev.tool_use_id.as_deref(), Some("x"));
        assert_eq!(ev.input, Some(json!({"command": "ls"})));
    }

    #[test]
    fn unknown_kinds_are_accepted() {
        let ev = HudEvent::parse_line(r#"{"event":"Notification"}"#).unwrap();
        assert_eq!(ev.event, EventKind::Unknown);
    }

    #[test]
    fn garbage_lines_are_rejected() {
        assert!(HudEvent::parse_line("").is_none());
        assert!(HudEvent::parse_line("{not json").is_none());
        assert!(HudEvent::parse_line(r#"{"tool":"Read"}"#).is_none());
    }
}
