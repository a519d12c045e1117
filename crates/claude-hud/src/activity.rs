//! Running record of what the session is doing: tool calls, sub-agents and
//! the todo list.
//!
//! Fed from the same hook events as the context tracker. `Task` tool calls
//! become sub-agents instead of tool entries, and `TodoWrite` replaces the
//! todo list wholesale.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use crate::event::{EventKind, HudEvent};

/// Tool entries kept before the oldest are dropped.
pub const MAX_TOOL_HISTORY: usize = 50;
/// Agent entries kept before the oldest are dropped.
pub const MAX_AGENT_HISTORY: usize = 20;

/// Tool that spawns a sub-agent.
pub const TASK_TOOL: &str = "Task";
/// Tool that rewrites the todo list.
pub const TODO_TOOL: &str = "TodoWrite";

/// Input keys that name what a tool is working on, in lookup order.
const TARGET_KEYS: &[&str] = &["file_path", "path", "pattern", "command"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolStatus {
    Running,
    Completed,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolEntry {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub target: Option<String>,
    pub status: ToolStatus,
    pub start_ms: i64,
    #[serde(default)]
    pub end_ms: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentStatus {
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub agent_type: String,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    pub status: AgentStatus,
    pub start_ms: i64,
    #[serde(default)]
    pub end_ms: Option<i64>,
}

impl AgentEntry {
    /// Milliseconds between start and end, or start and `now_ms` while
    /// still running.
    pub fn elapsed_ms(&self, now_ms: i64) -> i64 {
        (self.end_ms.unwrap_or(now_ms) - self.start_ms).max(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub content: String,
    pub status: TodoStatus,
}

/// Extract the tool's target from its input (`file_path`, `path`, `pattern`
/// or `command`, first non-empty string wins).
pub fn tool_target(input: &Value) -> Option<String> {
    TARGET_KEYS
        .iter()
        .filter_map(|key| input.get(key).and_then(Value::as_str))
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parse a `TodoWrite` input. Items that do not fit the expected shape are
/// skipped.
pub fn parse_todos(input: &Value) -> Option<Vec<TodoItem>> {
    let items = input.get("todos")?.as_array()?;
    Some(
        items
            .iter()
            .filter_map(|item| serde_json::from_value(item.clone()).ok())
            .collect(),
    )
}

fn is_error_response(response: Option<&Value>) -> bool {
    let Some(response) = response else {
        return false;
    };
    response.get("is_error").and_then(Value::as_bool) == Some(true)
        || response.get("error").is_some_and(|e| !e.is_null())
}

/// Tools, agents and todos seen so far in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionActivity {
    pub tools: Vec<ToolEntry>,
    pub agents: Vec<AgentEntry>,
    pub todos: Vec<TodoItem>,
    #[serde(skip)]
    next_id: u64,
}

impl SessionActivity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Activity restored from already-known entries, e.g. a render context
    /// built elsewhere. Locally generated ids continue past the entries
    /// given so they cannot collide with earlier ones.
    pub fn from_parts(tools: Vec<ToolEntry>, agents: Vec<AgentEntry>, todos: Vec<TodoItem>) -> Self {
        let next_id = (tools.len() + agents.len()) as u64;
        Self {
            tools,
            agents,
            todos,
            next_id,
        }
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Apply one session event observed at `now_ms`.
    pub fn handle_event(&mut self, event: &HudEvent, now_ms: i64) {
        match event.event {
            EventKind::PreToolUse => self.on_tool_start(event, now_ms),
            EventKind::PostToolUse => self.on_tool_end(event, now_ms),
            EventKind::SubagentStop => self.on_subagent_stop(event.tool_use_id.as_deref(), now_ms),
            EventKind::SessionStart => self.clear(),
            _ => {}
        }
    }

    fn event_id(&mut self, event: &HudEvent) -> String {
        match &event.tool_use_id {
            Some(id) => id.clone(),
            None => {
                self.next_id += 1;
                format!("local-{}", self.next_id)
            }
        }
    }

    fn on_tool_start(&mut self, event: &HudEvent, now_ms: i64) {
        let Some(name) = event.tool.clone() else {
            return;
        };
        let input = event.input.as_ref();

        match name.as_str() {
            TODO_TOOL => {
                if let Some(todos) = input.and_then(parse_todos) {
                    trace!("Todo list replaced ({} items)", todos.len());
                    self.todos = todos;
                }
            }
            TASK_TOOL => {
                let id = self.event_id(event);
                let field = |key: &str| {
                    input
                        .and_then(|i| i.get(key))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                let agent = AgentEntry {
                    id,
                    agent_type: field("subagent_type").unwrap_or_else(|| "agent".to_string()),
                    model: field("model"),
                    description: field("description"),
                    status: AgentStatus::Running,
                    start_ms: now_ms,
                    end_ms: None,
                };
                debug!("Sub-agent started: {}", agent.agent_type);
                self.agents.push(agent);
                truncate_front(&mut self.agents, MAX_AGENT_HISTORY);
            }
            _ => {
                let id = self.event_id(event);
                self.tools.push(ToolEntry {
                    id,
                    target: input.and_then(tool_target),
                    name,
                    status: ToolStatus::Running,
                    start_ms: now_ms,
                    end_ms: None,
                });
                truncate_front(&mut self.tools, MAX_TOOL_HISTORY);
            }
        }
    }

    fn on_tool_end(&mut self, event: &HudEvent, now_ms: i64) {
        let Some(name) = event.tool.as_deref() else {
            return;
        };

        match name {
            TODO_TOOL => {
                if let Some(todos) = event.input.as_ref().and_then(parse_todos) {
                    self.todos = todos;
                }
            }
            TASK_TOOL => self.on_subagent_stop(event.tool_use_id.as_deref(), now_ms),
            _ => {
                let status = if is_error_response(event.response.as_ref()) {
                    ToolStatus::Error
                } else {
                    ToolStatus::Completed
                };

                let id = event.tool_use_id.as_deref();
                let running = self.tools.iter_mut().rev().find(|t| {
                    t.status == ToolStatus::Running
                        && match id {
                            Some(id) => t.id == id,
                            None => t.name == name,
                        }
                });

                match running {
                    Some(tool) => {
                        tool.status = status;
                        tool.end_ms = Some(now_ms);
                    }
                    None => {
                        // Completion without a start: record it as instantaneous.
                        let id = self.event_id(event);
                        self.tools.push(ToolEntry {
                            id,
                            name: name.to_string(),
                            target: event.input.as_ref().and_then(tool_target),
                            status,
                            start_ms: now_ms,
                            end_ms: Some(now_ms),
                        });
                        truncate_front(&mut self.tools, MAX_TOOL_HISTORY);
                    }
                }
            }
        }
    }

    /// Complete the agent with `id`, or the oldest running agent.
    fn on_subagent_stop(&mut self, id: Option<&str>, now_ms: i64) {
        let by_id = id.and_then(|id| {
            self.agents
                .iter()
                .position(|a| a.status == AgentStatus::Running && a.id == id)
        });
        let index = by_id.or_else(|| {
            self.agents
                .iter()
                .position(|a| a.status == AgentStatus::Running)
        });

        if let Some(agent) = index.and_then(|i| self.agents.get_mut(i)) {
            agent.status = AgentStatus::Completed;
            agent.end_ms = Some(now_ms);
            debug!("Sub-agent finished: {}", agent.agent_type);
        }
    }

    pub fn running_tools(&self) -> impl Iterator<Item = &ToolEntry> {
        self.tools.iter().filter(|t| t.status == ToolStatus::Running)
    }

    /// Finished tool counts per name, most used first. Ties keep first-seen
    /// order.
    pub fn completed_tool_counts(&self) -> Vec<(String, usize)> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for tool in self.tools.iter().filter(|t| t.status != ToolStatus::Running) {
            match counts.iter_mut().find(|(name, _)| *name == tool.name) {
                Some((_, n)) => *n += 1,
                None => counts.push((tool.name.clone(), 1)),
            }
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }

    /// Running agents followed by the two most recently completed, at most
    /// three in total (the latest kept).
    pub fn agents_to_show(&self) -> Vec<&AgentEntry> {
        let running = self
            .agents
            .iter()
            .filter(|a| a.status == AgentStatus::Running);
        let completed: Vec<&AgentEntry> = self
            .agents
            .iter()
            .filter(|a| a.status == AgentStatus::Completed)
            .collect();
        let recent = &completed[completed.len().saturating_sub(2)..];

        let shown: Vec<&AgentEntry> = running.chain(recent.iter().copied()).collect();
        let skip = shown.len().saturating_sub(3);
        shown.into_iter().skip(skip).collect()
    }

    pub fn todo_in_progress(&self) -> Option<&TodoItem> {
        self.todos
            .iter()
            .find(|t| t.status == TodoStatus::InProgress)
    }

    /// `(completed, total)` todo counts.
    pub fn todo_progress(&self) -> (usize, usize) {
        let done = self
            .todos
            .iter()
            .filter(|t| t.status == TodoStatus::Completed)
            .count();
        (done, self.todos.len())
    }
}

fn truncate_front<T>(items: &mut Vec<T>, cap: usize) {
    if items.len() > cap {
        let excess = items.len() - cap;
        items.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pre(tool: &str, id: &str, input: Value) -> HudEvent {
        HudEvent::new(EventKind::PreToolUse)
            .with_tool(tool, id)
            .with_input(input)
    }

    fn post(tool: &str, id: &str) -> HudEvent {
        HudEvent::new(EventKind::PostToolUse).with_tool(tool, id)
    }

    #[test]
    fn target_lookup_order() {
        assert_eq!(
            tool_target(&json!({"command": "ls", "file_path": "src/main.rs"})),
            Some("src/main.rs".to_string())
        );
        assert_eq!(
            tool_target(&json!({"pattern": "*.rs"})),
            Some("*.rs".to_string())
        );
        assert_eq!(tool_target(&json!({"path": ""})), None);
        assert_eq!(tool_target(&json!({"query": "x"})), None);
    }

    #[test]
    fn tool_lifecycle() {
        let mut activity = SessionActivity::new();
        activity.handle_event(&pre("Read", "t1", json!({"file_path": "a.rs"})), 100);
        activity.handle_event(&pre("Bash", "t2", json!({"command": "cargo fmt"})), 110);
        assert_eq!(activity.running_tools().count(), 2);

        activity.handle_event(&post("Read", "t1"), 200);
        let read = &activity.tools[0];
        assert_eq!(read.status, ToolStatus::Completed);
        assert_eq!(read.end_ms, Some(200));
        assert_eq!(read.target.as_deref(), Some("a.rs"));

        activity.handle_event(
            &post("Bash", "t2").with_response(json!({"is_error": true})),
            300,
        );
        assert_eq!(activity.tools[1].status, ToolStatus::Error);
        assert_eq!(activity.running_tools().count(), 0);
    }

    #[test]
    fn completion_without_start_is_recorded() {
        let mut activity = SessionActivity::new();
        activity.handle_event(&post("Grep", "g1").with_input(json!({"pattern": "fn"})), 50);
        assert_eq!(activity.tools.len(), 1);
        assert_eq!(activity.tools[0].status, ToolStatus::Completed);
        assert_eq!(activity.tools[0].start_ms, 50);
    }

    #[test]
    fn completed_counts_most_used_first() {
        let mut activity = SessionActivity::new();
        for (i, name) in ["Read", "Edit", "Edit", "Bash", "Edit", "Read"].iter().enumerate() {
            let id = format!("t{i}");
            activity.handle_event(&pre(name, &id, json!({})), 0);
            activity.handle_event(&post(name, &id), 1);
        }
        assert_eq!(
            activity.completed_tool_counts(),
            vec![
                ("Edit".to_string(), 3),
                ("Read".to_string(), 2),
                ("Bash".to_string(), 1)
            ]
        );
    }

    #[test]
    fn tool_history_is_capped() {
        let mut activity = SessionActivity::new();
        for i in 0..(MAX_TOOL_HISTORY + 5) {
            activity.handle_event(&pre("Read", &format!("t{i}"), json!({})), i as i64);
        }
        assert_eq!(activity.tools.len(), MAX_TOOL_HISTORY);
        assert_eq!(activity.tools[0].id, "t5");
    }

    #[test]
    fn task_tool_becomes_agent() {
        let mut activity = SessionActivity::new();
        activity.handle_event(
            &pre(
                "Task",
                "a1",
                json!({"subagent_type": "explore", "description": "Find callers", "model": "haiku"}),
            ),
            1_000,
        );
        assert!(activity.tools.is_empty());
        let agent = &activity.agents[0];
        assert_eq!(agent.agent_type, "explore");
        assert_eq!(agent.model.as_deref(), Some("haiku"));
        assert_eq!(agent.elapsed_ms(4_000), 3_000);

        activity.handle_event(&HudEvent::new(EventKind::SubagentStop), 5_000);
        assert_eq!(activity.agents[0].status, AgentStatus::Completed);
        assert_eq!(activity.agents[0].elapsed_ms(9_000), 4_000);
    }

    #[test]
    fn agents_shown_running_then_recent_completed() {
        let mut activity = SessionActivity::new();
        for i in 0..4 {
            activity.handle_event(&pre("Task", &format!("a{i}"), json!({})), i);
        }
        activity.handle_event(&post("Task", "a0"), 10);
        activity.handle_event(&post("Task", "a1"), 11);
        activity.handle_event(&post("Task", "a2"), 12);

        // Running: a3. Recent completed: a1, a2. Three total.
        let ids: Vec<&str> = activity
            .agents_to_show()
            .iter()
            .map(|a| a.id.as_str())
            .collect();
        assert_eq!(ids, vec!["a3", "a1", "a2"]);
    }

    #[test]
    fn todo_write_replaces_list() {
        let mut activity = SessionActivity::new();
        activity.handle_event(
            &pre(
                "TodoWrite",
                "w1",
                json!({"todos": [
                    {"content": "Parse input", "status": "completed"},
                    {"content": "Render box", "status": "in_progress"},
                    {"content": "Ship", "status": "pending"},
                    {"bogus": true}
                ]}),
            ),
            0,
        );
        assert!(activity.tools.is_empty());
        assert_eq!(activity.todos.len(), 3);
        assert_eq!(activity.todo_progress(), (1, 3));
        assert_eq!(
            activity.todo_in_progress().map(|t| t.content.as_str()),
            Some("Render box")
        );

        activity.handle_event(
            &pre("TodoWrite", "w2", json!({"todos": [{"content": "Ship", "status": "completed"}]})),
            1,
        );
        assert_eq!(activity.todo_progress(), (1, 1));
        assert!(activity.todo_in_progress().is_none());
    }

    #[test]
    fn restored_activity_keeps_growing() {
        let restored = ToolEntry {
            id: "local-1".to_string(),
            name: "Read".to_string(),
            target: None,
            status: ToolStatus::Completed,
            start_ms: 0,
            end_ms: Some(5),
        };
        let mut activity = SessionActivity::from_parts(vec![restored], vec![], vec![]);
        assert_eq!(activity.completed_tool_counts(), vec![("Read".to_string(), 1)]);

        let mut ev = HudEvent::new(EventKind::PreToolUse);
        ev.tool = Some("Bash".to_string());
        activity.handle_event(&ev, 10);
        assert_eq!(activity.tools.len(), 2);
        assert_ne!(activity.tools[1].id, "local-1");
        assert_eq!(activity.running_tools().count(), 1);
    }

    #[test]
    fn session_start_clears() {
        let mut activity = SessionActivity::new();
        activity.handle_event(&pre("Read", "t1", json!({})), 0);
        activity.handle_event(&HudEvent::new(EventKind::SessionStart), 1);
        assert_eq!(activity, SessionActivity::default());
    }
}
