//! Terminal status dashboard for AI coding assistant sessions.
//!
//! `claude-hud` turns the assistant's hook events and on-disk state into a
//! small bordered box of status lines: model and context usage, running
//! tools, sub-agents, todo progress and daily usage. Every line is built
//! from prioritized [`Segment`](layout::Segment)s so the same content
//! degrades gracefully from a wide terminal down to a 40-column pane.
//!
//! # Getting started
//!
//! ```
//! use claude_hud::prelude::*;
//! use serde_json::json;
//!
//! let mut tracker = ContextTracker::new();
//! tracker.on_tool_use(Some(&json!({"file_path": "src/main.rs"})), None);
//!
//! let ctx = RenderContext {
//!     model: Some("Opus".to_string()),
//!     context: tracker.health(),
//!     ..RenderContext::default()
//! };
//! let rows = render(&ctx, &HudConfig::default(), &LayoutEngine::new(100));
//! assert!(rows.len() >= 3);
//! ```
//!
//! # Where to find things
//!
//! - **Measure and cut styled text:** [`ansi`] counts visible columns and
//!   truncates without breaking escape sequences.
//! - **Fit a line to the terminal:** [`LayoutEngine`](layout::LayoutEngine)
//!   drops segments by priority for the current [`LayoutMode`](layout::LayoutMode).
//! - **Track the context window:** [`ContextTracker`](context::ContextTracker)
//!   estimates usage from tool payloads and reconciles against the
//!   transcript; [`context::context_limit`] maps model ids to ceilings.
//! - **Follow tools, agents and todos:** [`SessionActivity`](activity::SessionActivity).
//! - **Read the assistant's files:** [`sources`] (settings, stats cache,
//!   CLAUDE.md detection), each behind a [`TtlCache`](cache::TtlCache).
//! - **Draw the box:** [`render::render`] and [`render::compose_box`].
//! - **Drive it all from an event stream:** [`HudSession`](session::HudSession).
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`ansi`] | Escape-aware width, truncation and path shortening |
//! | [`layout`] | Segments, lines, layout modes and priority filtering |
//! | [`context`] | Context tracker, health snapshot, model limits, transcript scan |
//! | [`activity`] | Tool, agent and todo state fed from hook events |
//! | [`sources`] | TTL-cached readers for settings, stats and context files |
//! | [`render`] | Line producers, colors, icons, gradient bars, box composer |
//! | [`config`] | User configuration file and its cache |
//! | [`event`] | Hook event wire format |
//! | [`session`] | Watch-mode session state |

pub mod activity;
pub mod ansi;
pub mod cache;
pub mod clock;
pub mod config;
pub mod context;
pub mod event;
pub mod layout;
pub mod paths;
pub mod prelude;
pub mod render;
pub mod session;
pub mod sources;
