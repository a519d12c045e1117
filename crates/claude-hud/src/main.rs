//! Terminal status dashboard for AI coding assistant sessions.
//!
//! Logs go to stderr and are off unless `CLAUDE_HUD_LOG` sets a filter.
//!
//! # Examples
//!
//! ```sh
//! # Draw one frame from a prepared render context
//! echo '{"model":"Opus","context":{"percent":42}}' | claude-hud render
//!
//! # Follow a session: one hook event per line
//! tail -f ~/.claude/hud-events.ndjson | claude-hud watch
//!
//! # Show or change the configuration
//! claude-hud config
//! claude-hud config --set iconMode=ascii --set showMcpCount=false
//! ```

use std::io::{self, BufRead, Read};
use std::path::PathBuf;
use std::process;

use claude_hud::clock::{Clock, SystemClock};
use claude_hud::config::{ConfigCache, HudConfig};
use claude_hud::event::HudEvent;
use claude_hud::layout::LayoutEngine;
use claude_hud::paths;
use claude_hud::render::{RenderContext, render, write_frame};
use claude_hud::session::HudSession;
use clap::{Parser, Subcommand};
use tracing::{debug, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "CLAUDE_HUD_LOG";

/// Terminal status dashboard for AI coding assistant sessions.
#[derive(Parser)]
#[command(name = "claude-hud", version)]
struct Cli {
    /// Terminal width in columns. Detected from the terminal when omitted.
    #[arg(long, global = true)]
    width: Option<usize>,

    /// Config file. Defaults to ~/.claude/claude-hud.json.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// The assistant's state directory. Defaults to ~/.claude.
    #[arg(long, global = true)]
    claude_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a render context as JSON on stdin and print one frame.
    Render,
    /// Read hook events (one JSON object per line) on stdin and print
    /// a frame after each.
    Watch {
        /// Working directory used for project CLAUDE.md detection until an
        /// event carries one.
        #[arg(long)]
        cwd: Option<PathBuf>,
    },
    /// Print the effective configuration, or update it.
    Config {
        /// `key=value` assignment saved to the config file. Repeatable.
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("off"));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();

    let engine = cli.width.map_or_else(LayoutEngine::detect, LayoutEngine::new);
    debug!("Layout {} at {} columns", engine.mode(), engine.terminal_width());

    let result = match cli.command {
        Command::Render => run_render(engine, cli.config),
        Command::Watch { cwd } => {
            let claude_dir = cli.claude_dir.or_else(paths::claude_dir);
            run_watch(engine, cli.config, claude_dir, cwd)
        }
        Command::Config { set } => run_config(cli.config, &set),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Config from `--config` when given, else from the default location.
fn load_config(path: Option<&PathBuf>) -> HudConfig {
    match path {
        Some(path) => HudConfig::load_from(path, env_var),
        None => HudConfig::load(),
    }
}

fn run_render(engine: LayoutEngine, config_path: Option<PathBuf>) -> Result<(), String> {
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .map_err(|e| format!("failed to read stdin: {e}"))?;
    let mut ctx: RenderContext = if input.trim().is_empty() {
        RenderContext::default()
    } else {
        serde_json::from_str(&input).map_err(|e| format!("invalid render context: {e}"))?
    };
    if ctx.now_ms == 0 {
        ctx.now_ms = SystemClock.now_ms();
    }

    let config = load_config(config_path.as_ref());
    let rows = render(&ctx, &config, &engine);
    write_frame(&mut io::stdout().lock(), &rows, false)
}

fn run_watch(
    engine: LayoutEngine,
    config_path: Option<PathBuf>,
    claude_dir: Option<PathBuf>,
    cwd: Option<PathBuf>,
) -> Result<(), String> {
    let claude_dir =
        claude_dir.ok_or_else(|| "cannot locate the .claude directory; set HOME".to_string())?;
    let mut session = HudSession::new(claude_dir);
    if let Some(cwd) = cwd {
        session = session.with_cwd(cwd);
    }
    let mut configs = match config_path {
        Some(path) => ConfigCache::with_clock(Some(path), SystemClock),
        None => ConfigCache::new(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut drawn_any = false;

    for line in io::stdin().lock().lines() {
        let line = line.map_err(|e| format!("failed to read stdin: {e}"))?;
        let Some(event) = HudEvent::parse_line(&line) else {
            if !line.trim().is_empty() {
                warn!("Skipping malformed event line");
            }
            continue;
        };
        session.handle_event(&event);

        let ctx = session.render_context();
        let rows = render(&ctx, configs.get(), &engine);
        write_frame(&mut out, &rows, drawn_any)?;
        drawn_any |= !rows.is_empty();
    }
    debug!("Event stream closed after {} events", session.events_seen());
    Ok(())
}

fn run_config(config_path: Option<PathBuf>, assignments: &[String]) -> Result<(), String> {
    let config = if assignments.is_empty() {
        load_config(config_path.as_ref())
    } else {
        let path = config_path
            .or_else(paths::config_path)
            .ok_or_else(|| "no config path; pass --config or set HOME".to_string())?;
        HudConfig::update_file(&path, assignments.iter().map(String::as_str), env_var)?
    };
    let json = serde_json::to_string_pretty(&config)
        .map_err(|e| format!("failed to serialize config: {e}"))?;
    println!("{json}");
    Ok(())
}
