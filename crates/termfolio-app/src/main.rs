//! termfolio entry point.
//!
//! Runs the portfolio terminal on stdin/stdout. Each input line is typed
//! into the session and submitted; end a line with Tab to complete instead,
//! or enter `^C` to interrupt. Timers run off the wall clock.
//!
//! Usage: `termfolio [config.toml] [stats.json]`

mod app_state;
mod error_surface;
mod input;
mod render;

use std::io::{self, BufRead, IsTerminal, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};

use app_state::AppState;
use render::Renderer;
use termfolio_terminal::{TerminalSession, TimerQueue, builtin_registry};
use termfolio_types::config::TerminalConfig;
use termfolio_types::stats::ProfileStats;

/// How long one frame of the host loop waits for input.
const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Resolve config and stats from CLI args or env vars.
    let config = match arg_or_env(1, "TERMFOLIO_CONFIG") {
        Some(path) => TerminalConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => TerminalConfig::default(),
    };
    let stats = arg_or_env(2, "TERMFOLIO_STATS")
        .map(|path| {
            ProfileStats::load(&path).with_context(|| format!("loading stats {}", path.display()))
        })
        .transpose()?;
    log::info!(
        "Starting termfolio ({} rows, reduced motion: {})",
        config.viewport_rows,
        config.reduced_motion
    );

    let mut session = TerminalSession::new(builtin_registry(), Box::new(TimerQueue::new()), config);
    if let Some(stats) = stats {
        log::info!("Loaded stats for {}", stats.display_name());
        session = session.with_stats(stats);
    }

    let mut state = AppState::new();
    let mut renderer = Renderer::new(!io::stdin().is_terminal());
    let stdout = io::stdout();
    let mut out = stdout.lock();

    session.start(&mut state.host);
    let lines = spawn_stdin_reader();

    match run(&mut session, &mut state, &mut renderer, &lines, &mut out) {
        Ok(()) => {
            writeln!(out)?;
            log::info!("termfolio shut down cleanly");
            Ok(())
        },
        Err(err) => {
            let view = error_surface::classify(&err);
            for line in error_surface::render(&view) {
                writeln!(out, "{line}")?;
            }
            if view.is_intentional_crash() {
                log::info!("Session ended by intentional crash");
                Ok(())
            } else {
                Err(err)
            }
        },
    }
}

/// The host loop: feed input, advance time, draw.
fn run(
    session: &mut TerminalSession,
    state: &mut AppState,
    renderer: &mut Renderer,
    lines: &Receiver<String>,
    out: &mut impl Write,
) -> Result<()> {
    let mut last = Instant::now();
    loop {
        if state.input_closed {
            thread::sleep(FRAME);
        } else {
            match lines.recv_timeout(FRAME) {
                Ok(line) => state.queue_line(line),
                Err(RecvTimeoutError::Timeout) => {},
                Err(RecvTimeoutError::Disconnected) => {
                    log::debug!("stdin closed");
                    state.input_closed = true;
                },
            }
        }
        if state.feed(session) {
            renderer.mark_dirty();
        }

        let now = Instant::now();
        let dt_ms = u64::try_from(now.duration_since(last).as_millis()).unwrap_or(u64::MAX);
        last = now;
        session.tick(dt_ms, &mut state.host)?;
        renderer.draw(session, out)?;

        if let Some(path) = &state.host.navigated_to {
            log::info!("Leaving terminal for {path}");
            return Ok(());
        }
        if state.finished(session) {
            return Ok(());
        }
    }
}

fn arg_or_env(index: usize, var: &str) -> Option<PathBuf> {
    std::env::args()
        .nth(index)
        .or_else(|| std::env::var(var).ok())
        .map(PathBuf::from)
}

/// Read stdin on its own thread so the loop can keep ticking.
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}
