use std::collections::VecDeque;

use termfolio_terminal::{SessionHost, TerminalSession};
use termfolio_types::input::Key;

use crate::input;

/// The host side of the session: records what the session asked for.
#[derive(Debug, Default)]
pub struct AppHost {
    pub booted: bool,
    pub navigated_to: Option<String>,
}

impl SessionHost for AppHost {
    fn on_boot_complete(&mut self) {
        log::debug!("Terminal ready");
        self.booted = true;
    }

    fn navigate(&mut self, path: &str) {
        self.navigated_to = Some(path.to_string());
    }
}

/// All mutable host state except the session itself.
#[derive(Debug, Default)]
pub struct AppState {
    pub host: AppHost,
    /// Lines read but not yet fed (typing is held back while booting).
    queued: VecDeque<String>,
    /// Stdin reached end of file.
    pub input_closed: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue_line(&mut self, line: String) {
        self.queued.push_back(line);
    }

    /// Feed queued lines to the session. While booting only an interrupt
    /// gets through. Returns whether any line was fed.
    pub fn feed(&mut self, session: &mut TerminalSession) -> bool {
        let mut fed = false;
        while let Some(line) = self.queued.front() {
            let keys = input::keys_for_line(line);
            if !session.content_visible() && keys != [Key::Interrupt] {
                break;
            }
            self.queued.pop_front();
            for key in keys {
                session.handle_key(key, &mut self.host);
            }
            fed = true;
        }
        fed
    }

    /// Input is exhausted and the session has nothing left to do.
    pub fn finished(&self, session: &TerminalSession) -> bool {
        self.input_closed
            && self.queued.is_empty()
            && self.host.booted
            && session.pending_timers() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termfolio_terminal::{Phase, TimerQueue, builtin_registry};
    use termfolio_types::config::TerminalConfig;

    fn session() -> TerminalSession {
        let config = TerminalConfig {
            boot_delay_ms: 10,
            type_interval_ms: 1,
            ..TerminalConfig::default()
        };
        TerminalSession::new(builtin_registry(), Box::new(TimerQueue::new()), config)
    }

    #[test]
    fn lines_wait_for_boot() {
        let mut state = AppState::new();
        let mut s = session();
        s.start(&mut state.host);
        state.queue_line("echo hi".into());
        assert!(!state.feed(&mut s));
        assert!(s.scrollback().is_empty());
        s.tick(10_000, &mut state.host).unwrap();
        assert!(state.host.booted);
        assert!(state.feed(&mut s));
        assert!(s.scrollback().contains("hi"));
    }

    #[test]
    fn interrupt_skips_boot_then_lines_follow() {
        let mut state = AppState::new();
        let mut s = session();
        s.start(&mut state.host);
        state.queue_line("^C".into());
        state.queue_line("echo hi".into());
        assert!(state.feed(&mut s));
        assert_eq!(s.phase(), Phase::Prompt);
        assert!(s.scrollback().contains("hi"));
    }

    #[test]
    fn confirmed_exit_records_navigation() {
        let mut state = AppState::new();
        let mut s = session();
        s.start(&mut state.host);
        for line in ["^C", "exit", "y"] {
            state.queue_line(line.into());
        }
        state.feed(&mut s);
        assert_eq!(state.host.navigated_to.as_deref(), Some("/"));
    }

    #[test]
    fn finished_waits_for_timers() {
        let mut state = AppState::new();
        let mut s = session();
        s.start(&mut state.host);
        state.input_closed = true;
        assert!(!state.finished(&s));
        s.tick(10_000, &mut state.host).unwrap();
        assert!(state.finished(&s));
    }
}
