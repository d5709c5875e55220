//! The terminal session: top-level state machine behind the widget.
//!
//! Composes the boot sequence, interpreter, autocomplete, scrollback and
//! auto-scroll. The host feeds it [`Key`]s and clock ticks and receives
//! callbacks through [`SessionHost`]. All timers go through the injected
//! [`Scheduler`]; [`unmount`](TerminalSession::unmount) cancels every one of
//! them and also runs on drop.

use termfolio_types::config::TerminalConfig;
use termfolio_types::error::{IntentionalCrash, Result};
use termfolio_types::input::Key;
use termfolio_types::stats::ProfileStats;

use crate::autocomplete::{Completion, TabTracker, complete};
use crate::boot::{BootSequence, BootStep};
use crate::history::InputHistory;
use crate::interpreter::{
    CommandContext, CommandRegistry, CommandResult, Effect, PendingConfirmation, dispatch,
};
use crate::scheduler::{Scheduler, TimerEvent, TimerSlot};
use crate::scroll::{AutoScroll, ScrollAction};
use crate::scrollback::{Output, Scrollback};

/// Top-level phase of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Banner animation running; only Ctrl+C is accepted.
    Booting,
    /// Accepting commands.
    Prompt,
    /// The intentional crash fired. Terminal.
    Crashed,
}

/// Callbacks from the session to whatever hosts it.
pub trait SessionHost {
    /// Boot finished. Called exactly once per session.
    fn on_boot_complete(&mut self);

    /// A confirmed command asked to leave for `path`.
    fn navigate(&mut self, path: &str);
}

/// One mounted terminal widget.
pub struct TerminalSession {
    registry: CommandRegistry,
    scheduler: Box<dyn Scheduler>,
    config: TerminalConfig,
    stats: Option<ProfileStats>,
    phase: Phase,
    input: String,
    scrollback: Scrollback,
    pending: Option<PendingConfirmation>,
    tabs: TabTracker,
    boot: BootSequence,
    scroll: AutoScroll,
    crash: TimerSlot,
    crash_phrase: String,
    history: InputHistory,
    /// Set by [`TerminalSession::unmount`]; the session is inert afterwards.
    unmounted: bool,
}

impl TerminalSession {
    pub fn new(
        registry: CommandRegistry,
        scheduler: Box<dyn Scheduler>,
        config: TerminalConfig,
    ) -> Self {
        let boot = BootSequence::new(
            config.banner.clone(),
            config.boot_delay_ms,
            config.type_interval_ms,
        );
        let scroll = AutoScroll::new(config.viewport_rows, config.smooth_scroll_ms);
        let history = InputHistory::new(config.history_limit);
        log::debug!("Terminal session created ({} commands)", registry.len());
        Self {
            registry,
            scheduler,
            config,
            stats: None,
            phase: Phase::Booting,
            input: String::new(),
            scrollback: Scrollback::new(),
            pending: None,
            tabs: TabTracker::new(),
            boot,
            scroll,
            crash: TimerSlot::new(),
            crash_phrase: String::new(),
            history,
            unmounted: false,
        }
    }

    /// Attach the statistics snapshot shown in the header.
    pub fn with_stats(mut self, stats: ProfileStats) -> Self {
        self.stats = Some(stats);
        self
    }

    /// Begin the boot animation.
    pub fn start(&mut self, host: &mut dyn SessionHost) {
        if self.unmounted || self.phase != Phase::Booting {
            return;
        }
        let step = self
            .boot
            .start(self.scheduler.as_mut(), self.config.reduced_motion);
        if step == BootStep::Complete {
            self.complete_boot(host);
        }
    }

    /// Feed one keystroke.
    pub fn handle_key(&mut self, key: Key, host: &mut dyn SessionHost) {
        if self.unmounted || self.phase == Phase::Crashed {
            return;
        }
        if !key.is_tab() {
            self.tabs.reset();
        }
        if self.phase == Phase::Booting {
            if key == Key::Interrupt {
                let step = self.boot.skip(self.scheduler.as_mut());
                if step == BootStep::Complete {
                    self.complete_boot(host);
                }
            }
            return;
        }

        match key {
            Key::Char(c) => self.input.push(c),
            Key::Backspace => {
                self.input.pop();
            },
            Key::Enter => self.submit(host),
            Key::Tab => self.autocomplete(),
            Key::Interrupt => self.interrupt(),
            Key::HistoryPrev => {
                if let Some(line) = self.history.older(&self.input) {
                    self.input = line.to_string();
                }
            },
            Key::HistoryNext => {
                if let Some(line) = self.history.newer() {
                    self.input = line.to_string();
                }
            },
        }
    }

    /// Advance the clock by `dt_ms` and fire everything that came due.
    ///
    /// Returns the intentional crash as an error once its delay elapses.
    pub fn tick(&mut self, dt_ms: u64, host: &mut dyn SessionHost) -> Result<()> {
        if self.unmounted || self.phase == Phase::Crashed {
            return Ok(());
        }
        self.scheduler.advance(dt_ms);
        while let Some((id, event)) = self.scheduler.next_due() {
            match event {
                TimerEvent::BootStart | TimerEvent::BootTick => {
                    let step = self.boot.on_timer(id, event, self.scheduler.as_mut());
                    if step == BootStep::Complete {
                        self.complete_boot(host);
                    }
                },
                TimerEvent::Crash => {
                    if self.crash.claim(id) {
                        return Err(self.enter_crashed().into());
                    }
                },
                TimerEvent::ScrollSettle => {
                    self.scroll.on_settle(id);
                },
            }
        }
        self.scroll.animate(dt_ms);
        Ok(())
    }

    /// Report a viewport scroll position. Returns whether it was accepted.
    pub fn scroll_to(&mut self, top: f32) -> bool {
        !self.unmounted && self.scroll.on_scroll_event(top)
    }

    /// The viewport was resized to `rows`.
    pub fn set_viewport_height(&mut self, rows: u32) {
        if self.unmounted {
            return;
        }
        self.scroll.set_viewport_height(rows, self.scheduler.as_mut());
    }

    /// Cancel every timer the session owns and stop accepting input or
    /// ticks. Safe to call more than once.
    pub fn unmount(&mut self) {
        if self.unmounted {
            return;
        }
        self.unmounted = true;
        self.boot.cancel(self.scheduler.as_mut());
        self.crash.release(self.scheduler.as_mut());
        self.scroll.release(self.scheduler.as_mut());
        log::debug!("Terminal session unmounted");
    }

    // -- accessors --

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn prompt(&self) -> &str {
        &self.config.prompt
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn pending_confirmation(&self) -> Option<&PendingConfirmation> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &[String] {
        self.history.entries()
    }

    /// The part of the banner revealed so far.
    pub fn banner(&self) -> &str {
        self.boot.visible()
    }

    /// Whether host-supplied content may be shown yet.
    pub fn content_visible(&self) -> bool {
        self.phase != Phase::Booting
    }

    /// Whether to draw the blinking cursor after the prompt.
    pub fn show_prompt_cursor(&self) -> bool {
        self.phase == Phase::Prompt && !self.config.touch_only
    }

    pub fn footer_hint(&self) -> String {
        if self.config.touch_only {
            "Ctrl+C to cancel".to_string()
        } else {
            "Ctrl+C to cancel | type 'help' to get started".to_string()
        }
    }

    /// Header lines from the statistics snapshot, if one was supplied.
    pub fn header_lines(&self) -> Vec<String> {
        self.stats
            .as_ref()
            .map(ProfileStats::header_lines)
            .unwrap_or_default()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Timers currently waiting in the scheduler.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending()
    }

    pub fn is_at_bottom(&self) -> bool {
        self.scroll.is_at_bottom()
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll.scroll_top()
    }

    // -- internals --

    fn complete_boot(&mut self, host: &mut dyn SessionHost) {
        if self.phase != Phase::Booting {
            return;
        }
        self.phase = Phase::Prompt;
        host.on_boot_complete();
    }

    fn interrupt(&mut self) {
        if let Some(confirmation) = self.pending.take() {
            log::debug!("Confirmation for {} interrupted", confirmation.origin_command);
        } else {
            self.input.clear();
        }
        self.history.reset_cursor();
    }

    fn autocomplete(&mut self) {
        let press = self.tabs.press_tab();
        match complete(&self.input, press, &self.registry) {
            Completion::Replace(name) => self.input = name,
            Completion::List(names) => {
                self.append(vec![Output::info(names.join("  "))], None);
            },
            Completion::Unchanged => {},
        }
    }

    fn submit(&mut self, host: &mut dyn SessionHost) {
        let line = std::mem::take(&mut self.input);
        if self.pending.is_none() {
            self.history.push(&line);
        } else {
            self.history.reset_cursor();
        }
        let ctx = CommandContext {
            registry: &self.registry,
            history: self.history.entries(),
        };
        let result = dispatch(&line, &mut self.pending, &ctx);
        self.apply(result, line, host);
    }

    fn apply(&mut self, result: CommandResult, line: String, host: &mut dyn SessionHost) {
        let CommandResult { entries, effect } = result;
        if effect == Effect::ClearScrollback {
            self.scrollback.clear();
            self.scroll.reset(self.scheduler.as_mut());
            self.append(entries, None);
            return;
        }

        self.append(entries, Some(line.clone()));
        match effect {
            Effect::Navigate(path) => {
                log::info!("Navigating to {path}");
                host.navigate(&path);
            },
            Effect::Crash => self.arm_crash(line),
            Effect::StartConfirmation { prompt } => {
                log::debug!("Awaiting confirmation: {prompt}");
            },
            Effect::None | Effect::ClearScrollback => {},
        }
    }

    fn append(&mut self, entries: Vec<Output>, command: Option<String>) -> ScrollAction {
        let now = self.scheduler.now_ms();
        let added = self.scrollback.append(entries, command, now);
        let rows = self.scrollback.line_count();
        self.scroll.on_growth(added, rows, self.scheduler.as_mut())
    }

    fn arm_crash(&mut self, phrase: String) {
        if self.crash.is_armed() {
            log::debug!("Crash already armed");
            return;
        }
        log::info!("Crash armed, firing in {}ms", self.config.crash_delay_ms);
        let delay = self.config.crash_delay_ms;
        self.crash.arm(self.scheduler.as_mut(), delay, TimerEvent::Crash);
        self.crash_phrase = phrase;
    }

    fn enter_crashed(&mut self) -> IntentionalCrash {
        self.phase = Phase::Crashed;
        self.input.clear();
        self.pending = None;
        self.unmount();
        log::info!("Session crashed");
        IntentionalCrash {
            phrase: std::mem::take(&mut self.crash_phrase),
        }
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        self.unmount();
    }
}
