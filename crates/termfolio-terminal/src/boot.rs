//! Boot sequence: the typed-banner animation shown before the prompt.
//!
//! `Pending` waits out a short start delay, `Typing` reveals one character
//! per interval, `Done` shows the full banner. Completion is reported exactly
//! once, whether the banner finished typing or was skipped.

use crate::scheduler::{Scheduler, TimerEvent, TimerId, TimerSlot};

/// Where the animation is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BootState {
    Pending,
    Typing,
    Done,
}

/// Result of driving the boot sequence one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootStep {
    /// Still booting.
    Continue,
    /// Boot just finished. Reported once per sequence.
    Complete,
    /// Nothing changed (stale timer, or already done).
    Ignored,
}

/// Drives the banner reveal through the scheduler.
#[derive(Debug)]
pub struct BootSequence {
    banner: String,
    total_chars: usize,
    revealed: usize,
    state: BootState,
    completed: bool,
    start_delay_ms: u64,
    interval_ms: u64,
    timer: TimerSlot,
}

impl BootSequence {
    pub fn new(banner: impl Into<String>, start_delay_ms: u64, interval_ms: u64) -> Self {
        let banner = banner.into();
        let total_chars = banner.chars().count();
        Self {
            banner,
            total_chars,
            revealed: 0,
            state: BootState::Pending,
            completed: false,
            start_delay_ms,
            interval_ms,
            timer: TimerSlot::new(),
        }
    }

    #[cfg(test)]
    fn state(&self) -> BootState {
        self.state
    }

    pub fn is_done(&self) -> bool {
        self.state == BootState::Done
    }

    /// Whether a boot timer is outstanding.
    #[cfg(test)]
    fn has_timer(&self) -> bool {
        self.timer.is_armed()
    }

    /// The part of the banner revealed so far.
    pub fn visible(&self) -> &str {
        match self.banner.char_indices().nth(self.revealed) {
            Some((end, _)) => &self.banner[..end],
            None => &self.banner,
        }
    }

    /// Begin (or restart) the animation.
    ///
    /// Any earlier boot timer is cancelled first. With `reduced_motion` the
    /// banner is shown at once, exactly like [`skip`](Self::skip).
    pub fn start(&mut self, sched: &mut dyn Scheduler, reduced_motion: bool) -> BootStep {
        if self.completed {
            return BootStep::Ignored;
        }
        if reduced_motion {
            return self.skip(sched);
        }
        self.revealed = 0;
        self.state = BootState::Pending;
        self.timer.arm(sched, self.start_delay_ms, TimerEvent::BootStart);
        log::debug!("Boot scheduled in {}ms", self.start_delay_ms);
        BootStep::Continue
    }

    /// Jump to the full banner. Idempotent.
    pub fn skip(&mut self, sched: &mut dyn Scheduler) -> BootStep {
        self.timer.release(sched);
        self.revealed = self.total_chars;
        self.state = BootState::Done;
        self.finish()
    }

    /// Handle a fired boot timer.
    pub fn on_timer(
        &mut self,
        id: TimerId,
        event: TimerEvent,
        sched: &mut dyn Scheduler,
    ) -> BootStep {
        if !self.timer.claim(id) {
            log::debug!("Ignoring stale boot timer {id:?}");
            return BootStep::Ignored;
        }
        match event {
            TimerEvent::BootStart => self.state = BootState::Typing,
            TimerEvent::BootTick => self.revealed += 1,
            _ => return BootStep::Ignored,
        }
        if self.revealed >= self.total_chars {
            self.state = BootState::Done;
            return self.finish();
        }
        self.timer.arm(sched, self.interval_ms, TimerEvent::BootTick);
        BootStep::Continue
    }

    /// Stop without completing (teardown).
    pub fn cancel(&mut self, sched: &mut dyn Scheduler) {
        self.timer.release(sched);
    }

    fn finish(&mut self) -> BootStep {
        if self.completed {
            return BootStep::Ignored;
        }
        self.completed = true;
        log::info!("Boot complete");
        BootStep::Complete
    }
}
