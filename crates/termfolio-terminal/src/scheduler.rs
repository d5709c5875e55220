//! Timer scheduling for the terminal session.
//!
//! The session never reads a wall clock. Every delayed transition (boot
//! reveal, crash delay, scroll suppression) is scheduled through a
//! [`Scheduler`], and time only moves when the host calls `advance`. The
//! stock implementation, [`TimerQueue`], is fully deterministic, which lets
//! tests step time exactly.

use std::collections::{BTreeMap, HashMap};

/// Opaque handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer means when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerEvent {
    /// Boot pre-start delay elapsed.
    BootStart,
    /// Reveal the next banner character.
    BootTick,
    /// The crash delay elapsed.
    Crash,
    /// The self-scroll suppression window closed.
    ScrollSettle,
}

/// Schedule/cancel primitives driven by an externally advanced clock.
pub trait Scheduler {
    /// Current clock in milliseconds.
    fn now_ms(&self) -> u64;

    /// Schedule `event` to fire `delay_ms` after the current clock.
    fn schedule(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId;

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    fn cancel(&mut self, id: TimerId) -> bool;

    /// Number of timers still waiting to fire.
    fn pending(&self) -> usize;

    /// Move the horizon `dt_ms` forward. Timers become due as the horizon
    /// passes them; collect them with [`next_due`](Scheduler::next_due).
    fn advance(&mut self, dt_ms: u64);

    /// Pop the earliest timer due at or before the horizon.
    ///
    /// The clock is moved to that timer's due time before returning, so
    /// timers scheduled by its handler are relative to when it fired. Once
    /// nothing is due the clock catches up with the horizon.
    fn next_due(&mut self) -> Option<(TimerId, TimerEvent)>;
}

/// Deterministic timer queue ordered by due time, then scheduling order.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: u64,
    horizon: u64,
    next_id: u64,
    queue: BTreeMap<(u64, u64), TimerEvent>,
    due_by_id: HashMap<u64, u64>,
}

impl TimerQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Due time of a pending timer.
    #[cfg(test)]
    fn due_at(&self, id: TimerId) -> Option<u64> {
        self.due_by_id.get(&id.0).copied()
    }
}

impl Scheduler for TimerQueue {
    fn now_ms(&self) -> u64 {
        self.now
    }

    fn schedule(&mut self, delay_ms: u64, event: TimerEvent) -> TimerId {
        let id = self.next_id;
        self.next_id += 1;
        let due = self.now.saturating_add(delay_ms);
        self.queue.insert((due, id), event);
        self.due_by_id.insert(id, due);
        TimerId(id)
    }

    fn cancel(&mut self, id: TimerId) -> bool {
        match self.due_by_id.remove(&id.0) {
            Some(due) => self.queue.remove(&(due, id.0)).is_some(),
            None => false,
        }
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }

    fn advance(&mut self, dt_ms: u64) {
        self.horizon = self.horizon.max(self.now).saturating_add(dt_ms);
    }

    fn next_due(&mut self) -> Option<(TimerId, TimerEvent)> {
        let due_key = self
            .queue
            .keys()
            .next()
            .copied()
            .filter(|(due, _)| *due <= self.horizon);
        match due_key {
            Some(key) => {
                let event = self.queue.remove(&key)?;
                self.due_by_id.remove(&key.1);
                self.now = self.now.max(key.0);
                Some((TimerId(key.1), event))
            },
            None => {
                self.now = self.now.max(self.horizon);
                None
            },
        }
    }
}

/// Holder for at most one live timer owned by a component.
///
/// Arming a slot cancels whatever it held before, and
/// [`release`](TimerSlot::release) cancels without replacement. Owners call
/// `release` on teardown so no timer outlives them.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TimerSlot(Option<TimerId>);

impl TimerSlot {
    pub fn new() -> Self {
        Self(None)
    }

    /// Schedule a timer in this slot, cancelling the previous one.
    pub fn arm(&mut self, sched: &mut dyn Scheduler, delay_ms: u64, event: TimerEvent) {
        self.release(sched);
        self.0 = Some(sched.schedule(delay_ms, event));
    }

    /// Cancel the held timer, if any. Returns whether one was cancelled.
    pub fn release(&mut self, sched: &mut dyn Scheduler) -> bool {
        match self.0.take() {
            Some(id) => sched.cancel(id),
            None => false,
        }
    }

    /// Whether a timer is currently held.
    pub fn is_armed(&self) -> bool {
        self.0.is_some()
    }

    /// Claim a fired timer. Returns `true` only if `id` is the timer this
    /// slot holds, emptying the slot. Stale ids are rejected.
    pub fn claim(&mut self, id: TimerId) -> bool {
        if self.0 == Some(id) {
            self.0 = None;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(q: &mut TimerQueue) -> Vec<(u64, TimerEvent)> {
        let mut fired = Vec::new();
        while let Some((_, ev)) = q.next_due() {
            fired.push((q.now_ms(), ev));
        }
        fired
    }

    #[test]
    fn nothing_fires_before_due() {
        let mut q = TimerQueue::new();
        q.schedule(100, TimerEvent::Crash);
        q.advance(99);
        assert!(drain(&mut q).is_empty());
        assert_eq!(q.now_ms(), 99);
        q.advance(1);
        assert_eq!(drain(&mut q), vec![(100, TimerEvent::Crash)]);
    }

    #[test]
    fn fires_in_due_order() {
        let mut q = TimerQueue::new();
        q.schedule(300, TimerEvent::ScrollSettle);
        q.schedule(100, TimerEvent::BootStart);
        q.schedule(200, TimerEvent::Crash);
        q.advance(1000);
        let events: Vec<TimerEvent> = drain(&mut q).into_iter().map(|(_, e)| e).collect();
        assert_eq!(
            events,
            vec![
                TimerEvent::BootStart,
                TimerEvent::Crash,
                TimerEvent::ScrollSettle
            ]
        );
        assert_eq!(q.now_ms(), 1000);
    }

    #[test]
    fn ties_fire_in_scheduling_order() {
        let mut q = TimerQueue::new();
        q.schedule(50, TimerEvent::Crash);
        q.schedule(50, TimerEvent::BootTick);
        q.advance(50);
        let events: Vec<TimerEvent> = drain(&mut q).into_iter().map(|(_, e)| e).collect();
        assert_eq!(events, vec![TimerEvent::Crash, TimerEvent::BootTick]);
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut q = TimerQueue::new();
        let id = q.schedule(10, TimerEvent::Crash);
        assert!(q.cancel(id));
        assert!(!q.cancel(id));
        q.advance(100);
        assert!(drain(&mut q).is_empty());
        assert_eq!(q.pending(), 0);
    }

    #[test]
    fn chained_timers_fire_within_one_advance() {
        let mut q = TimerQueue::new();
        q.schedule(10, TimerEvent::BootTick);
        q.advance(35);
        let mut fired_at = Vec::new();
        while let Some((_, ev)) = q.next_due() {
            fired_at.push(q.now_ms());
            if ev == TimerEvent::BootTick {
                q.schedule(10, TimerEvent::BootTick);
            }
        }
        assert_eq!(fired_at, vec![10, 20, 30]);
        assert_eq!(q.now_ms(), 35);
        assert_eq!(q.pending(), 1);
        assert_eq!(q.due_at(TimerId(3)), Some(40));
    }

    #[test]
    fn slot_arm_supersedes() {
        let mut q = TimerQueue::new();
        let mut slot = TimerSlot::new();
        slot.arm(&mut q, 10, TimerEvent::BootTick);
        slot.arm(&mut q, 20, TimerEvent::BootTick);
        assert_eq!(q.pending(), 1);
        q.advance(100);
        let (id, _) = q.next_due().unwrap();
        assert!(slot.claim(id));
        assert!(!slot.is_armed());
    }

    #[test]
    fn slot_rejects_stale_id() {
        let mut q = TimerQueue::new();
        let stale = q.schedule(5, TimerEvent::BootTick);
        let mut slot = TimerSlot::new();
        slot.arm(&mut q, 5, TimerEvent::BootTick);
        assert!(!slot.claim(stale));
        assert!(slot.is_armed());
    }

    #[test]
    fn slot_release() {
        let mut q = TimerQueue::new();
        let mut slot = TimerSlot::new();
        assert!(!slot.release(&mut q));
        slot.arm(&mut q, 5, TimerEvent::Crash);
        assert!(slot.release(&mut q));
        assert_eq!(q.pending(), 0);
    }

    proptest::proptest! {
        #[test]
        fn fire_times_are_non_decreasing(delays in proptest::collection::vec(0u64..500, 1..40)) {
            let mut q = TimerQueue::new();
            for d in &delays {
                q.schedule(*d, TimerEvent::BootTick);
            }
            q.advance(500);
            let times: Vec<u64> = drain(&mut q).into_iter().map(|(t, _)| t).collect();
            proptest::prop_assert_eq!(times.len(), delays.len());
            proptest::prop_assert!(times.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
