//! Auto-scroll policy for the terminal viewport.
//!
//! Keeps the view pinned to the newest entry unless the user has scrolled
//! away. Positions are in rows; `scroll_top` may be fractional while a smooth
//! scroll is animating.

use crate::animation::{Tween, easing};
use crate::scheduler::{Scheduler, TimerEvent, TimerId, TimerSlot};

/// Distance from the bottom (in rows) that still counts as "at bottom".
pub const BOTTOM_TOLERANCE: f32 = 1.0;

/// What the manager did in response to scrollback growth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollAction {
    /// Viewport left where it is.
    None,
    /// Jumped straight to the bottom.
    Instant { to: f32 },
    /// Started an animated scroll to the bottom.
    Smooth { to: f32 },
}

/// Viewport position plus the "follow the output" flag.
#[derive(Debug)]
pub struct AutoScroll {
    scroll_top: f32,
    content_height: f32,
    viewport_height: f32,
    at_bottom: bool,
    smooth_ms: u64,
    tween: Option<Tween>,
    settle: TimerSlot,
}

impl AutoScroll {
    pub fn new(viewport_rows: u32, smooth_ms: u64) -> Self {
        Self {
            scroll_top: 0.0,
            content_height: 0.0,
            viewport_height: viewport_rows as f32,
            at_bottom: true,
            smooth_ms,
            tween: None,
            settle: TimerSlot::new(),
        }
    }

    /// Whether new output will move the viewport.
    pub fn is_at_bottom(&self) -> bool {
        self.at_bottom
    }

    pub fn scroll_top(&self) -> f32 {
        self.scroll_top
    }

    pub fn viewport_height(&self) -> f32 {
        self.viewport_height
    }

    /// Whether self-generated scroll events are currently being ignored.
    pub fn is_suppressing(&self) -> bool {
        self.settle.is_armed()
    }

    /// Whether a smooth scroll is still animating.
    pub fn is_animating(&self) -> bool {
        self.tween.is_some()
    }

    fn max_scroll(&self) -> f32 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    fn position_at_bottom(&self, top: f32) -> bool {
        self.content_height - (top + self.viewport_height) <= BOTTOM_TOLERANCE
    }

    /// React to `added` new entries; `content_rows` is the new total height.
    pub fn on_growth(
        &mut self,
        added: usize,
        content_rows: usize,
        sched: &mut dyn Scheduler,
    ) -> ScrollAction {
        self.content_height = content_rows as f32;
        if added == 0 || !self.at_bottom {
            return ScrollAction::None;
        }
        let target = self.max_scroll();
        if added > 1 || self.smooth_ms == 0 {
            self.tween = None;
            self.settle.release(sched);
            self.scroll_top = target;
            ScrollAction::Instant { to: target }
        } else {
            self.tween = Some(Tween::new(
                self.scroll_top,
                target,
                self.smooth_ms,
                easing::ease_out_cubic,
            ));
            self.settle.arm(sched, self.smooth_ms, TimerEvent::ScrollSettle);
            ScrollAction::Smooth { to: target }
        }
    }

    /// A scroll event reported by the viewport.
    ///
    /// Ignored while our own smooth scroll is in flight. Otherwise it decides
    /// whether auto-scroll stays engaged. Returns whether it was accepted.
    pub fn on_scroll_event(&mut self, top: f32) -> bool {
        if self.settle.is_armed() {
            log::debug!("Ignoring scroll event at {top} during self-scroll");
            return false;
        }
        self.tween = None;
        self.scroll_top = top.clamp(0.0, self.max_scroll());
        self.at_bottom = self.position_at_bottom(self.scroll_top);
        true
    }

    /// The suppression window for `id` closed. Finishes any animation.
    pub fn on_settle(&mut self, id: TimerId) -> bool {
        if !self.settle.claim(id) {
            return false;
        }
        if let Some(tween) = self.tween.take() {
            self.scroll_top = tween.end;
        }
        true
    }

    /// Step the smooth scroll animation. Returns the new position if it moved.
    pub fn animate(&mut self, dt_ms: u64) -> Option<f32> {
        let tween = self.tween.as_mut()?;
        self.scroll_top = tween.tick(dt_ms);
        if tween.is_finished() {
            self.tween = None;
        }
        Some(self.scroll_top)
    }

    /// Empty content: back to the top and following output again.
    pub fn reset(&mut self, sched: &mut dyn Scheduler) {
        self.settle.release(sched);
        self.tween = None;
        self.content_height = 0.0;
        self.scroll_top = 0.0;
        self.at_bottom = true;
    }

    /// Resize the viewport. A pinned view stays pinned.
    pub fn set_viewport_height(&mut self, rows: u32, sched: &mut dyn Scheduler) {
        self.viewport_height = rows as f32;
        if self.at_bottom {
            self.settle.release(sched);
            self.tween = None;
            self.scroll_top = self.max_scroll();
        } else {
            self.scroll_top = self.scroll_top.clamp(0.0, self.max_scroll());
            self.at_bottom = self.position_at_bottom(self.scroll_top);
        }
    }

    /// Cancel the suppression timer (teardown).
    pub fn release(&mut self, sched: &mut dyn Scheduler) {
        self.settle.release(sched);
        self.tween = None;
    }
}
