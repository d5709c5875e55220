//! Easing functions and the tween used for smooth scrolling.

/// Standard easing functions.
///
/// Input `t` is clamped to `[0.0, 1.0]`. Output is the eased value.
pub mod easing {
    /// Linear easing (no acceleration).
    #[cfg(test)]
    pub(crate) fn linear(t: f32) -> f32 {
        t.clamp(0.0, 1.0)
    }

    /// Cubic ease-out (fast start, slow end).
    pub fn ease_out_cubic(t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        let t1 = t - 1.0;
        t1 * t1 * t1 + 1.0
    }
}

/// A running animation that interpolates between two values.
#[derive(Debug, Clone)]
pub struct Tween {
    /// Starting value.
    pub start: f32,
    /// Target value.
    pub end: f32,
    /// Total duration in milliseconds.
    pub duration_ms: u64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: u64,
    /// Easing function to apply.
    pub easing: fn(f32) -> f32,
}

impl Tween {
    /// Create a new tween animation.
    pub fn new(start: f32, end: f32, duration_ms: u64, easing: fn(f32) -> f32) -> Self {
        Self {
            start,
            end,
            duration_ms,
            elapsed_ms: 0,
            easing,
        }
    }

    /// Advance by `dt_ms` and return the current interpolated value.
    pub fn tick(&mut self, dt_ms: u64) -> f32 {
        self.elapsed_ms = self.elapsed_ms.saturating_add(dt_ms).min(self.duration_ms);
        self.value()
    }

    /// Check if the animation has completed.
    pub fn is_finished(&self) -> bool {
        self.elapsed_ms >= self.duration_ms
    }

    /// Current value without advancing time.
    pub fn value(&self) -> f32 {
        let t = if self.duration_ms > 0 {
            self.elapsed_ms as f32 / self.duration_ms as f32
        } else {
            1.0
        };
        let eased = (self.easing)(t);
        self.start + (self.end - self.start) * eased
    }
}
