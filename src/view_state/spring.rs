//! Spring-return tween for the hover element.
//!
//! On release the floating element eases from its drop offset back to zero
//! (its resting place) along a critically damped curve. The tween is purely
//! visual; nothing in the data layer waits for it.

use crate::model::Position;
use std::time::{Duration, Instant};

/// Default tween length.
pub const DEFAULT_SPRING_DURATION: Duration = Duration::from_millis(250);

/// `omega * duration`: amplitude at the end of the tween is below 1%.
const OMEGA_T_END: f32 = 6.64;

/// Offsets smaller than this are treated as at rest.
const REST_EPSILON: f32 = 0.01;

/// A cancellable spring-return animation.
#[derive(Debug, Clone, PartialEq)]
pub struct SpringReturn {
    from: Position,
    started: Instant,
    duration: Duration,
    cancelled: bool,
}

impl SpringReturn {
    /// Start returning from `from` (offset from rest) at `started`.
    pub fn new(from: Position, started: Instant, duration: Duration) -> Self {
        Self {
            from,
            started,
            duration,
            cancelled: false,
        }
    }

    /// Fraction of the initial offset still remaining at `now`, from 1 to 0.
    pub fn remaining(&self, now: Instant) -> f32 {
        if self.is_finished(now) {
            return 0.0;
        }
        let t = now.saturating_duration_since(self.started).as_secs_f32();
        let omega = OMEGA_T_END / self.duration.as_secs_f32();
        (1.0 + omega * t) * (-omega * t).exp()
    }

    /// Offset from rest at `now`.
    pub fn offset_at(&self, now: Instant) -> Position {
        let k = self.remaining(now);
        Position::new(self.from.x * k, self.from.y * k)
    }

    /// Tween has run its course, was cancelled, or had nothing to animate.
    pub fn is_finished(&self, now: Instant) -> bool {
        self.cancelled
            || self.duration.is_zero()
            || (self.from.x.abs() < REST_EPSILON && self.from.y.abs() < REST_EPSILON)
            || now.saturating_duration_since(self.started) >= self.duration
    }

    /// Stop immediately; the element snaps to rest.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }
}
