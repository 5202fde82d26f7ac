//! Wraparound-tolerant software timeout
//!
//! Built on a free-running [`Clock`] that wraps silently. A deadline of
//! zero means "inactive", so arming a timeout whose deadline lands exactly
//! on zero pushes it one tick later.
//!
//! # Precondition
//!
//! `delta` passed to [`Timeout::set`] must be less than half of the tick
//! type's range. Larger deltas make a wrapped clock indistinguishable from
//! an expired deadline.

use tunnel_hal::{Clock, Ticks};

/// Single deadline on a wrapping clock
#[derive(Debug)]
pub struct Timeout<C: Clock> {
    clock: C,
    deadline: C::Ticks,
}

impl<C: Clock> Timeout<C> {
    /// Create an inactive timeout
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            deadline: C::Ticks::ZERO,
        }
    }

    /// Arm the timeout `delta` ticks from now, replacing any prior deadline
    pub fn set(&mut self, delta: C::Ticks) {
        debug_assert!(delta < C::Ticks::MSB, "timeout delta must be under half the tick range");
        let deadline = self.clock.now().wrapping_add(delta);
        self.deadline = if deadline == C::Ticks::ZERO {
            C::Ticks::ONE
        } else {
            deadline
        };
    }

    /// Disarm the timeout
    pub fn cancel(&mut self) {
        self.deadline = C::Ticks::ZERO;
    }

    /// Returns true while a deadline is armed
    pub fn active(&self) -> bool {
        self.deadline != C::Ticks::ZERO
    }

    /// Returns true once the clock has reached the deadline
    ///
    /// Tolerates one clock wraparound between `set` and the check.
    pub fn expired(&self) -> bool {
        if !self.active() {
            return false;
        }
        let now = self.clock.now();
        if now < self.deadline {
            return false;
        }
        // `now >= deadline` numerically. If the deadline wrapped past zero
        // but the clock has not yet, their top bits differ: keep waiting.
        !now.msb_differs(self.deadline)
    }

    /// Armed deadline, if any
    pub fn deadline(&self) -> Option<C::Ticks> {
        self.active().then_some(self.deadline)
    }

    /// The underlying clock
    pub fn clock(&self) -> &C {
        &self.clock
    }
}
