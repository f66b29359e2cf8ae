//! Gravity timer - the single schedulable, cancellable task of the game.
//!
//! Time is fed in explicitly (`advance(elapsed_ms)`) so the timer is
//! deterministic under test. Each `schedule()` starts a new generation; handles
//! from earlier generations are dead, so at most one gravity schedule is ever
//! live.

/// Identifies one scheduling of the gravity timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug, Clone)]
pub struct GravityTimer {
    interval_ms: u32,
    accumulated_ms: u32,
    generation: u64,
    armed: bool,
}

impl GravityTimer {
    /// Create an unarmed timer firing every `interval_ms` (clamped to at least 1ms)
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulated_ms: 0,
            generation: 0,
            armed: false,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Arm the timer from zero, replacing any previous schedule.
    pub fn schedule(&mut self) -> TimerHandle {
        self.generation = self.generation.wrapping_add(1);
        self.accumulated_ms = 0;
        self.armed = true;
        TimerHandle(self.generation)
    }

    /// Disarm the timer. The current handle stops being active.
    pub fn cancel(&mut self) {
        self.armed = false;
        self.accumulated_ms = 0;
    }

    /// Handle of the live schedule, if any
    pub fn handle(&self) -> Option<TimerHandle> {
        self.armed.then_some(TimerHandle(self.generation))
    }

    /// Whether `handle` refers to the live schedule
    pub fn is_active(&self, handle: TimerHandle) -> bool {
        self.armed && handle.0 == self.generation
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Let `elapsed_ms` pass; returns how many times the timer fired.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.armed {
            return 0;
        }
        let total = self.accumulated_ms.saturating_add(elapsed_ms);
        self.accumulated_ms = total % self.interval_ms;
        total / self.interval_ms
    }

    /// Time until the next fire, or `None` when disarmed
    pub fn remaining_ms(&self) -> Option<u32> {
        self.armed
            .then(|| self.interval_ms - self.accumulated_ms)
    }
}

impl Default for GravityTimer {
    fn default() -> Self {
        Self::new(crate::types::GRAVITY_MS)
    }
}
