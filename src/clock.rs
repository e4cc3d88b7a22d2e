//! Time source used for level timers.
//!
//! The front end measures play time through a [`Clock`], so the arithmetic can
//! be driven by [`ManualClock`] in tests.

use std::cell::Cell;
use std::time::{Duration, Instant};

pub trait Clock {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<Instant>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            now: Cell::new(Instant::now()),
        }
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.now.get()
    }
}

/// Time elapsed since `start` according to `clock`. Never negative.
pub fn elapsed_since<C: Clock + ?Sized>(clock: &C, start: Instant) -> Duration {
    clock.now().saturating_duration_since(start)
}

/// `MM:SS`, truncating fractional seconds.
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

#[derive(Debug, Clone, Copy)]
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start<C: Clock + ?Sized>(clock: &C) -> Self {
        Self {
            started: clock.now(),
        }
    }

    pub fn started(&self) -> Instant {
        self.started
    }

    pub fn elapsed<C: Clock + ?Sized>(&self, clock: &C) -> Duration {
        elapsed_since(clock, self.started)
    }

    pub fn formatted<C: Clock + ?Sized>(&self, clock: &C) -> String {
        format_elapsed(self.elapsed(clock))
    }
}
