//! Scheduled-task abstraction for the highlight poll
//!
//! Everything runs on one thread. A timer never calls back on its own; the
//! host loop asks it how many intervals have elapsed and pumps the control
//! surface. Tests use [`ManualTimer`] and fire ticks by hand.

use std::time::{Duration, Instant};

/// A repeating timer polled by the owner's loop
pub trait TimerService {
    /// Start (or restart) firing every `interval`
    fn start(&mut self, interval: Duration);

    /// Stop firing and drop any due ticks
    fn stop(&mut self);

    /// True between `start` and `stop`
    fn is_running(&self) -> bool;

    /// Number of ticks that became due since the previous call (0 when stopped)
    fn take_due_ticks(&mut self) -> u32;
}

/// Deterministic timer: ticks only when [`ManualTimer::fire`] is called
#[derive(Debug, Default)]
pub struct ManualTimer {
    interval: Option<Duration>,
    pending: u32,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make one tick due. Ignored while stopped.
    pub fn fire(&mut self) {
        if self.interval.is_some() {
            self.pending += 1;
        }
    }

    /// Interval passed to the last `start`, if running
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }
}

impl TimerService for ManualTimer {
    fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.pending = 0;
    }

    fn stop(&mut self) {
        self.interval = None;
        self.pending = 0;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    fn take_due_ticks(&mut self) -> u32 {
        std::mem::take(&mut self.pending)
    }
}

/// Wall-clock timer backed by `Instant`
#[derive(Debug, Default)]
pub struct IntervalTimer {
    interval: Option<Duration>,
    last_fire: Option<Instant>,
}

impl IntervalTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time left until the next tick is due, if running
    pub fn until_next_tick(&self) -> Option<Duration> {
        match (self.interval, self.last_fire) {
            (Some(interval), Some(last)) => Some(interval.saturating_sub(last.elapsed())),
            _ => None,
        }
    }

    fn due_at(&mut self, now: Instant) -> u32 {
        let (interval, last) = match (self.interval, self.last_fire) {
            (Some(interval), Some(last)) => (interval, last),
            _ => return 0,
        };
        if interval.is_zero() {
            self.last_fire = Some(now);
            return 1;
        }

        let elapsed = now.saturating_duration_since(last);
        let ticks = (elapsed.as_nanos() / interval.as_nanos()).min(u128::from(u32::MAX)) as u32;
        if ticks > 0 {
            // Keep the cadence anchored instead of drifting with poll jitter
            self.last_fire = Some(last + interval * ticks);
        }
        ticks
    }
}

impl TimerService for IntervalTimer {
    fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.last_fire = Some(Instant::now());
    }

    fn stop(&mut self) {
        self.interval = None;
        self.last_fire = None;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }

    fn take_due_ticks(&mut self) -> u32 {
        self.due_at(Instant::now())
    }
}
