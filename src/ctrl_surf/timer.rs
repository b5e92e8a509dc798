use once_cell::sync::Lazy;
use std::time::Instant;

/// A monotonic millisecond clock.
pub trait Clock {
    fn millis(&self) -> u64;
}

static EPOCH: Lazy<Instant> = Lazy::new(Instant::now);

/// Milliseconds elapsed since the first time any `MonotonicClock` was read.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn millis(&self) -> u64 {
        EPOCH.elapsed().as_millis() as u64
    }
}

#[cfg(test)]
pub use manual::ManualClock;

#[cfg(test)]
mod manual {
    use super::Clock;
    use std::sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    };

    /// A clock which only moves when told to.
    ///
    /// Clones share the same time, so a test can keep a handle while
    /// the timer owns another.
    #[derive(Clone, Debug, Default)]
    pub struct ManualClock(Arc<AtomicU64>);

    impl ManualClock {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn advance(&self, ms: u64) {
            self.0.fetch_add(ms, Ordering::Relaxed);
        }
    }

    impl Clock for ManualClock {
        fn millis(&self) -> u64 {
            self.0.load(Ordering::Relaxed)
        }
    }
}

/// A periodic interval, polled by its owner.
pub trait IntervalTimer {
    /// The interval in milliseconds, 0 meaning the timer never fires.
    fn interval(&self) -> u32;

    /// Returns `true` if at least one interval elapsed since the start of
    /// the current period, in which case the next period begins.
    fn fire(&mut self) -> bool;

    /// Restarts the current period from now.
    fn begin_next_period(&mut self);
}

#[derive(Debug)]
pub struct Timer<C: Clock = MonotonicClock> {
    interval: u32,
    previous: u64,
    clock: C,
}

impl Timer {
    pub fn new(interval: u32) -> Self {
        Self::with_clock(interval, MonotonicClock)
    }
}

impl<C: Clock> Timer<C> {
    pub fn with_clock(interval: u32, clock: C) -> Self {
        let previous = clock.millis();
        Self {
            interval,
            previous,
            clock,
        }
    }
}

impl<C: Clock> IntervalTimer for Timer<C> {
    fn interval(&self) -> u32 {
        self.interval
    }

    fn fire(&mut self) -> bool {
        if self.interval == 0 {
            return false;
        }

        let interval = u64::from(self.interval);
        if self.clock.millis().saturating_sub(self.previous) < interval {
            return false;
        }

        // Late polls catch up one interval at a time.
        self.previous += interval;

        true
    }

    fn begin_next_period(&mut self) {
        self.previous = self.clock.millis();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_once_per_interval() {
        let clock = ManualClock::new();
        let mut timer = Timer::with_clock(150, clock.clone());

        assert!(!timer.fire());
        clock.advance(149);
        assert!(!timer.fire());
        clock.advance(1);
        assert!(timer.fire());
        assert!(!timer.fire());

        clock.advance(150);
        assert!(timer.fire());
    }

    #[test]
    fn late_poll_catches_up() {
        let clock = ManualClock::new();
        let mut timer = Timer::with_clock(100, clock.clone());

        clock.advance(250);
        assert!(timer.fire());
        assert!(timer.fire());
        assert!(!timer.fire());
    }

    #[test]
    fn begin_next_period_restarts() {
        let clock = ManualClock::new();
        let mut timer = Timer::with_clock(100, clock.clone());

        clock.advance(90);
        timer.begin_next_period();
        clock.advance(90);
        assert!(!timer.fire());
        clock.advance(10);
        assert!(timer.fire());
    }

    #[test]
    fn zero_interval_never_fires() {
        let clock = ManualClock::new();
        let mut timer = Timer::with_clock(0, clock.clone());

        for _ in 0..10 {
            clock.advance(1_000);
            assert!(!timer.fire());
        }
        assert_eq!(timer.interval(), 0);
    }

    #[test]
    fn monotonic_clock_moves_forward() {
        let clock = MonotonicClock;
        let first = clock.millis();
        assert!(clock.millis() >= first);

        let mut timer = Timer::new(10_000);
        assert!(!timer.fire());
    }
}
