//! Frame timing and the fixed simulation tick.

#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;
use std::time::Duration;
#[cfg(target_arch = "wasm32")]
use web_time::Instant;

/// Measures the wall-clock time between frames.
#[derive(Debug)]
pub struct FrameTimer {
    last_tick: Instant,
}
impl FrameTimer {
    pub fn new() -> Self {
        FrameTimer {
            last_tick: Instant::now(),
        }
    }

    /// Returns the time elapsed since the previous call (or since creation).
    pub fn tick(&mut self) -> Duration {
        let new_tick = Instant::now();
        let duration = new_tick.duration_since(self.last_tick);
        self.last_tick = new_tick;
        duration
    }
}

/// Turns elapsed wall-clock time into a whole number of fixed ticks.
///
/// Elapsed time is accumulated; every full `period` in the accumulator is
/// drained as one tick and the remainder carries over to the next frame.
#[derive(Debug)]
pub struct TickClock {
    period: Duration,
    accumulated: Duration,
}
impl TickClock {
    /// Creates a clock with an empty accumulator.
    ///
    /// # Panics
    ///
    /// - If `period` is zero.
    pub fn new(period: Duration) -> Self {
        assert!(!period.is_zero(), "Tick period must be positive.");
        TickClock {
            period,
            accumulated: Duration::ZERO,
        }
    }

    /// Adds `elapsed` to the accumulator and drains whole ticks from it.
    ///
    /// # Returns
    ///
    /// The number of ticks to simulate now.
    pub fn advance(&mut self, elapsed: Duration) -> u64 {
        self.accumulated += elapsed;
        let period_nanos = self.period.as_nanos();
        let ticks = self.accumulated.as_nanos() / period_nanos;
        self.accumulated -= Duration::from_nanos((ticks * period_nanos) as u64);
        ticks as u64
    }

    /// Time carried over towards the next tick.
    pub fn remainder(&self) -> Duration {
        self.accumulated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drains_whole_ticks() {
        let mut clock = TickClock::new(Duration::from_micros(100));
        assert_eq!(clock.advance(Duration::from_micros(350)), 3);
        assert_eq!(clock.remainder(), Duration::from_micros(50));
    }

    #[test]
    fn test_remainder_carries_over() {
        let mut clock = TickClock::new(Duration::from_micros(100));
        assert_eq!(clock.advance(Duration::from_micros(60)), 0);
        assert_eq!(clock.advance(Duration::from_micros(60)), 1);
        assert_eq!(clock.remainder(), Duration::from_micros(20));
    }

    #[test]
    fn test_exact_period_leaves_nothing() {
        let mut clock = TickClock::new(Duration::from_millis(1));
        assert_eq!(clock.advance(Duration::from_millis(5)), 5);
        assert_eq!(clock.remainder(), Duration::ZERO);
    }

    #[test]
    #[should_panic]
    fn test_zero_period_panics() {
        TickClock::new(Duration::ZERO);
    }

    #[test]
    fn test_frame_timer_is_monotonic() {
        let mut timer = FrameTimer::new();
        let first = timer.tick();
        let second = timer.tick();
        assert!(first < Duration::from_secs(60));
        assert!(second < Duration::from_secs(60));
    }
}
