//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame time to simulation time
//! - DOM rendering and page elements (wasm32 only)

#[cfg(target_arch = "wasm32")]
pub mod dom;

use crate::consts::MAX_FRAME_MS;

/// Turns animation-frame timestamps into whole milliseconds for `Game::advance`.
///
/// Long gaps (hidden tab, debugger) are clamped so the game doesn't fast-forward
/// through a breach the player never saw; fractional milliseconds carry over.
#[derive(Debug, Default, Clone)]
pub struct FrameClock {
    last_time: Option<f64>,
    carry: f64,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current timestamp (ms); returns the whole ms to simulate
    pub fn tick(&mut self, time_ms: f64) -> u64 {
        let dt = match self.last_time {
            Some(last) => time_ms - last,
            None => 0.0,
        };
        self.last_time = Some(time_ms);

        let dt = if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_MS) } else { 0.0 };
        let total = self.carry + dt;
        let whole = total.floor();
        self.carry = total - whole;
        whole as u64
    }

    /// Forget the last timestamp (e.g. after the loop was paused)
    pub fn reset(&mut self) {
        self.last_time = None;
        self.carry = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_frame_is_zero() {
        let mut clock = FrameClock::new();
        assert_eq!(clock.tick(12_345.0), 0);
        assert_eq!(clock.tick(12_361.0), 16);
    }

    #[test]
    fn test_fractions_carry_over() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        let total: u64 = (1..=6).map(|i| clock.tick(i as f64 * 16.5)).sum();
        assert_eq!(total, 99);
    }

    #[test]
    fn test_long_gaps_are_clamped() {
        let mut clock = FrameClock::new();
        clock.tick(0.0);
        assert_eq!(clock.tick(5_000.0), MAX_FRAME_MS as u64);
    }

    #[test]
    fn test_time_going_backwards() {
        let mut clock = FrameClock::new();
        clock.tick(100.0);
        assert_eq!(clock.tick(50.0), 0);
        assert_eq!(clock.tick(f64::NAN), 0);
        assert_eq!(clock.tick(f64::NAN), 0);

        clock.reset();
        clock.tick(1000.0);
        assert_eq!(clock.tick(1010.0), 10);
    }
}
