//! Frame pacing for the simulation loop.

use std::time::{Duration, Instant};

/// Sleeps shorter than this are skipped; the OS timer cannot honour them.
pub const TIMER_RESOLUTION: Duration = Duration::from_millis(2);

/// How often (in frames) the target rate is re-evaluated.
pub const RATE_CHECK_INTERVAL: u64 = 100;

/// Paces a fixed-rate loop and lowers its target rate when the machine
/// cannot keep up.
#[derive(Debug)]
pub struct FrameClock {
    /// Time of the last `begin_frame`.
    last_frame: Option<Instant>,
    /// Deadline of the next frame.
    next_frame: Instant,
    /// Exponentially smoothed frame time in milliseconds.
    avg_frame_ms: f64,
    /// Frames since start.
    frame_count: u64,
    /// Rate the loop is currently trying to hold, in Hz.
    target_rate: f64,
    /// The target rate never drops below this.
    min_rate: f64,
}

impl FrameClock {
    /// Create a clock aiming for `target_rate` Hz, never adapting below `min_rate`.
    pub fn new(target_rate: f64, min_rate: f64, now: Instant) -> Self {
        let min_rate = min_rate.max(1.0);
        let target_rate = target_rate.max(min_rate);
        Self {
            last_frame: None,
            next_frame: now,
            avg_frame_ms: 1000.0 / target_rate,
            frame_count: 0,
            target_rate,
            min_rate,
        }
    }

    /// Account for a new frame starting at `now` and return how long to sleep
    /// before doing the frame's work.
    pub fn begin_frame(&mut self, now: Instant) -> Duration {
        let last = self.last_frame.unwrap_or(now);
        let ms = now.saturating_duration_since(last).as_secs_f64() * 1000.0;
        self.avg_frame_ms = self.avg_frame_ms * 0.95 + 0.05 * ms;
        self.last_frame = Some(now);
        self.frame_count += 1;

        if self.is_rate_check_frame() {
            let actual = self.actual_rate();
            if actual < self.target_rate * 0.92 {
                let lowered = ((self.target_rate + actual) / 2.0).max(self.min_rate);
                log::debug!(
                    "Frame rate {:.1} Hz below target {:.1} Hz, lowering target to {:.1} Hz",
                    actual,
                    self.target_rate,
                    lowered
                );
                self.target_rate = lowered;
            }
        }

        let sleep = if now > self.next_frame {
            self.next_frame = now;
            Duration::ZERO
        } else {
            let remaining = self.next_frame - now;
            if remaining >= TIMER_RESOLUTION {
                remaining
            } else {
                Duration::ZERO
            }
        };
        self.next_frame += Duration::from_secs_f64(1.0 / self.target_rate);
        sleep
    }

    /// True on frames where the rate was just re-evaluated; callers use it
    /// to forward the measured rate to the simulation.
    pub fn is_rate_check_frame(&self) -> bool {
        self.frame_count > 0 && self.frame_count % RATE_CHECK_INTERVAL == 0
    }

    /// Measured frame rate from the smoothed frame time.
    pub fn actual_rate(&self) -> f64 {
        if self.avg_frame_ms > 0.0 {
            1000.0 / self.avg_frame_ms
        } else {
            self.target_rate
        }
    }

    pub fn target_rate(&self) -> f64 {
        self.target_rate
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}
