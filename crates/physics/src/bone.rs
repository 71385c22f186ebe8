//! Motion prediction for tracked body segments.
//!
//! The sensor delivers skeleton frames at its own pace (and with jitter),
//! while the simulation ticks several times per displayed frame. `BoneData`
//! keeps the last observed pose of one body segment together with a smoothed
//! endpoint velocity, so the simulation can ask where that body part most
//! likely is *right now*.

use std::time::{Duration, Instant};

use engine_core::DVec2;

use crate::Segment;

/// Weight kept from the previous velocity on every update.
pub const VELOCITY_SMOOTHING: f64 = 0.8;

/// Updates closer together than this are treated as this far apart.
pub const MIN_UPDATE_INTERVAL: Duration = Duration::from_millis(10);

/// Last observed pose and smoothed velocity of one body segment.
#[derive(Debug, Clone, Copy)]
pub struct BoneData {
    /// Most recent observed pose.
    pub segment: Segment,
    /// Pose observed before `segment`.
    pub previous: Segment,
    /// Smoothed velocity of the first endpoint, in pixels per second.
    pub velocity1: DVec2,
    /// Smoothed velocity of the second endpoint, in pixels per second.
    pub velocity2: DVec2,
    /// When `segment` was observed.
    pub last_updated: Instant,
}

impl BoneData {
    /// Start tracking a segment first observed at `now`, at rest.
    pub fn new(segment: Segment, now: Instant) -> Self {
        Self {
            segment,
            previous: segment,
            velocity1: DVec2::ZERO,
            velocity2: DVec2::ZERO,
            last_updated: now,
        }
    }

    /// Record a newly observed pose and fold its instantaneous velocity into
    /// the smoothed one.
    pub fn update(&mut self, segment: Segment, now: Instant) {
        self.previous = self.segment;
        self.segment = segment;

        let elapsed = now
            .saturating_duration_since(self.last_updated)
            .max(MIN_UPDATE_INTERVAL);
        let per_second = 1.0 / elapsed.as_secs_f64();
        self.last_updated = now;

        let keep = VELOCITY_SMOOTHING;
        let take = 1.0 - VELOCITY_SMOOTHING;
        self.velocity1 = self.velocity1 * keep + (self.segment.p1 - self.previous.p1) * per_second * take;
        // A circle only has one meaningful endpoint.
        if !self.segment.is_circle() {
            self.velocity2 =
                self.velocity2 * keep + (self.segment.p2 - self.previous.p2) * per_second * take;
        }
    }

    /// Extrapolate the pose to `now` from the last observation.
    pub fn estimate_at(&self, now: Instant) -> Segment {
        let elapsed_ms = now.saturating_duration_since(self.last_updated).as_secs_f64() * 1000.0;
        let p1 = self.segment.p1 + self.velocity1 * elapsed_ms / 1000.0;
        let p2 = if self.segment.is_circle() {
            p1
        } else {
            self.segment.p2 + self.velocity2 * elapsed_ms / 1000.0
        };
        self.segment.moved_to(p1, p2)
    }

    /// Velocity at a point `t` (0..1) along the segment, blending the two
    /// endpoint velocities. Circles move as a whole.
    pub fn velocity_at(&self, t: f64) -> DVec2 {
        if self.segment.is_circle() {
            self.velocity1
        } else {
            self.velocity1 * (1.0 - t) + self.velocity2 * t
        }
    }
}
