//! A single falling shape: pose, motion, lifecycle and hit bookkeeping.

use std::time::{Duration, Instant};

use engine_core::{DVec2, Rgb};
use input::PlayerId;
use physics::{bounce_off, hit_test, Contact, Segment};

use crate::shapes::ShapeKind;

/// Hits on the same shape closer together than this count as one contact.
pub const HIT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Interval assumed for the first hit on a shape.
pub const FIRST_HIT_INTERVAL_MS: f64 = 1000.0;

/// Highest hotness a shape reaches by being passed between players.
pub const MAX_HOTNESS: u8 = 4;

/// Lifecycle of a falling shape. The engine drives every transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThingState {
    Falling,
    Bouncing,
    Dissolving,
    Removed,
}

impl ThingState {
    /// Shapes in these states still collide with players.
    pub fn is_live(&self) -> bool {
        matches!(self, ThingState::Falling | ThingState::Bouncing)
    }
}

/// One shape flying through the scene.
#[derive(Debug, Clone, PartialEq)]
pub struct Thing {
    pub center: DVec2,
    /// Radius in pixels.
    pub size: f64,
    /// Rotation in radians.
    pub rotation: f64,
    /// Radians per tick.
    pub spin_rate: f64,
    /// Pixels per tick.
    pub velocity: DVec2,
    pub kind: ShapeKind,
    pub color: Rgb,
    pub state: ThingState,
    /// 0..1 progress of the dissolve animation.
    pub dissolve: f64,
    pub last_hit: Option<Instant>,
    /// Smoothed milliseconds between hits.
    pub avg_hit_interval_ms: f64,
    /// Last player to touch this shape.
    pub touched_by: Option<PlayerId>,
    /// Score level from passes between players (0..=4).
    pub hotness: u8,
    /// Frames the bouncing pulse has been shown.
    pub flash_count: u32,
}

impl Thing {
    /// A fresh shape at rest.
    pub fn new(kind: ShapeKind, center: DVec2, size: f64, color: Rgb) -> Self {
        Self {
            center,
            size,
            rotation: 0.0,
            spin_rate: 0.0,
            velocity: DVec2::ZERO,
            kind,
            color,
            state: ThingState::Falling,
            dissolve: 0.0,
            last_hit: None,
            avg_hit_interval_ms: 100.0,
            touched_by: None,
            hotness: 0,
            flash_count: 0,
        }
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_spin(mut self, spin_rate: f64) -> Self {
        self.spin_rate = spin_rate;
        self
    }

    /// Test this shape against a body segment.
    pub fn hit(&self, segment: &Segment) -> Option<Contact> {
        hit_test(self.center, self.size, segment)
    }

    /// Bounce off a body of `other_radius` touching at `contact` and moving
    /// at `other_velocity` pixels per tick.
    pub fn bounce_off(&mut self, contact: DVec2, other_radius: f64, other_velocity: DVec2) {
        let bounce = bounce_off(
            self.center,
            self.velocity,
            self.size,
            contact,
            other_radius,
            other_velocity,
        );
        self.center = bounce.center;
        self.velocity = bounce.velocity;
    }

    /// Record a hit at `now` and return the milliseconds since the previous
    /// one (or [`FIRST_HIT_INTERVAL_MS`] for the first).
    pub fn record_hit(&mut self, now: Instant) -> f64 {
        let interval_ms = match self.last_hit {
            Some(last) => now.saturating_duration_since(last).as_secs_f64() * 1000.0,
            None => FIRST_HIT_INTERVAL_MS,
        };
        self.avg_hit_interval_ms = self.avg_hit_interval_ms * 0.8 + 0.2 * interval_ms;
        self.last_hit = Some(now);
        interval_ms
    }

    /// Start the bouncing phase on behalf of `player`.
    pub fn start_bouncing(&mut self, player: PlayerId) {
        self.state = ThingState::Bouncing;
        self.touched_by = Some(player);
        self.hotness = 1;
        self.flash_count = 0;
    }

    /// Pass a bouncing shape to another player, heating it up.
    pub fn pass_to(&mut self, player: PlayerId) {
        self.touched_by = Some(player);
        self.hotness = (self.hotness + 1).min(MAX_HOTNESS);
    }

    /// Stop in place and spin up while fading out.
    pub fn capture(&mut self) {
        self.state = ThingState::Dissolving;
        self.dissolve = 0.0;
        self.velocity = DVec2::ZERO;
        self.spin_rate = self.spin_rate * 6.0 + 0.2;
    }

    /// Fade out without the capture spin (used by a game reset).
    pub fn fade_out(&mut self) {
        self.state = ThingState::Dissolving;
        self.dissolve = 0.0;
    }

    /// Opacity for drawing: fades quadratically while dissolving.
    pub fn opacity(&self) -> f64 {
        if self.state == ThingState::Dissolving {
            (1.0 - self.dissolve * self.dissolve).max(0.0)
        } else {
            1.0
        }
    }

    /// Edge pulse (0..1) of a bouncing shape; faster the hotter it is.
    pub fn pulse(&self) -> Option<f64> {
        (self.state == ThingState::Bouncing)
            .then(|| (0.15 * self.flash_count as f64 * self.hotness as f64).cos() * 0.5 + 0.5)
    }
}
