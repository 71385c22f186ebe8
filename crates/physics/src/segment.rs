//! Point-or-line collision bodies.

use engine_core::DVec2;

/// Which hand (if any) a body segment stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    None,
    LeftHand,
    RightHand,
}

/// Side of the body a hand belongs to; scores are kept per side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandSide {
    Left,
    Right,
}

impl Role {
    pub fn is_hand(self) -> bool {
        self.hand_side().is_some()
    }

    pub fn hand_side(self) -> Option<HandSide> {
        match self {
            Role::None => None,
            Role::LeftHand => Some(HandSide::Left),
            Role::RightHand => Some(HandSide::Right),
        }
    }
}

/// A thick line between two endpoints, or a circle when both endpoints coincide.
///
/// Used for body parts (hands, head, limbs) that falling shapes collide with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p1: DVec2,
    pub p2: DVec2,
    radius: f64,
    role: Role,
}

impl Segment {
    /// A circle of `radius` around `center`.
    pub fn circle(center: DVec2, radius: f64) -> Self {
        Self {
            p1: center,
            p2: center,
            radius: radius.max(0.0),
            role: Role::None,
        }
    }

    /// A capsule from `p1` to `p2` with half-thickness `radius`.
    pub fn line(p1: DVec2, p2: DVec2, radius: f64) -> Self {
        Self {
            p1,
            p2,
            radius: radius.max(0.0),
            role: Role::None,
        }
    }

    /// Tag the segment as a hand (or other role).
    pub fn with_role(mut self, role: Role) -> Self {
        self.role = role;
        self
    }

    pub fn is_circle(&self) -> bool {
        self.p1 == self.p2
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Same body part, new endpoints.
    pub fn moved_to(&self, p1: DVec2, p2: DVec2) -> Self {
        Self { p1, p2, ..*self }
    }

    pub fn length_squared(&self) -> f64 {
        self.p1.distance_squared(self.p2)
    }
}
