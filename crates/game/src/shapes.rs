//! Shape kinds that can fall, and which of them are enabled.

use engine_core::DVec2;
use serde::{Deserialize, Serialize};

/// Every shape a falling thing can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShapeKind {
    Triangle,
    Square,
    Star,
    Pentagon,
    Hex,
    Star7,
    /// Filled disc.
    Circle,
    /// Outlined ring.
    Bubble,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 8] = [
        ShapeKind::Triangle,
        ShapeKind::Square,
        ShapeKind::Star,
        ShapeKind::Pentagon,
        ShapeKind::Hex,
        ShapeKind::Star7,
        ShapeKind::Circle,
        ShapeKind::Bubble,
    ];

    /// Bit of this kind inside a [`ShapeSet`].
    pub const fn bit(&self) -> u8 {
        match self {
            ShapeKind::Triangle => 0x01,
            ShapeKind::Square => 0x02,
            ShapeKind::Star => 0x04,
            ShapeKind::Pentagon => 0x08,
            ShapeKind::Hex => 0x10,
            ShapeKind::Star7 => 0x20,
            ShapeKind::Circle => 0x40,
            ShapeKind::Bubble => 0x80,
        }
    }

    /// Number of polygon corners; 1 for a filled disc, 0 for a ring.
    pub fn sides(&self) -> u32 {
        match self {
            ShapeKind::Triangle => 3,
            ShapeKind::Square => 4,
            ShapeKind::Star => 5,
            ShapeKind::Pentagon => 5,
            ShapeKind::Hex => 6,
            ShapeKind::Star7 => 7,
            ShapeKind::Circle => 1,
            ShapeKind::Bubble => 0,
        }
    }

    /// How many corners to advance per edge; >1 draws a star.
    pub fn skip(&self) -> u32 {
        match self {
            ShapeKind::Star => 2,
            ShapeKind::Star7 => 3,
            _ => 1,
        }
    }

    pub fn is_round(&self) -> bool {
        self.sides() <= 1
    }

    /// Closed outline of the shape for polygon renderers. Round kinds have
    /// no outline and should be drawn as discs of radius `size`.
    pub fn outline(&self, center: DVec2, size: f64, rotation: f64) -> Vec<DVec2> {
        if self.is_round() {
            return Vec::new();
        }
        let sides = self.sides();
        let step = std::f64::consts::TAU * self.skip() as f64 / sides as f64;
        (0..sides + 2)
            .map(|i| {
                let theta = rotation + step * i as f64;
                center + DVec2::new(theta.cos(), theta.sin()) * size
            })
            .collect()
    }
}

/// Bitset of enabled shape kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeSet(pub u8);

impl Default for ShapeSet {
    fn default() -> Self {
        Self::ALL
    }
}

impl ShapeSet {
    pub const NONE: ShapeSet = ShapeSet(0);
    pub const ALL: ShapeSet = ShapeSet(0xff);

    pub const fn only(kind: ShapeKind) -> Self {
        Self(kind.bit())
    }

    pub fn from_kinds(kinds: &[ShapeKind]) -> Self {
        Self(kinds.iter().fold(0, |bits, k| bits | k.bit()))
    }

    pub fn contains(&self, kind: ShapeKind) -> bool {
        self.0 & kind.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Enabled kinds in declaration order.
    pub fn kinds(&self) -> impl Iterator<Item = ShapeKind> + '_ {
        ShapeKind::ALL.into_iter().filter(|k| self.contains(*k))
    }
}
