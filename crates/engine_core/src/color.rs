//! 8-bit RGB colours and the two colouring schemes used for new shapes.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// An opaque 8-bit RGB colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A random colour with every channel in 40..=254 (never too dark).
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self {
            r: rng.gen_range(40..255),
            g: rng.gen_range(40..255),
            b: rng.gen_range(40..255),
        }
    }

    /// A random variation of `self`: each channel scaled by 0.7..1.4, saturating at 255.
    pub fn tinted<R: Rng>(&self, rng: &mut R) -> Self {
        let mut scale = |c: u8| (c as f64 * (0.7 + rng.gen::<f64>() * 0.7)).min(255.0) as u8;
        Self {
            r: scale(self.r),
            g: scale(self.g),
            b: scale(self.b),
        }
    }

    /// Lighter outline colour drawn around a filled shape.
    pub fn edge(&self) -> Self {
        let factor = 0.4 + (self.r as f64 + self.g as f64 + self.b as f64) / 1600.0;
        let lift = |c: u8| (255.0 - (255.0 - c as f64) * factor) as u8;
        Self {
            r: lift(self.r),
            g: lift(self.g),
            b: lift(self.b),
        }
    }
}

/// How new shapes pick their fill colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    /// Fully random colour per shape.
    Random,
    /// Random tint of a base colour.
    Tinted(Rgb),
}

impl Default for ColorMode {
    fn default() -> Self {
        ColorMode::Tinted(Rgb::new(0, 130, 255))
    }
}

impl ColorMode {
    pub fn pick<R: Rng>(&self, rng: &mut R) -> Rgb {
        match self {
            ColorMode::Random => Rgb::random(rng),
            ColorMode::Tinted(base) => base.tinted(rng),
        }
    }
}
