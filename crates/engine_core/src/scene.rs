//! Scene rectangle the falling shapes live in.

use glam::DVec2;

/// Axis-aligned play area in screen pixels (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for SceneRect {
    fn default() -> Self {
        Self::new(100.0, 100.0)
    }
}

impl SceneRect {
    /// Create a scene anchored at the origin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }

    /// Create a scene with an explicit origin.
    pub fn from_origin(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    pub fn center(&self) -> DVec2 {
        DVec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }

    /// Horizontal span `(min_x, width)` of the centred square drop zone.
    ///
    /// Shapes only enter within the middle `min(width, height)` columns so a
    /// wide screen does not drop them out of the players' reach.
    pub fn drop_zone(&self) -> (f64, f64) {
        let zone = self.height.min(self.width);
        (self.left + (self.width - zone) / 2.0, zone)
    }
}
