//! Floating score popups and banners that grow and fade out.

use engine_core::DVec2;

/// Alpha lost per displayed frame.
const FADE_PER_FRAME: f64 = 0.004;

/// A text popup drifting in place while it grows and fades.
#[derive(Debug, Clone, PartialEq)]
pub struct FlyingText {
    pub text: String,
    pub center: DVec2,
    pub font_size: f64,
    growth: f64,
    alpha: f64,
}

impl FlyingText {
    pub fn new(text: impl Into<String>, font_size: f64, center: DVec2) -> Self {
        Self {
            text: text.into(),
            center,
            font_size,
            growth: font_size.max(0.0).sqrt() * 0.4,
            alpha: 1.0,
        }
    }

    /// Advance one displayed frame.
    pub fn advance(&mut self) {
        self.alpha = (self.alpha - FADE_PER_FRAME).max(0.0);
        self.font_size += self.growth;
    }

    /// Drawing opacity; eases out faster than the raw alpha.
    pub fn opacity(&self) -> f64 {
        self.alpha.powf(1.5)
    }

    pub fn is_done(&self) -> bool {
        self.alpha <= 0.0
    }
}

/// Owns every live popup.
#[derive(Debug, Clone, Default)]
pub struct FlyingTexts {
    texts: Vec<FlyingText>,
}

impl FlyingTexts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, text: impl Into<String>, font_size: f64, center: DVec2) {
        self.texts.push(FlyingText::new(text, font_size, center));
    }

    /// Drop finished popups, then grow and fade the rest.
    pub fn advance(&mut self) {
        self.texts.retain(|t| !t.is_done());
        for text in &mut self.texts {
            text.advance();
        }
    }

    pub fn clear(&mut self) {
        self.texts.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &FlyingText> {
        self.texts.iter()
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }
}
