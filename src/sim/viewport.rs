//! Viewport dimensions and the global scale factor
//!
//! Every size and speed in the simulation is multiplied by a single scale
//! derived from the viewport width.

use glam::Vec2;

use crate::consts::{MAX_SCALE, MIN_SCALE, REFERENCE_WIDTH};

/// `clamp(width / 900, 0.6, 1.6)`
#[inline]
pub fn scale_factor(viewport_width: f32) -> f32 {
    (viewport_width / REFERENCE_WIDTH).clamp(MIN_SCALE, MAX_SCALE)
}

/// Visible play area in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    pub fn scale(&self) -> f32 {
        scale_factor(self.width)
    }

    /// Whether `pos` lies inside the viewport grown by `margin` on every side
    pub fn contains_with_margin(&self, pos: Vec2, margin: f32) -> bool {
        pos.x >= -margin
            && pos.x <= self.width + margin
            && pos.y >= -margin
            && pos.y <= self.height + margin
    }

    /// Clamp a centered box of `half` extents so it stays fully on screen
    pub fn clamp_box(&self, center: Vec2, half: Vec2) -> Vec2 {
        // min() before max() so an oversized box pins to its top-left edge
        Vec2::new(
            center.x.min(self.width - half.x).max(half.x),
            center.y.min(self.height - half.y).max(half.y),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_scale_reference_width() {
        assert_eq!(scale_factor(900.0), 1.0);
        assert_eq!(scale_factor(100.0), 0.6);
        assert_eq!(scale_factor(4000.0), 1.6);
    }

    #[test]
    fn test_clamp_box() {
        let vp = Viewport::new(900.0, 800.0);
        let half = Vec2::new(60.0, 80.0);
        assert_eq!(vp.clamp_box(Vec2::new(-10.0, 900.0), half), Vec2::new(60.0, 720.0));
        assert_eq!(vp.clamp_box(Vec2::new(450.0, 400.0), half), Vec2::new(450.0, 400.0));
    }

    #[test]
    fn test_margin_bounds() {
        let vp = Viewport::new(900.0, 800.0);
        assert!(vp.contains_with_margin(Vec2::new(-50.0, 0.0), 50.0));
        assert!(!vp.contains_with_margin(Vec2::new(-50.5, 0.0), 50.0));
        assert!(!vp.contains_with_margin(Vec2::new(10.0, 851.0), 50.0));
    }

    proptest! {
        #[test]
        fn prop_scale_is_clamped_ratio(width in 0.0f32..10_000.0) {
            prop_assert_eq!(scale_factor(width), (width / 900.0).clamp(0.6, 1.6));
            let s = scale_factor(width);
            prop_assert!((0.6..=1.6).contains(&s));
        }
    }
}
