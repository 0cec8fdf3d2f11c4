//! Parallax background layers
//!
//! Five passes of the same tile scroll at different speeds. Which tile (if
//! any) is used is decided once per session setup by [`TileChoice::resolve`].

use glam::Vec2;

use crate::consts::PARALLAX_LAYERS;
use crate::tuning::Tuning;

/// Vertical stagger between consecutive layers, before scaling (px)
const LAYER_STAGGER: f32 = 8.0;

/// Which background the renderer uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TileChoice {
    /// The @2x tile loaded within the bounded wait
    HighRes,
    /// Only the standard tile is available
    Standard,
    /// No tile: three-stop vertical gradient
    #[default]
    Gradient,
}

impl TileChoice {
    /// Prefer the high-res tile, then the standard one, then the gradient.
    ///
    /// The standard tile gates the chain: if it fails, the gradient is used
    /// even when the high-res tile arrived.
    pub fn resolve(standard_loaded: bool, high_res_loaded: bool) -> Self {
        match (standard_loaded, high_res_loaded) {
            (false, _) => TileChoice::Gradient,
            (true, true) => TileChoice::HighRes,
            (true, false) => TileChoice::Standard,
        }
    }

    #[inline]
    pub fn is_tiled(&self) -> bool {
        !matches!(self, TileChoice::Gradient)
    }
}

/// Scroll state for all layers
#[derive(Debug, Clone, PartialEq)]
pub struct ParallaxState {
    pub tile: TileChoice,
    /// Natural size of the chosen tile image (px)
    pub tile_size: Vec2,
    pub offsets: [f32; PARALLAX_LAYERS],
    speeds: [f32; PARALLAX_LAYERS],
    scroll_speed: f32,
}

impl ParallaxState {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            tile: TileChoice::Gradient,
            tile_size: Vec2::ZERO,
            offsets: [0.0; PARALLAX_LAYERS],
            speeds: tuning.parallax_layer_speeds,
            scroll_speed: tuning.parallax_scroll_speed,
        }
    }

    /// Install the result of a parallax setup. Unusable tile sizes degrade to
    /// the gradient.
    pub fn set_tile(&mut self, choice: TileChoice, size: Vec2) {
        if choice.is_tiled() && size.x >= 1.0 && size.y >= 1.0 {
            self.tile = choice;
            self.tile_size = size;
        } else {
            self.tile = TileChoice::Gradient;
            self.tile_size = Vec2::ZERO;
        }
        self.reset_offsets();
    }

    pub fn reset_offsets(&mut self) {
        self.offsets = [0.0; PARALLAX_LAYERS];
    }

    /// Scroll every layer; offsets stay in `[0, tile height)`.
    /// The gradient fallback has nothing to scroll.
    pub fn advance(&mut self, dt_ms: f64) {
        if !self.tile.is_tiled() {
            return;
        }
        let tile_h = self.tile_size.y;
        let dt = dt_ms as f32;
        for (offset, speed) in self.offsets.iter_mut().zip(self.speeds) {
            let mut next = (*offset - self.scroll_speed * speed * dt) % tile_h;
            if next < 0.0 {
                next += tile_h;
            }
            // Float rounding can land exactly on tile_h after the wrap
            *offset = if next >= tile_h { 0.0 } else { next };
        }
    }

    /// Top-left corners of every tile needed to cover the viewport for `layer`
    pub fn layer_tiles(&self, layer: usize, width: f32, height: f32, scale: f32) -> Vec<Vec2> {
        if !self.tile.is_tiled() || layer >= PARALLAX_LAYERS {
            return Vec::new();
        }
        let Vec2 { x: tile_w, y: tile_h } = self.tile_size;
        let stagger = (PARALLAX_LAYERS - 1 - layer) as f32 * LAYER_STAGGER * scale;
        let start_y = height - tile_h - stagger - self.offsets[layer];
        let tiles_x = (width / tile_w).ceil() as usize + 1;

        let mut rows = Vec::new();
        let mut y = start_y;
        while y < height {
            rows.push(y);
            y += tile_h;
        }
        let mut y = start_y - tile_h;
        while y > -tile_h {
            rows.push(y);
            y -= tile_h;
        }

        rows.into_iter()
            .flat_map(|y| (0..tiles_x).map(move |tx| Vec2::new(tx as f32 * tile_w, y)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn tiled() -> ParallaxState {
        let mut state = ParallaxState::new(&Tuning::default());
        state.set_tile(TileChoice::Standard, Vec2::new(256.0, 256.0));
        state
    }

    #[test]
    fn test_fallback_chain() {
        assert_eq!(TileChoice::resolve(true, true), TileChoice::HighRes);
        assert_eq!(TileChoice::resolve(true, false), TileChoice::Standard);
        assert_eq!(TileChoice::resolve(false, false), TileChoice::Gradient);
        assert_eq!(TileChoice::resolve(false, true), TileChoice::Gradient);
    }

    #[test]
    fn test_gradient_does_not_scroll() {
        let mut state = ParallaxState::new(&Tuning::default());
        state.advance(1000.0);
        assert_eq!(state.offsets, [0.0; PARALLAX_LAYERS]);
        assert!(state.layer_tiles(0, 900.0, 800.0, 1.0).is_empty());
    }

    #[test]
    fn test_zero_sized_tile_degrades_to_gradient() {
        let mut state = ParallaxState::new(&Tuning::default());
        state.set_tile(TileChoice::HighRes, Vec2::new(0.0, 0.0));
        assert_eq!(state.tile, TileChoice::Gradient);
    }

    #[test]
    fn test_first_step_wraps_upward() {
        let mut state = tiled();
        state.advance(100.0);
        // Fastest layer: 0 - 0.06 * 0.6 * 100 = -3.6 -> 252.4
        assert!((state.offsets[4] - 252.4).abs() < 1e-3);
        assert!(state.offsets[0] > state.offsets[4]);
    }

    #[test]
    fn test_layer_tiles_cover_viewport() {
        let state = tiled();
        let tiles = state.layer_tiles(4, 900.0, 800.0, 1.0);
        // 5 columns (ceil(900/256) + 1) across rows reaching both edges
        assert_eq!(tiles.iter().filter(|t| t.y == tiles[0].y).count(), 5);
        let min_y = tiles.iter().map(|t| t.y).fold(f32::MAX, f32::min);
        let max_y = tiles.iter().map(|t| t.y).fold(f32::MIN, f32::max);
        assert!(min_y <= 0.0);
        assert!(max_y + 256.0 >= 800.0);
    }

    proptest! {
        #[test]
        fn prop_offsets_stay_in_tile(steps in proptest::collection::vec(0.0f64..5_000.0, 1..50)) {
            let mut state = tiled();
            for dt in steps {
                state.advance(dt);
                for offset in state.offsets {
                    prop_assert!((0.0..256.0).contains(&offset));
                }
            }
        }
    }
}
