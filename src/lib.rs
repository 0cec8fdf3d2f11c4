//! Starship Neon - a neon vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Platform-free simulation (world state, motion, collisions)
//! - `renderer`: Display list generation and the Canvas2D backend
//! - `platform`: Input routing, asset loading, browser error types
//! - `session`: Session phases, session tokens, frame clock
//! - `tuning`: Data-driven game balance
//! - `settings`: Persisted player preferences
//! - `offline`: Service worker precache + cache-first fetch

#[cfg(target_arch = "wasm32")]
pub mod audio;
pub mod offline;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use session::{FrameClock, Session, SessionToken};
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

/// Game configuration constants that are not tunable
pub mod consts {
    /// Viewport width (CSS px) at which the scale factor is exactly 1.0
    pub const REFERENCE_WIDTH: f32 = 900.0;
    /// Scale factor clamp range
    pub const MIN_SCALE: f32 = 0.6;
    pub const MAX_SCALE: f32 = 1.6;

    /// Number of parallax depth layers
    pub const PARALLAX_LAYERS: usize = 5;

    /// Debounce applied to window resize before the scale is recomputed (ms)
    pub const RESIZE_DEBOUNCE_MS: i32 = 100;

    /// Vertical spawn offset above the top edge for new enemies (px)
    pub const ENEMY_SPAWN_LIFT: f32 = 10.0;
    /// Extra distance below the bottom edge before an enemy is culled (px)
    pub const ENEMY_CULL_MARGIN: f32 = 20.0;

    /// Ship spawn distance above the bottom edge, before scaling (px)
    pub const SHIP_SPAWN_LIFT: f32 = 200.0;
    /// Bullet muzzle offset as a fraction of ship height
    pub const MUZZLE_OFFSET: f32 = 0.45;

    /// Reference frame duration that particle speeds are expressed in (ms)
    pub const PARTICLE_FRAME_MS: f32 = 16.0;
}

/// Squared-distance circle overlap test (inclusive)
#[inline]
pub fn circles_touch(a: glam::Vec2, ra: f32, b: glam::Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}
