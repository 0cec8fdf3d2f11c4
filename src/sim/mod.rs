//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and browser APIs:
//! - One [`World`] per play-through, passed explicitly
//! - Seeded RNG only
//! - Time comes in as a per-frame delta in milliseconds

pub mod collision;
pub mod parallax;
pub mod particles;
pub mod state;
pub mod tick;
pub mod viewport;

pub use collision::{HitReport, Kill, resolve_bullet_hits, ship_collision};
pub use parallax::{ParallaxState, TileChoice};
pub use particles::{Particle, ParticleKind};
pub use state::{Bullet, Enemy, SessionPhase, Ship, World, WorldOptions};
pub use tick::{FrameEvents, TickInput, advance, tick, update};
pub use viewport::{Viewport, scale_factor};
