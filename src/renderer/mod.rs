//! Rendering module
//!
//! `scene` builds a backend-agnostic display list; `canvas` replays it on a
//! Canvas2D context in the browser.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod scene;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasRenderer, SpriteImages};
pub use scene::{Blend, Color, DrawCmd, ImageId, SpriteAvailability, build};
