//! Browser-facing glue
//!
//! - `input`: keyboard/pointer/touch routing into a per-frame snapshot
//! - `error`: typed failures of fallible browser calls
//! - `assets`: bounded image preloading (wasm)
//! - `dom`: overlay visibility, HUD text, fullscreen (wasm)

pub mod assets;
#[cfg(target_arch = "wasm32")]
pub mod dom;
pub mod error;
pub mod input;

pub use error::PlatformError;
pub use input::{Control, InputState};
