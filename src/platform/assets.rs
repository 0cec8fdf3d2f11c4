//! Asset paths and bounded image preloading
//!
//! Every image is optional. Loads race a timer, so a slow or missing file
//! costs at most the configured wait and never blocks a session start.

/// Ship sprite
pub const SHIP_SPRITE: &str = "player.png";
/// Enemy sprite
pub const ENEMY_SPRITE: &str = "enemy.png";
/// Standard parallax tile
pub const TILE_STANDARD: &str = "bg_tile.png";
/// High-resolution parallax tile
pub const TILE_HIGH_RES: &str = "bg_tile@2x.png";
/// Background music
pub const MUSIC_TRACK: &str = "bg_music.mp3";
/// One-shot blaster effect
pub const BLASTER_SOUND: &str = "blaster.mp3";

#[cfg(target_arch = "wasm32")]
pub use web::*;

#[cfg(target_arch = "wasm32")]
mod web {
    use glam::Vec2;
    use js_sys::{Array, Promise};
    use wasm_bindgen_futures::JsFuture;
    use web_sys::HtmlImageElement;

    use super::*;
    use crate::platform::PlatformError;
    use crate::sim::TileChoice;

    /// A promise that resolves with `undefined` after `ms`
    fn timeout(ms: i32) -> Promise {
        Promise::new(&mut |resolve, _reject| {
            if let Some(window) = web_sys::window() {
                let _ = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms);
            }
        })
    }

    /// An image load already in flight, racing its deadline
    pub struct PendingImage {
        src: &'static str,
        wait_ms: u32,
        img: HtmlImageElement,
        race: Promise,
    }

    impl PendingImage {
        /// Start loading `src` now; the deadline starts ticking immediately
        pub fn start(src: &'static str, wait_ms: u32) -> Result<Self, PlatformError> {
            let img = HtmlImageElement::new()?;
            let loaded = Promise::new(&mut |resolve, reject| {
                img.set_onload(Some(&resolve));
                img.set_onerror(Some(&reject));
            });
            img.set_src(src);
            let race = Promise::race(&Array::of2(&loaded, &timeout(wait_ms as i32)));
            Ok(Self {
                src,
                wait_ms,
                img,
                race,
            })
        }

        /// Wait for the load or the deadline, whichever comes first
        pub async fn finish(self) -> Result<HtmlImageElement, PlatformError> {
            let outcome = JsFuture::from(self.race).await;
            // A late load must not resurrect a decision already made
            self.img.set_onload(None);
            self.img.set_onerror(None);

            match outcome {
                Err(_) => Err(PlatformError::AssetLoad(self.src.to_string())),
                // The timer resolves with undefined, onload with an Event
                Ok(value) if value.is_undefined() => Err(PlatformError::AssetTimeout {
                    src: self.src.to_string(),
                    ms: self.wait_ms,
                }),
                Ok(_) if self.img.natural_width() == 0 => {
                    Err(PlatformError::AssetLoad(self.src.to_string()))
                }
                Ok(_) => Ok(self.img),
            }
        }
    }

    /// Chosen parallax background
    pub struct ParallaxSetup {
        pub choice: TileChoice,
        pub image: Option<HtmlImageElement>,
    }

    impl ParallaxSetup {
        pub fn gradient() -> Self {
            Self {
                choice: TileChoice::Gradient,
                image: None,
            }
        }

        /// Natural size of the chosen tile
        pub fn tile_size(&self) -> Vec2 {
            self.image
                .as_ref()
                .map(|img| Vec2::new(img.natural_width() as f32, img.natural_height() as f32))
                .unwrap_or(Vec2::ZERO)
        }
    }

    /// Load both tile variants concurrently under one deadline and pick the best
    pub async fn setup_parallax(wait_ms: u32) -> ParallaxSetup {
        let standard = PendingImage::start(TILE_STANDARD, wait_ms);
        let high_res = PendingImage::start(TILE_HIGH_RES, wait_ms);

        let standard = match standard {
            Ok(pending) => pending.finish().await,
            Err(e) => Err(e),
        };
        let high_res = match high_res {
            Ok(pending) => pending.finish().await,
            Err(e) => Err(e),
        };

        if let Err(e) = &standard {
            log::warn!("Parallax tile unavailable, using gradient: {}", e);
        }
        if let Err(e) = &high_res {
            log::info!("High-res parallax tile unavailable: {}", e);
        }

        let choice = TileChoice::resolve(standard.is_ok(), high_res.is_ok());
        let image = match choice {
            TileChoice::HighRes => high_res.ok(),
            TileChoice::Standard => standard.ok(),
            TileChoice::Gradient => None,
        };
        log::info!("Parallax background: {:?}", choice);
        ParallaxSetup { choice, image }
    }

    /// Load ship and enemy sprites concurrently; failures leave `None`
    pub async fn load_sprites(wait_ms: u32) -> (Option<HtmlImageElement>, Option<HtmlImageElement>) {
        let ship = PendingImage::start(SHIP_SPRITE, wait_ms);
        let enemy = PendingImage::start(ENEMY_SPRITE, wait_ms);

        let mut loaded = Vec::with_capacity(2);
        for pending in [ship, enemy] {
            let result = match pending {
                Ok(pending) => pending.finish().await,
                Err(e) => Err(e),
            };
            loaded.push(match result {
                Ok(img) => Some(img),
                Err(e) => {
                    log::warn!("Sprite fallback in use: {}", e);
                    None
                }
            });
        }
        let enemy = loaded.pop().flatten();
        let ship = loaded.pop().flatten();
        (ship, enemy)
    }
}
