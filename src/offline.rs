//! Offline support
//!
//! A fixed manifest is cached when the service worker installs; afterwards
//! every fetch is answered from the cache first and the network second. There
//! is no revalidation: shipping new assets means bumping [`CACHE_NAME`].
//!
//! The service worker itself is a few lines of JS that import this module and
//! forward `install`/`fetch` to [`sw_precache`] and [`sw_respond`].

use crate::platform::assets::{
    BLASTER_SOUND, ENEMY_SPRITE, MUSIC_TRACK, SHIP_SPRITE, TILE_HIGH_RES, TILE_STANDARD,
};

pub const CACHE_NAME: &str = "starship-neon-cache-v1";

/// Paths cached on install, relative to the worker's scope
pub const PRECACHE: &[&str] = &[
    "./",
    "./index.html",
    "./manifest.json",
    "./sw.js",
    "./starship-neon.js",
    "./starship-neon_bg.wasm",
    SHIP_SPRITE,
    ENEMY_SPRITE,
    TILE_STANDARD,
    TILE_HIGH_RES,
    MUSIC_TRACK,
    BLASTER_SOUND,
];

#[cfg(target_arch = "wasm32")]
pub use worker::{sw_precache, sw_respond};

#[cfg(target_arch = "wasm32")]
mod worker {
    use js_sys::Array;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Cache, CacheStorage, Request, Response, ServiceWorkerGlobalScope};

    use super::{CACHE_NAME, PRECACHE};

    fn caches() -> Result<(ServiceWorkerGlobalScope, CacheStorage), JsValue> {
        let scope: ServiceWorkerGlobalScope = js_sys::global().dyn_into()?;
        let caches = scope.caches()?;
        Ok((scope, caches))
    }

    /// `install`: store every manifest entry
    #[wasm_bindgen]
    pub async fn sw_precache() -> Result<(), JsValue> {
        let (_, caches) = caches()?;
        let cache: Cache = JsFuture::from(caches.open(CACHE_NAME)).await?.dyn_into()?;
        let paths: Array = PRECACHE.iter().map(|p| JsValue::from_str(p)).collect();
        JsFuture::from(cache.add_all_with_str_sequence(&paths)).await?;
        log::info!("Precached {} assets into {}", PRECACHE.len(), CACHE_NAME);
        Ok(())
    }

    /// `fetch`: cached response if present, else the network
    #[wasm_bindgen]
    pub async fn sw_respond(request: Request) -> Result<Response, JsValue> {
        let (scope, caches) = caches()?;
        let cached = JsFuture::from(caches.match_with_request(&request)).await?;
        if !cached.is_undefined() {
            return cached.dyn_into();
        }
        JsFuture::from(scope.fetch_with_request(&request))
            .await?
            .dyn_into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_manifest_has_no_duplicates() {
        let unique: HashSet<_> = PRECACHE.iter().collect();
        assert_eq!(unique.len(), PRECACHE.len());
    }

    #[test]
    fn test_manifest_covers_shell_and_assets() {
        for path in ["./index.html", "./starship-neon_bg.wasm", SHIP_SPRITE, TILE_HIGH_RES] {
            assert!(PRECACHE.contains(&path), "{} missing", path);
        }
    }
}
