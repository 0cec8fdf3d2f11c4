//! Typed failures of browser-facing operations
//!
//! None of these are fatal on their own: callers pick a fallback (gradient
//! background, primitive sprites, silent play) and log the error.

/// Failure of a platform operation
#[derive(thiserror::Error, Debug)]
pub enum PlatformError {
    #[error("failed to load asset {0}")]
    AssetLoad(String),

    #[error("asset {src} not ready within {ms} ms")]
    AssetTimeout { src: String, ms: u32 },

    #[error("fullscreen request denied: {0}")]
    FullscreenDenied(String),

    #[error("audio playback blocked: {0}")]
    AudioBlocked(String),

    #[error("missing element: {0}")]
    MissingElement(&'static str),

    #[error("javascript error: {0}")]
    Js(String),
}

/// Best-effort message of a thrown JS value
#[cfg(target_arch = "wasm32")]
pub fn describe(value: &wasm_bindgen::JsValue) -> String {
    use wasm_bindgen::JsCast;

    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for PlatformError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        PlatformError::Js(describe(&value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = PlatformError::AssetTimeout {
            src: "bg_tile@2x.png".into(),
            ms: 700,
        };
        assert_eq!(err.to_string(), "asset bg_tile@2x.png not ready within 700 ms");
        assert_eq!(
            PlatformError::AudioBlocked("NotAllowedError".into()).to_string(),
            "audio playback blocked: NotAllowedError"
        );
    }
}
