//! Player settings and preferences
//!
//! Persisted to LocalStorage, independent of any session.

use serde::{Deserialize, Serialize};

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier applied to the tuned ambient streak count
    pub fn ambient_multiplier(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.5,
            QualityPreset::Medium => 1.0,
            QualityPreset::High => 1.5,
        }
    }

    /// Whether the tiled parallax background is drawn (gradient otherwise)
    pub fn parallax_enabled(&self) -> bool {
        match self {
            QualityPreset::Low => false,
            QualityPreset::Medium => true,
            QualityPreset::High => true,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,
    /// Hit and explosion bursts
    pub particles: bool,

    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,
    /// Pause music when the window loses focus
    pub mute_on_blur: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            particles: true,
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 0.9,
            muted: false,
            mute_on_blur: true,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            (self.master_volume.clamp(0.0, 1.0) * self.music_volume.clamp(0.0, 1.0)) as f64
        }
    }

    /// Effective sound effect gain
    pub fn sfx_gain(&self) -> f64 {
        if self.muted {
            0.0
        } else {
            (self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)) as f64
        }
    }

    /// Number of ambient streaks for a tuned base count
    pub fn ambient_streaks(&self, base: usize) -> usize {
        (base as f32 * self.quality.ambient_multiplier()).round() as usize
    }

    /// LocalStorage key
    const STORAGE_KEY: &'static str = "starship_neon_settings";

    /// Load persisted preferences; unreadable JSON falls back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let Some(json) = stored else {
            return Self::default();
        };
        serde_json::from_str(&json).unwrap_or_else(|e| {
            log::warn!("Discarding unreadable settings: {}", e);
            Self::default()
        })
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            log::warn!("LocalStorage unavailable; settings not saved");
            return;
        };
        match serde_json::to_string(self) {
            Ok(json) => {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Settings write rejected (quota or privacy mode)");
                }
            }
            Err(e) => log::warn!("Cannot serialize settings: {}", e),
        }
    }

    /// Native builds keep nothing between runs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("Settings key {} unused on native", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mute_silences_everything() {
        let settings = Settings {
            muted: true,
            ..Settings::default()
        };
        assert_eq!(settings.music_gain(), 0.0);
        assert_eq!(settings.sfx_gain(), 0.0);
    }

    #[test]
    fn test_gain_is_clamped() {
        let settings = Settings {
            master_volume: 2.0,
            sfx_volume: 0.5,
            ..Settings::default()
        };
        assert!((settings.sfx_gain() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_ambient_streaks_follow_preset() {
        assert_eq!(Settings::from_preset(QualityPreset::Low).ambient_streaks(40), 20);
        assert_eq!(Settings::from_preset(QualityPreset::Medium).ambient_streaks(40), 40);
        assert_eq!(Settings::from_preset(QualityPreset::High).ambient_streaks(40), 60);
    }

    #[test]
    fn test_settings_roundtrip_with_missing_fields() {
        let settings: Settings = serde_json::from_str(r#"{ "quality": "High" }"#).unwrap();
        assert_eq!(settings.quality, QualityPreset::High);
        assert!(settings.particles);
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(settings.quality.as_str(), "High");
    }
}
