//! Data-driven game balance
//!
//! Every gameplay number lives here so a page can override it with an inline
//! JSON block without rebuilding the wasm bundle.

use serde::{Deserialize, Serialize};

/// Gameplay constants. Sizes and speeds are "base" values at scale 1.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Ship ===
    pub ship_width: f32,
    pub ship_height: f32,
    /// Keyboard movement speed (px/s)
    pub ship_speed: f32,
    /// Ship hit radius as a fraction of max(width, height)
    pub ship_hit_factor: f32,

    // === Enemies ===
    pub enemy_radius: f32,
    /// Extra random radius, as a fraction of the scaled base radius
    pub enemy_radius_jitter: f32,
    /// Fall speed (px/s)
    pub enemy_speed: f32,
    pub enemy_min_hp: u8,
    pub enemy_max_hp: u8,
    /// Enemy hit radius as a fraction of its drawn radius
    pub enemy_hit_factor: f32,
    /// Hit flash duration (ms)
    pub hit_flash_ms: f32,
    /// Enemies spawned immediately when a session begins
    pub initial_enemies: usize,

    // === Spawn cadence ===
    pub spawn_interval_ms: f64,
    pub spawn_interval_decay: f64,
    pub spawn_interval_min_ms: f64,

    // === Bullets ===
    pub shoot_cooldown_ms: f64,
    /// Bullet speed (px/s), unscaled
    pub bullet_speed: f32,
    pub bullet_radius: f32,
    pub bullet_lifetime_ms: f64,
    /// Distance outside the viewport before a bullet is dropped (px)
    pub offscreen_margin: f32,

    // === Particles ===
    pub ambient_streaks: usize,
    pub hit_burst: usize,
    pub explosion_burst: usize,

    // === Parallax ===
    pub parallax_scroll_speed: f32,
    pub parallax_layer_speeds: [f32; crate::consts::PARALLAX_LAYERS],
    /// Bounded wait for the parallax tile preload (ms)
    pub parallax_wait_ms: u32,
    /// Bounded wait for ship/enemy sprites (ms)
    pub sprite_wait_ms: u32,

    // === Loop / session ===
    /// Upper clamp for the per-frame delta (ms)
    pub max_frame_dt_ms: f64,
    /// Delay between game over and showing the summary overlay (ms)
    pub game_over_delay_ms: i32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            ship_width: 120.0,
            ship_height: 160.0,
            ship_speed: 420.0,
            ship_hit_factor: 0.34,

            enemy_radius: 48.0,
            enemy_radius_jitter: 0.6,
            enemy_speed: 140.0,
            enemy_min_hp: 3,
            enemy_max_hp: 5,
            enemy_hit_factor: 0.72,
            hit_flash_ms: 160.0,
            initial_enemies: 2,

            spawn_interval_ms: 900.0,
            spawn_interval_decay: 0.995,
            spawn_interval_min_ms: 350.0,

            shoot_cooldown_ms: 180.0,
            bullet_speed: 900.0,
            bullet_radius: 6.0,
            bullet_lifetime_ms: 2000.0,
            offscreen_margin: 50.0,

            ambient_streaks: 40,
            hit_burst: 6,
            explosion_burst: 18,

            parallax_scroll_speed: 0.06,
            parallax_layer_speeds: [0.03, 0.07, 0.14, 0.28, 0.6],
            parallax_wait_ms: 700,
            sprite_wait_ms: 2000,

            max_frame_dt_ms: 50.0,
            game_over_delay_ms: 40,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let tuning: Self = serde_json::from_str(json)?;
        Ok(tuning.sanitized())
    }

    /// Repair values that would break invariants (inverted ranges, zero floors)
    pub fn sanitized(mut self) -> Self {
        if self.enemy_min_hp == 0 {
            self.enemy_min_hp = 1;
        }
        if self.enemy_max_hp < self.enemy_min_hp {
            self.enemy_max_hp = self.enemy_min_hp;
        }
        self.spawn_interval_min_ms = self.spawn_interval_min_ms.max(1.0);
        self.spawn_interval_decay = self.spawn_interval_decay.clamp(0.0, 1.0);
        self.max_frame_dt_ms = self.max_frame_dt_ms.max(1.0);
        self
    }

    /// Load overrides from `<script type="application/json" id="tuning">`.
    /// Falls back to defaults (with a warning) when absent or invalid.
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let text = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("tuning"))
            .and_then(|el| el.text_content());

        match text {
            Some(json) if !json.trim().is_empty() => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring invalid tuning block: {}", e);
                    Self::default()
                }
            },
            _ => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "enemy_speed": 200.0 }"#).unwrap();
        assert_eq!(tuning.enemy_speed, 200.0);
        assert_eq!(tuning.shoot_cooldown_ms, 180.0);
        assert_eq!(tuning.parallax_layer_speeds, [0.03, 0.07, 0.14, 0.28, 0.6]);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(Tuning::from_json("{ nope").is_err());
    }

    #[test]
    fn test_sanitize_inverted_hp_range() {
        let tuning = Tuning::from_json(r#"{ "enemy_min_hp": 6, "enemy_max_hp": 2 }"#).unwrap();
        assert_eq!(tuning.enemy_min_hp, 6);
        assert_eq!(tuning.enemy_max_hp, 6);
    }
}
