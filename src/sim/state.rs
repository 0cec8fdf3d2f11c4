//! World state and core simulation types
//!
//! Everything one play-through mutates lives in [`World`]; nothing is global.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::parallax::ParallaxState;
use super::particles::{self, Particle};
use super::viewport::Viewport;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// Current phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionPhase {
    /// Start screen, no ship
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Ship destroyed, summary shown
    Ended,
}

/// The player's ship
#[derive(Debug, Clone, PartialEq)]
pub struct Ship {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Ship {
    /// Spawn centered horizontally, lifted off the bottom edge
    pub fn spawn(viewport: &Viewport, scale: f32, tuning: &Tuning) -> Self {
        Self {
            pos: Vec2::new(
                viewport.width / 2.0,
                viewport.height - SHIP_SPAWN_LIFT * scale,
            ),
            size: Vec2::new(tuning.ship_width, tuning.ship_height) * scale,
        }
    }

    #[inline]
    pub fn half_size(&self) -> Vec2 {
        self.size / 2.0
    }

    /// Collision radius derived from the larger sprite dimension
    #[inline]
    pub fn hit_radius(&self, factor: f32) -> f32 {
        self.size.max_element() * factor
    }

    /// Where bullets leave the ship
    #[inline]
    pub fn muzzle(&self) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - self.size.y * MUZZLE_OFFSET)
    }
}

/// A descending enemy
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub hp: u8,
    pub max_hp: u8,
    /// Sprite rotation (radians)
    pub angle: f32,
    /// Hit flash time remaining (ms)
    pub hit_flash_ms: f32,
}

impl Enemy {
    /// Take one point of damage; returns true if this destroyed the enemy
    pub fn damage(&mut self, flash_ms: f32) -> bool {
        self.hp = self.hp.saturating_sub(1);
        self.hit_flash_ms = flash_ms;
        self.hp == 0
    }

    #[inline]
    pub fn is_destroyed(&self) -> bool {
        self.hp == 0
    }
}

/// A projectile fired by the ship
#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Session time at spawn (ms)
    pub born_ms: f64,
    pub lifetime_ms: f64,
}

impl Bullet {
    #[inline]
    pub fn is_expired(&self, now_ms: f64) -> bool {
        now_ms - self.born_ms > self.lifetime_ms
    }
}

/// Per-session knobs derived from player settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldOptions {
    pub ambient_streaks: usize,
    /// Spawn hit/explosion bursts
    pub bursts: bool,
}

impl WorldOptions {
    pub fn new(tuning: &Tuning, settings: &Settings) -> Self {
        Self {
            ambient_streaks: settings.ambient_streaks(tuning.ambient_streaks),
            bursts: settings.particles,
        }
    }
}

impl Default for WorldOptions {
    fn default() -> Self {
        Self {
            ambient_streaks: Tuning::default().ambient_streaks,
            bursts: true,
        }
    }
}

/// Complete state of one play-through
#[derive(Debug, Clone)]
pub struct World {
    pub tuning: Tuning,
    pub options: WorldOptions,
    pub viewport: Viewport,
    /// Scale factor captured at session start / last resize
    pub scale: f32,
    pub phase: SessionPhase,
    /// Session time; also the survival counter (ms)
    pub time_ms: f64,
    /// Present only while a session exists
    pub ship: Option<Ship>,
    pub enemies: Vec<Enemy>,
    pub bullets: Vec<Bullet>,
    /// Ambient streaks and fading bursts share one collection
    pub particles: Vec<Particle>,
    pub parallax: ParallaxState,
    pub spawn_timer_ms: f64,
    pub spawn_interval_ms: f64,
    /// Automatic spawns this session
    pub spawn_count: u32,
    pub last_shot_ms: Option<f64>,
    pub rng: Pcg32,
    next_id: u32,
}

impl World {
    /// Create an idle world (no ship, no enemies)
    pub fn new(tuning: Tuning, options: WorldOptions, viewport: Viewport, seed: u64) -> Self {
        let parallax = ParallaxState::new(&tuning);
        Self {
            spawn_interval_ms: tuning.spawn_interval_ms,
            tuning,
            options,
            scale: viewport.scale(),
            viewport,
            phase: SessionPhase::Idle,
            time_ms: 0.0,
            ship: None,
            enemies: Vec::new(),
            bullets: Vec::new(),
            particles: Vec::new(),
            parallax,
            spawn_timer_ms: 0.0,
            spawn_count: 0,
            last_shot_ms: None,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset all per-session state and enter `Running`.
    ///
    /// The parallax tile choice survives; only its offsets are rewound.
    pub fn reset(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scale = viewport.scale();
        self.ship = Some(Ship::spawn(&self.viewport, self.scale, &self.tuning));
        self.enemies.clear();
        self.bullets.clear();
        self.particles = particles::ambient_field(
            &mut self.rng,
            &self.viewport,
            self.scale,
            self.options.ambient_streaks,
        );
        self.parallax.reset_offsets();
        self.time_ms = 0.0;
        self.spawn_timer_ms = 0.0;
        self.spawn_interval_ms = self.tuning.spawn_interval_ms;
        self.spawn_count = 0;
        self.last_shot_ms = None;
        self.phase = SessionPhase::Running;

        for _ in 0..self.tuning.initial_enemies {
            self.spawn_enemy();
        }
    }

    /// Apply a new viewport size (debounced resize)
    pub fn resize(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.scale = viewport.scale();
    }

    /// Spawn one enemy just above the top edge
    pub fn spawn_enemy(&mut self) {
        let base = self.tuning.enemy_radius * self.scale;
        let hp = self
            .rng
            .random_range(self.tuning.enemy_min_hp..=self.tuning.enemy_max_hp);
        // Horizontal range uses the unjittered radius, so wide enemies may overhang
        let span = (self.viewport.width - base * 2.0).max(0.0);
        let x = self.rng.random::<f32>() * span + base;
        let radius = base + self.rng.random::<f32>() * base * self.tuning.enemy_radius_jitter;
        let id = self.next_entity_id();

        self.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, -base - ENEMY_SPAWN_LIFT),
            radius,
            hp,
            max_hp: hp,
            angle: 0.0,
            hit_flash_ms: 0.0,
        });
    }

    /// Fire a bullet straight up if the cooldown allows. Returns true on a shot.
    pub fn try_shoot(&mut self) -> bool {
        if self.phase != SessionPhase::Running {
            return false;
        }
        let Some(ship) = &self.ship else {
            return false;
        };
        if let Some(last) = self.last_shot_ms {
            if self.time_ms - last < self.tuning.shoot_cooldown_ms {
                return false;
            }
        }

        let bullet = Bullet {
            pos: ship.muzzle(),
            vel: Vec2::new(0.0, -self.tuning.bullet_speed),
            radius: self.tuning.bullet_radius * self.scale,
            born_ms: self.time_ms,
            lifetime_ms: self.tuning.bullet_lifetime_ms,
        };
        self.bullets.push(bullet);
        self.last_shot_ms = Some(self.time_ms);
        true
    }

    /// Whole seconds survived, as shown on the HUD
    pub fn survived_secs(&self) -> u64 {
        (self.time_ms / 1000.0).floor().max(0.0) as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running_world() -> World {
        let mut world = World::new(
            Tuning::default(),
            WorldOptions::default(),
            Viewport::new(900.0, 800.0),
            7,
        );
        world.reset(Viewport::new(900.0, 800.0));
        world
    }

    #[test]
    fn test_reset_seeds_session() {
        let world = running_world();
        assert_eq!(world.phase, SessionPhase::Running);
        assert_eq!(world.enemies.len(), 2);
        assert_eq!(world.particles.len(), 40);
        let ship = world.ship.as_ref().unwrap();
        assert_eq!(ship.pos, Vec2::new(450.0, 600.0));
        assert_eq!(ship.size, Vec2::new(120.0, 160.0));
    }

    #[test]
    fn test_spawned_enemy_ranges() {
        let mut world = running_world();
        for _ in 0..200 {
            world.spawn_enemy();
        }
        for enemy in &world.enemies {
            assert!((3..=5).contains(&enemy.hp));
            assert_eq!(enemy.hp, enemy.max_hp);
            assert!(enemy.radius >= 48.0 && enemy.radius <= 48.0 * 1.6);
            assert!(enemy.pos.x >= 48.0 && enemy.pos.x <= 900.0 - 48.0);
            assert_eq!(enemy.pos.y, -58.0);
            assert_eq!(enemy.angle, 0.0);
        }
    }

    #[test]
    fn test_shoot_cooldown() {
        let mut world = running_world();
        assert!(world.try_shoot());
        world.time_ms += 179.0;
        assert!(!world.try_shoot());
        assert_eq!(world.bullets.len(), 1);
        world.time_ms += 1.0;
        assert!(world.try_shoot());
        assert_eq!(world.bullets.len(), 2);
    }

    #[test]
    fn test_no_shooting_outside_running() {
        let mut world = running_world();
        world.phase = SessionPhase::Ended;
        assert!(!world.try_shoot());
        assert!(world.bullets.is_empty());
    }

    #[test]
    fn test_enemy_damage_saturates() {
        let mut world = running_world();
        let enemy = &mut world.enemies[0];
        enemy.hp = 1;
        assert!(enemy.damage(160.0));
        assert!(enemy.damage(160.0));
        assert_eq!(enemy.hp, 0);
        assert_eq!(enemy.hit_flash_ms, 160.0);
    }
}
