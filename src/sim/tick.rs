//! Per-frame simulation step
//!
//! A frame is split in two halves so the renderer can run between them:
//! [`advance`] moves the purely visual/ballistic state (parallax, particles,
//! enemy spin, bullets) and [`update`] runs input, spawning, enemy motion and
//! collisions. [`tick`] runs both back to back.

use glam::Vec2;
use rand::Rng;

use super::collision::{resolve_bullet_hits, ship_collision};
use super::particles;
use super::state::{Enemy, SessionPhase, World};
use super::viewport::Viewport;
use crate::consts::ENEMY_CULL_MARGIN;

/// Input commands for a single frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Held movement keys as a direction (-1, 0 or 1 per axis)
    pub movement: Vec2,
    /// Any movement key is held, even when opposing keys cancel out
    pub keys_held: bool,
    /// Pointer/touch drag since the last frame (px)
    pub pointer_delta: Vec2,
    /// Pointer or touch is held down
    pub pointer_active: bool,
    /// Discrete fire request (click, tap, space)
    pub fire: bool,
}

impl TickInput {
    /// Whether any movement key is held
    #[inline]
    pub fn moving(&self) -> bool {
        self.keys_held || self.movement != Vec2::ZERO
    }
}

/// What happened during one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameEvents {
    pub shots: u32,
    pub hits: u32,
    pub kills: u32,
    pub spawned: u32,
    /// The ship collided with an enemy; the session is now `Ended`
    pub ship_destroyed: bool,
}

/// Advance visuals and ballistics by `dt_ms`. No-op unless running.
pub fn advance(world: &mut World, dt_ms: f64) {
    if world.phase != SessionPhase::Running {
        return;
    }
    world.time_ms += dt_ms;

    world.parallax.advance(dt_ms);
    particles::advance_ambient(&mut world.particles, &mut world.rng, &world.viewport, dt_ms);
    spin_enemies(world, dt_ms);
    advance_bullets(world, dt_ms);
    particles::advance_fading(&mut world.particles, world.time_ms, dt_ms);
}

/// Run game logic for one frame. No-op unless running.
pub fn update(world: &mut World, input: &TickInput, dt_ms: f64) -> FrameEvents {
    let mut events = FrameEvents::default();
    if world.phase != SessionPhase::Running {
        return events;
    }

    move_ship(world, input, dt_ms);

    // Held pointer or movement keys mean continuous fire
    if (input.fire || input.pointer_active || input.moving()) && world.try_shoot() {
        events.shots += 1;
    }

    world.spawn_timer_ms += dt_ms;
    if world.spawn_timer_ms >= world.spawn_interval_ms {
        world.spawn_timer_ms = 0.0;
        world.spawn_enemy();
        world.spawn_count += 1;
        world.spawn_interval_ms = (world.spawn_interval_ms * world.tuning.spawn_interval_decay)
            .max(world.tuning.spawn_interval_min_ms);
        events.spawned += 1;
    }

    move_enemies(
        &mut world.enemies,
        &world.viewport,
        world.tuning.enemy_speed * world.scale,
        world.scale,
        dt_ms,
    );

    let report = resolve_bullet_hits(
        &mut world.bullets,
        &mut world.enemies,
        world.tuning.enemy_hit_factor,
        world.tuning.hit_flash_ms,
    );
    events.hits = report.impacts.len() as u32;
    events.kills = report.kills.len() as u32;
    if world.options.bursts {
        let now = world.time_ms;
        for at in report.impacts {
            let burst = particles::hit_burst(&mut world.rng, at, world.tuning.hit_burst, now);
            world.particles.extend(burst);
        }
        for kill in report.kills {
            let burst = particles::explosion(
                &mut world.rng,
                kill.pos,
                kill.radius,
                world.tuning.explosion_burst,
                now,
            );
            world.particles.extend(burst);
        }
    }

    if let Some(ship) = &world.ship {
        let hit = ship_collision(
            ship,
            &world.enemies,
            world.tuning.ship_hit_factor,
            world.tuning.enemy_hit_factor,
        );
        if let Some(index) = hit {
            log::info!(
                "Ship destroyed by enemy {} after {}s",
                world.enemies[index].id,
                world.survived_secs()
            );
            world.phase = SessionPhase::Ended;
            events.ship_destroyed = true;
        }
    }

    events
}

/// Advance the world by one full frame
pub fn tick(world: &mut World, input: &TickInput, dt_ms: f64) -> FrameEvents {
    advance(world, dt_ms);
    update(world, input, dt_ms)
}

/// Fall, wobble and cull enemies.
///
/// The wobble is keyed on list position, so neighbours drift on distinct
/// paths without storing per-enemy state.
pub fn move_enemies(enemies: &mut Vec<Enemy>, viewport: &Viewport, speed: f32, scale: f32, dt_ms: f64) {
    let fall = speed * (dt_ms / 1000.0) as f32;
    for (i, enemy) in enemies.iter_mut().enumerate() {
        enemy.pos.y += fall;
        enemy.pos.x += ((enemy.pos.y + i as f32) * 0.01).sin() * 0.6 * scale;
    }
    enemies.retain(|enemy| enemy.pos.y <= viewport.height + enemy.radius + ENEMY_CULL_MARGIN);
}

fn move_ship(world: &mut World, input: &TickInput, dt_ms: f64) {
    let Some(ship) = world.ship.as_mut() else {
        return;
    };
    let step = world.tuning.ship_speed * world.scale * (dt_ms / 1000.0) as f32;
    ship.pos += input.movement * step + input.pointer_delta;
    ship.pos = world.viewport.clamp_box(ship.pos, ship.half_size());
}

fn spin_enemies(world: &mut World, dt_ms: f64) {
    for enemy in &mut world.enemies {
        enemy.angle += 0.02 + world.rng.random::<f32>() * 0.02;
        if enemy.hit_flash_ms > 0.0 {
            enemy.hit_flash_ms = (enemy.hit_flash_ms - dt_ms as f32).max(0.0);
        }
    }
}

fn advance_bullets(world: &mut World, dt_ms: f64) {
    let secs = (dt_ms / 1000.0) as f32;
    let now = world.time_ms;
    let margin = world.tuning.offscreen_margin;
    let viewport = world.viewport;
    world.bullets.retain_mut(|bullet| {
        bullet.pos += bullet.vel * secs;
        !bullet.is_expired(now) && viewport.contains_with_margin(bullet.pos, margin)
    });
}
