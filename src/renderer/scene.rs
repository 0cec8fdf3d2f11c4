//! Display list generation
//!
//! Turns a [`World`] into a flat list of [`DrawCmd`]s in painter's order.
//! Asset fallbacks are decided here, so the backend only replays commands.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

use crate::consts::PARALLAX_LAYERS;
use crate::sim::{Enemy, ParticleKind, TileChoice, World};

/// Straight-alpha sRGB color
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// CSS `rgba()` string for the Canvas2D API
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.a.clamp(0.0, 1.0))
    }
}

/// Colors for game elements
pub mod colors {
    use super::Color;

    pub const GRADIENT_TOP: Color = Color::rgba(0x00, 0x12, 0x17, 1.0);
    pub const GRADIENT_MID: Color = Color::rgba(0x0b, 0x1a, 0x2b, 1.0);
    pub const GRADIENT_BOTTOM: Color = Color::rgba(0x07, 0x10, 0x18, 1.0);
    pub const STREAK: Color = Color::rgba(255, 255, 255, 1.0);
    pub const SHIP_FALLBACK: Color = Color::rgba(0, 255, 255, 1.0);
    pub const ENEMY_FALLBACK: Color = Color::rgba(0xf3, 0x9c, 0x12, 1.0);
    pub const ENEMY_OUTLINE: Color = Color::rgba(0, 0, 0, 0.25);
    pub const SHADOW: Color = Color::rgba(0, 0, 0, 0.18);
    pub const RING_EMPTY: Color = Color::rgba(0, 0, 0, 0.35);
    pub const RING_FILLED: Color = Color::rgba(0, 255, 106, 0.95);
    pub const HIT_FLASH: Color = Color::rgba(0, 255, 106, 0.06);
    pub const BULLET: Color = Color::rgba(0, 255, 208, 1.0);
    pub const BULLET_GLOW: Color = Color::rgba(0, 255, 208, 0.95);
}

/// Images the backend may hold
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageId {
    Ship,
    Enemy,
    Tile,
}

/// Which optional sprites finished loading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SpriteAvailability {
    pub ship: bool,
    pub enemy: bool,
}

/// Compositing mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Blend {
    #[default]
    Normal,
    /// Additive ("lighter")
    Additive,
}

/// One drawing primitive in CSS pixel space
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Wipe the whole surface
    Clear { size: Vec2 },
    /// Full-surface vertical gradient
    VerticalGradient { size: Vec2, stops: [(f32, Color); 3] },
    /// Image centered at `center`, rotated by `rotation`
    Image {
        image: ImageId,
        center: Vec2,
        size: Vec2,
        rotation: f32,
    },
    /// Image at a top-left corner, no rotation (background tiles)
    Tile { image: ImageId, origin: Vec2, size: Vec2 },
    Ellipse {
        center: Vec2,
        radii: Vec2,
        fill: Color,
        outline: Option<(Color, f32)>,
        blend: Blend,
    },
    /// Disc filled with a radial gradient from `inner` to `outer` radius
    RadialGlow {
        center: Vec2,
        inner: f32,
        outer: f32,
        stops: Vec<(f32, Color)>,
    },
    /// Stroked arc with round caps
    Arc {
        center: Vec2,
        radius: f32,
        start: f32,
        end: f32,
        width: f32,
        color: Color,
    },
    Line {
        from: Vec2,
        to: Vec2,
        width: f32,
        color: Color,
    },
}

/// Angular gap between HP ring segments (radians)
const RING_GAP: f32 = PI * 0.04;

/// Build the display list for one frame
pub fn build(world: &World, sprites: &SpriteAvailability) -> Vec<DrawCmd> {
    let size = Vec2::new(world.viewport.width, world.viewport.height);
    let scale = world.scale;
    let mut cmds = Vec::with_capacity(64 + world.particles.len() + world.enemies.len() * 12);

    cmds.push(DrawCmd::Clear { size });
    background(world, size, &mut cmds);

    let streak_width = (1.2 * scale).max(1.0);
    for p in world.particles.iter().filter(|p| p.is_ambient()) {
        cmds.push(streak(p.pos, p.len, p.alpha, streak_width));
    }

    for enemy in &world.enemies {
        enemy_cmds(enemy, sprites.enemy, scale, world.tuning.hit_flash_ms, &mut cmds);
    }

    if let Some(ship) = &world.ship {
        if sprites.ship {
            cmds.push(DrawCmd::Image {
                image: ImageId::Ship,
                center: ship.pos,
                size: ship.size,
                rotation: 0.0,
            });
        } else {
            cmds.push(DrawCmd::Ellipse {
                center: ship.pos,
                radii: ship.half_size(),
                fill: colors::SHIP_FALLBACK,
                outline: None,
                blend: Blend::Normal,
            });
        }
    }

    for bullet in &world.bullets {
        cmds.push(DrawCmd::RadialGlow {
            center: bullet.pos,
            inner: 0.0,
            outer: bullet.radius * 3.0,
            stops: vec![
                (0.0, colors::BULLET_GLOW),
                (0.2, colors::BULLET_GLOW.with_alpha(0.6)),
                (1.0, colors::BULLET_GLOW.with_alpha(0.0)),
            ],
        });
        cmds.push(DrawCmd::Ellipse {
            center: bullet.pos,
            radii: Vec2::splat(bullet.radius),
            fill: colors::BULLET,
            outline: None,
            blend: Blend::Normal,
        });
    }

    for p in &world.particles {
        if let ParticleKind::Fading { .. } = p.kind {
            cmds.push(streak(p.pos, p.len, p.alpha, streak_width));
        }
    }

    cmds
}

fn streak(pos: Vec2, len: f32, alpha: f32, width: f32) -> DrawCmd {
    DrawCmd::Line {
        from: pos,
        to: pos + Vec2::new(0.0, len),
        width,
        color: colors::STREAK.with_alpha(alpha),
    }
}

fn background(world: &World, size: Vec2, cmds: &mut Vec<DrawCmd>) {
    let parallax = &world.parallax;
    if parallax.tile == TileChoice::Gradient {
        cmds.push(DrawCmd::VerticalGradient {
            size,
            stops: [
                (0.0, colors::GRADIENT_TOP),
                (0.5, colors::GRADIENT_MID),
                (1.0, colors::GRADIENT_BOTTOM),
            ],
        });
        return;
    }

    for layer in 0..PARALLAX_LAYERS {
        for origin in parallax.layer_tiles(layer, size.x, size.y, world.scale) {
            cmds.push(DrawCmd::Tile {
                image: ImageId::Tile,
                origin,
                size: parallax.tile_size,
            });
        }
    }
}

/// Shadow, body, segmented HP ring and hit flash for one enemy
fn enemy_cmds(enemy: &Enemy, sprite: bool, scale: f32, flash_ms: f32, cmds: &mut Vec<DrawCmd>) {
    let shadow_radius = enemy.radius * 1.25;
    cmds.push(DrawCmd::RadialGlow {
        center: enemy.pos,
        inner: enemy.radius * 0.2,
        outer: shadow_radius * 1.05,
        stops: vec![(0.0, colors::SHADOW), (1.0, colors::SHADOW.with_alpha(0.0))],
    });

    if sprite {
        cmds.push(DrawCmd::Image {
            image: ImageId::Enemy,
            center: enemy.pos,
            size: Vec2::splat(enemy.radius * 2.0),
            rotation: enemy.angle,
        });
    } else {
        cmds.push(DrawCmd::Ellipse {
            center: enemy.pos,
            radii: Vec2::splat(enemy.radius),
            fill: colors::ENEMY_FALLBACK,
            outline: Some((colors::ENEMY_OUTLINE, scale.max(1.0))),
            blend: Blend::Normal,
        });
    }

    hp_ring(enemy, cmds);

    if enemy.hit_flash_ms > 0.0 && flash_ms > 0.0 {
        let strength = (enemy.hit_flash_ms / flash_ms).clamp(0.0, 1.0);
        cmds.push(DrawCmd::Ellipse {
            center: enemy.pos,
            radii: Vec2::splat(enemy.radius * 1.6),
            fill: colors::HIT_FLASH.with_alpha(colors::HIT_FLASH.a * strength),
            outline: None,
            blend: Blend::Additive,
        });
    }
}

/// One arc per max hit point; the first `hp` are drawn filled over the track
fn hp_ring(enemy: &Enemy, cmds: &mut Vec<DrawCmd>) {
    let segments = enemy.max_hp.max(1);
    let filled = enemy.hp.min(segments);
    let radius = enemy.radius * 1.45;
    let width = (enemy.radius * 0.14).max(3.0);

    for i in 0..segments {
        let start = (i as f32 / segments as f32) * TAU + RING_GAP / 2.0;
        let end = ((i + 1) as f32 / segments as f32) * TAU - RING_GAP / 2.0;
        cmds.push(DrawCmd::Arc {
            center: enemy.pos,
            radius,
            start,
            end,
            width,
            color: colors::RING_EMPTY,
        });
        if i < filled {
            cmds.push(DrawCmd::Arc {
                center: enemy.pos,
                radius,
                start,
                end,
                width: (width - 1.0).max(1.0),
                color: colors::RING_FILLED,
            });
        }
    }
}
