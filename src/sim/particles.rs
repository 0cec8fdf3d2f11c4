//! Particle field: ambient streaks and fading bursts
//!
//! Speeds are expressed per 16 ms reference frame and scaled by dt, so the
//! field looks the same at any refresh rate.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::viewport::Viewport;
use crate::consts::PARTICLE_FRAME_MS;

/// Lifecycle of a particle
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParticleKind {
    /// Background streak; wraps to the top, never removed
    Ambient,
    /// Impact/explosion fragment; removed once fully faded
    Fading { born_ms: f64, life_ms: f64 },
}

/// A vertical streak
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    pub pos: Vec2,
    /// Streak length (px)
    pub len: f32,
    /// Fall speed (px per reference frame)
    pub speed: f32,
    pub alpha: f32,
    pub kind: ParticleKind,
}

impl Particle {
    #[inline]
    pub fn is_ambient(&self) -> bool {
        matches!(self.kind, ParticleKind::Ambient)
    }
}

/// Scatter `count` ambient streaks over the viewport
pub fn ambient_field(rng: &mut Pcg32, viewport: &Viewport, scale: f32, count: usize) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            pos: Vec2::new(
                rng.random::<f32>() * viewport.width,
                rng.random::<f32>() * viewport.height,
            ),
            len: (rng.random::<f32>() * 20.0 + 10.0) * scale,
            speed: (rng.random::<f32>() * 1.5 + 0.5) * scale,
            alpha: rng.random::<f32>() * 0.5 + 0.2,
            kind: ParticleKind::Ambient,
        })
        .collect()
}

/// Small spray at a bullet impact point
pub fn hit_burst(rng: &mut Pcg32, at: Vec2, count: usize, now_ms: f64) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            pos: at + Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * 8.0,
            len: rng.random::<f32>() * 8.0 + 6.0,
            speed: rng.random::<f32>() * 2.0 + 1.0,
            alpha: 1.0,
            kind: ParticleKind::Fading {
                born_ms: now_ms,
                life_ms: 300.0 + rng.random::<f64>() * 200.0,
            },
        })
        .collect()
}

/// Larger burst where an enemy was destroyed
pub fn explosion(rng: &mut Pcg32, at: Vec2, radius: f32, count: usize, now_ms: f64) -> Vec<Particle> {
    (0..count)
        .map(|_| Particle {
            pos: at,
            len: rng.random::<f32>() * radius * 0.6 + 6.0,
            speed: rng.random::<f32>() * 3.0 + 1.0,
            alpha: 1.0,
            kind: ParticleKind::Fading {
                born_ms: now_ms,
                life_ms: 500.0 + rng.random::<f64>() * 400.0,
            },
        })
        .collect()
}

/// Move ambient streaks down; wrap to the top with a fresh x once off-screen
pub fn advance_ambient(particles: &mut [Particle], rng: &mut Pcg32, viewport: &Viewport, dt_ms: f64) {
    let step = dt_ms as f32 / PARTICLE_FRAME_MS;
    for p in particles.iter_mut().filter(|p| p.is_ambient()) {
        p.pos.y += p.speed * step;
        if p.pos.y > viewport.height + p.len {
            p.pos.y = -p.len;
            p.pos.x = rng.random::<f32>() * viewport.width;
        }
    }
}

/// Fade and move bursts; drop the ones that have fully faded
pub fn advance_fading(particles: &mut Vec<Particle>, now_ms: f64, dt_ms: f64) {
    let step = dt_ms as f32 / PARTICLE_FRAME_MS;
    particles.retain_mut(|p| {
        let ParticleKind::Fading { born_ms, life_ms } = p.kind else {
            return true;
        };
        let t = ((now_ms - born_ms) / life_ms).min(1.0);
        if t >= 1.0 {
            return false;
        }
        p.alpha = (1.0 - t).max(0.0) as f32;
        p.pos.y += p.speed * step;
        true
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(42)
    }

    #[test]
    fn test_ambient_wraps_to_top() {
        let mut rng = rng();
        let vp = Viewport::new(900.0, 800.0);
        let mut field = vec![Particle {
            pos: Vec2::new(100.0, 815.0),
            len: 20.0,
            speed: 10.0,
            alpha: 0.5,
            kind: ParticleKind::Ambient,
        }];
        advance_ambient(&mut field, &mut rng, &vp, 16.0);
        assert_eq!(field.len(), 1);
        assert_eq!(field[0].pos.y, -20.0);
        assert!(field[0].pos.x >= 0.0 && field[0].pos.x <= 900.0);
    }

    #[test]
    fn test_fading_lifecycle() {
        let mut rng = rng();
        let mut field = ambient_field(&mut rng, &Viewport::new(900.0, 800.0), 1.0, 3);
        field.extend(hit_burst(&mut rng, Vec2::new(100.0, 100.0), 6, 0.0));
        assert_eq!(field.len(), 9);

        advance_fading(&mut field, 150.0, 16.0);
        assert_eq!(field.len(), 9);
        for p in field.iter().filter(|p| !p.is_ambient()) {
            assert!(p.alpha > 0.0 && p.alpha < 1.0);
        }

        // Hit bursts live at most 500 ms; ambient streaks are untouched
        advance_fading(&mut field, 500.0, 16.0);
        assert_eq!(field.len(), 3);
        assert!(field.iter().all(Particle::is_ambient));
    }

    #[test]
    fn test_explosion_is_centered() {
        let mut rng = rng();
        let burst = explosion(&mut rng, Vec2::new(10.0, 20.0), 40.0, 18, 5.0);
        assert_eq!(burst.len(), 18);
        assert!(burst.iter().all(|p| p.pos == Vec2::new(10.0, 20.0)));
        assert!(burst.iter().all(|p| p.len >= 6.0 && p.len <= 30.0));
    }
}
