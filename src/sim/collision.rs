//! Circle-vs-circle collision resolution
//!
//! Bullet hits are resolved with a mark-and-compact pass: the scan only marks
//! spent bullets and destroyed enemies, then both collections are compacted
//! once at the end.

use glam::Vec2;

use super::state::{Bullet, Enemy, Ship};
use crate::circles_touch;

/// A destroyed enemy
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kill {
    pub pos: Vec2,
    pub radius: f32,
}

/// Outcome of one bullet-vs-enemy pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitReport {
    /// Bullet positions at the moment of impact
    pub impacts: Vec<Vec2>,
    pub kills: Vec<Kill>,
}

/// Resolve every bullet against every enemy.
///
/// Scans bullets newest-first and, for each, enemies newest-first. A bullet
/// hits at most one enemy and is consumed; an enemy reduced to zero hit points
/// is out of play for the rest of the pass.
pub fn resolve_bullet_hits(
    bullets: &mut Vec<Bullet>,
    enemies: &mut Vec<Enemy>,
    enemy_hit_factor: f32,
    flash_ms: f32,
) -> HitReport {
    let mut report = HitReport::default();
    if bullets.is_empty() || enemies.is_empty() {
        return report;
    }

    let mut spent = vec![false; bullets.len()];
    for (bi, bullet) in bullets.iter().enumerate().rev() {
        let target = enemies.iter_mut().rev().find(|enemy| {
            !enemy.is_destroyed()
                && circles_touch(
                    bullet.pos,
                    bullet.radius,
                    enemy.pos,
                    enemy.radius * enemy_hit_factor,
                )
        });
        let Some(enemy) = target else {
            continue;
        };

        spent[bi] = true;
        report.impacts.push(bullet.pos);
        if enemy.damage(flash_ms) {
            report.kills.push(Kill {
                pos: enemy.pos,
                radius: enemy.radius,
            });
        }
    }

    let mut flags = spent.into_iter();
    bullets.retain(|_| !flags.next().unwrap_or(false));
    enemies.retain(|enemy| !enemy.is_destroyed());
    report
}

/// Index of the first enemy overlapping the ship, if any (strict overlap)
pub fn ship_collision(
    ship: &Ship,
    enemies: &[Enemy],
    ship_hit_factor: f32,
    enemy_hit_factor: f32,
) -> Option<usize> {
    let ship_r = ship.hit_radius(ship_hit_factor);
    enemies.iter().position(|enemy| {
        let r = ship_r + enemy.radius * enemy_hit_factor;
        ship.pos.distance_squared(enemy.pos) < r * r
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn enemy(id: u32, x: f32, y: f32, r: f32, hp: u8) -> Enemy {
        Enemy {
            id,
            pos: Vec2::new(x, y),
            radius: r,
            hp,
            max_hp: hp,
            angle: 0.0,
            hit_flash_ms: 0.0,
        }
    }

    fn bullet(x: f32, y: f32) -> Bullet {
        Bullet {
            pos: Vec2::new(x, y),
            vel: Vec2::new(0.0, -900.0),
            radius: 6.0,
            born_ms: 0.0,
            lifetime_ms: 2000.0,
        }
    }

    #[test]
    fn test_direct_hit() {
        let mut enemies = vec![enemy(1, 100.0, 100.0, 40.0, 3)];
        let mut bullets = vec![bullet(100.0, 100.0)];
        let report = resolve_bullet_hits(&mut bullets, &mut enemies, 0.72, 160.0);

        assert!(bullets.is_empty());
        assert_eq!(enemies[0].hp, 2);
        assert_eq!(enemies[0].hit_flash_ms, 160.0);
        assert_eq!(report.impacts, vec![Vec2::new(100.0, 100.0)]);
        assert!(report.kills.is_empty());
    }

    #[test]
    fn test_shrunk_enemy_radius() {
        // 6 + 40 * 0.72 = 34.8: a bullet at distance 35 misses
        let mut enemies = vec![enemy(1, 0.0, 0.0, 40.0, 3)];
        let mut bullets = vec![bullet(35.0, 0.0), bullet(0.0, 34.0)];
        let report = resolve_bullet_hits(&mut bullets, &mut enemies, 0.72, 160.0);
        assert_eq!(report.impacts.len(), 1);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos.x, 35.0);
    }

    #[test]
    fn test_one_bullet_hits_one_enemy() {
        // Two overlapping enemies; the newest (last) takes the hit
        let mut enemies = vec![enemy(1, 0.0, 0.0, 40.0, 3), enemy(2, 5.0, 0.0, 40.0, 3)];
        let mut bullets = vec![bullet(2.0, 0.0)];
        resolve_bullet_hits(&mut bullets, &mut enemies, 0.72, 160.0);
        assert_eq!(enemies[0].hp, 3);
        assert_eq!(enemies[1].hp, 2);
    }

    #[test]
    fn test_kill_removes_enemy_and_spares_later_bullets() {
        let mut enemies = vec![enemy(1, 0.0, 0.0, 40.0, 1)];
        let mut bullets = vec![bullet(0.0, 0.0), bullet(1.0, 0.0)];
        let report = resolve_bullet_hits(&mut bullets, &mut enemies, 0.72, 160.0);

        assert!(enemies.is_empty());
        assert_eq!(report.kills, vec![Kill { pos: Vec2::ZERO, radius: 40.0 }]);
        // The newest bullet killed it; the older one had nothing left to hit
        assert_eq!(report.impacts, vec![Vec2::new(1.0, 0.0)]);
        assert_eq!(bullets.len(), 1);
        assert_eq!(bullets[0].pos, Vec2::ZERO);
    }

    #[test]
    fn test_spent_bullet_hits_once_per_pass() {
        let mut enemies = vec![enemy(1, 0.0, 0.0, 40.0, 5)];
        let mut bullets = vec![bullet(0.0, 0.0), bullet(0.0, 0.0), bullet(0.0, 0.0)];
        let report = resolve_bullet_hits(&mut bullets, &mut enemies, 0.72, 160.0);
        assert_eq!(report.impacts.len(), 3);
        assert_eq!(enemies[0].hp, 2);
        assert!(bullets.is_empty());

        // Nothing left to collide on a second pass
        let again = resolve_bullet_hits(&mut bullets, &mut enemies, 0.72, 160.0);
        assert_eq!(again, HitReport::default());
        assert_eq!(enemies[0].hp, 2);
    }

    #[test]
    fn test_ship_collision() {
        let ship = Ship {
            pos: Vec2::new(450.0, 700.0),
            size: Vec2::new(120.0, 160.0),
        };
        let far = enemy(1, 450.0, 400.0, 48.0, 3);
        let near = enemy(2, 450.0, 700.0, 48.0, 3);
        assert_eq!(ship_collision(&ship, &[far.clone()], 0.34, 0.72), None);
        assert_eq!(ship_collision(&ship, &[far, near], 0.34, 0.72), Some(1));
    }
}
