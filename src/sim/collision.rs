//! Collision detection and area-of-effect sweeps
//!
//! Everything is AABB overlap between entity lists. Scans are first-match-wins
//! so a single bullet can only ever resolve against one target; explosive
//! sweeps layer point-in-radius tests on top of that.

use glam::Vec2;

use super::rect::Rect;
use super::state::{Barrier, Enemy, EnemyKind};

/// Strict point-in-circle test
#[inline]
pub fn point_in_radius(point: Vec2, center: Vec2, radius: f32) -> bool {
    point.distance(center) < radius
}

/// Index of the first alive enemy overlapping `rect`
pub fn first_enemy_hit(rect: &Rect, enemies: &[Enemy]) -> Option<usize> {
    enemies.iter().position(|e| e.alive && e.rect.overlaps(rect))
}

/// (barrier, block) indices of the first alive block overlapping `rect`
pub fn first_block_hit(rect: &Rect, barriers: &[Barrier]) -> Option<(usize, usize)> {
    for (b_idx, barrier) in barriers.iter().enumerate() {
        // Cheap reject against the whole barrier first
        if !barrier.bounds.overlaps(rect) {
            continue;
        }
        if let Some(k) = barrier
            .blocks
            .iter()
            .position(|blk| blk.alive && blk.rect.overlaps(rect))
        {
            return Some((b_idx, k));
        }
    }
    None
}

/// What an explosion took out
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Sweep {
    /// Kind and center of every enemy destroyed
    pub enemies: Vec<(EnemyKind, Vec2)>,
    /// Number of barrier blocks destroyed
    pub blocks: usize,
}

impl Sweep {
    /// Score value of the destroyed enemies
    pub fn points(&self) -> u64 {
        self.enemies.iter().map(|(kind, _)| kind.points()).sum()
    }
}

/// Destroy every alive block whose center lies within `radius` of `center`
pub fn blast_blocks(center: Vec2, radius: f32, barriers: &mut [Barrier]) -> usize {
    let mut destroyed = 0;
    for barrier in barriers.iter_mut() {
        for block in barrier.blocks.iter_mut().filter(|b| b.alive) {
            if point_in_radius(block.rect.center(), center, radius) {
                block.alive = false;
                destroyed += 1;
            }
        }
    }
    destroyed
}

/// Explosive sweep: destroy every alive enemy and block centered within `radius`
pub fn explosion_sweep(
    center: Vec2,
    radius: f32,
    enemies: &mut [Enemy],
    barriers: &mut [Barrier],
) -> Sweep {
    let mut sweep = Sweep::default();
    for enemy in enemies.iter_mut().filter(|e| e.alive) {
        let c = enemy.rect.center();
        if point_in_radius(c, center, radius) {
            enemy.alive = false;
            sweep.enemies.push((enemy.kind, c));
        }
    }
    sweep.blocks = blast_blocks(center, radius, barriers);
    sweep
}

/// Reflect velocity off a surface with given normal
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::Block;

    /// Enemy whose center sits exactly on `c`
    fn enemy_at(c: Vec2) -> Enemy {
        Enemy::new(
            c.x - ENEMY_WIDTH / 2.0,
            c.y - ENEMY_HEIGHT / 2.0,
            EnemyKind::Crab,
        )
    }

    fn block_at(c: Vec2) -> Block {
        Block {
            rect: Rect::new(c.x - 3.0, c.y - 3.0, 6.0, 6.0),
            alive: true,
        }
    }

    #[test]
    fn test_explosion_radius_boundary() {
        let impact = Vec2::new(100.0, 100.0);
        let mut enemies = vec![
            enemy_at(Vec2::new(115.0, 110.0)), // ~18.0 away
            enemy_at(Vec2::new(140.0, 100.0)), // 40 away
        ];
        let sweep = explosion_sweep(impact, 30.0, &mut enemies, &mut []);

        assert!(!enemies[0].alive);
        assert!(enemies[1].alive);
        assert_eq!(sweep.enemies.len(), 1);
        assert_eq!(sweep.points(), EnemyKind::Crab.points());
    }

    #[test]
    fn test_explosion_skips_dead_and_counts_blocks() {
        let impact = Vec2::new(200.0, 200.0);
        let mut enemies = vec![enemy_at(Vec2::new(205.0, 200.0))];
        enemies[0].alive = false;
        let mut barriers = vec![Barrier::new(vec![
            block_at(Vec2::new(210.0, 200.0)),
            block_at(Vec2::new(260.0, 200.0)),
        ])];

        let sweep = explosion_sweep(impact, 30.0, &mut enemies, &mut barriers);
        assert!(sweep.enemies.is_empty());
        assert_eq!(sweep.blocks, 1);
        assert!(!barriers[0].blocks[0].alive);
        assert!(barriers[0].blocks[1].alive);
    }

    #[test]
    fn test_first_enemy_hit_is_first_match() {
        // Two overlapping enemies under the same bullet
        let enemies = vec![
            enemy_at(Vec2::new(100.0, 100.0)),
            enemy_at(Vec2::new(105.0, 100.0)),
        ];
        let bullet = Rect::new(101.0, 95.0, 4.0, 12.0);
        assert_eq!(first_enemy_hit(&bullet, &enemies), Some(0));
    }

    #[test]
    fn test_first_enemy_hit_ignores_dead() {
        let mut enemies = vec![
            enemy_at(Vec2::new(100.0, 100.0)),
            enemy_at(Vec2::new(105.0, 100.0)),
        ];
        enemies[0].alive = false;
        let bullet = Rect::new(101.0, 95.0, 4.0, 12.0);
        assert_eq!(first_enemy_hit(&bullet, &enemies), Some(1));
    }

    #[test]
    fn test_first_block_hit() {
        let barriers = vec![
            Barrier::new(vec![block_at(Vec2::new(50.0, 50.0))]),
            Barrier::new(vec![block_at(Vec2::new(300.0, 50.0)), block_at(Vec2::new(306.0, 50.0))]),
        ];
        let probe = Rect::new(301.0, 45.0, 4.0, 10.0);
        assert_eq!(first_block_hit(&probe, &barriers), Some((1, 0)));
        let miss = Rect::new(150.0, 45.0, 4.0, 10.0);
        assert_eq!(first_block_hit(&miss, &barriers), None);
    }

    #[test]
    fn test_reflect_velocity() {
        // Moving right, hits a wall whose normal points left
        let reflected = reflect_velocity(Vec2::new(2.0, 3.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x + 2.0).abs() < 0.001);
        assert!((reflected.y - 3.0).abs() < 0.001);
    }
}
