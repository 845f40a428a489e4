//! Level construction and per-tick spawning
//!
//! Difficulty scales with the level counter through `Tuning`; spawning uses
//! the state's seeded RNG so a run is reproducible from its seed.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;

use super::rect::Rect;
use super::state::{
    Barrier, Block, Bullet, Enemy, EnemyKind, FallingKind, FallingObject, GameState,
};
use crate::consts::*;

/// Barrier shape, one char per block ('#' = block, anything else = gap)
pub const BARRIER_PATTERN: [&str; 8] = [
    "    ########    ",
    "  ############  ",
    " ############## ",
    "################",
    "################",
    "################",
    "#####      #####",
    "####        ####",
];

/// Declared width of `BARRIER_PATTERN` in blocks
pub const BARRIER_COLUMNS: usize = 16;

/// Build the blocks of one barrier from an ASCII pattern.
///
/// If any row's length disagrees with `declared_cols`, the pattern is
/// rejected and a solid `declared_cols` x `rows` rectangle is used instead.
pub fn barrier_from_pattern(origin: Vec2, pattern: &[&str], declared_cols: usize) -> Barrier {
    let valid = pattern.iter().all(|row| row.chars().count() == declared_cols);
    if !valid {
        log::warn!(
            "Barrier pattern width does not match {} columns, using solid layout",
            declared_cols
        );
    }

    let mut blocks = Vec::new();
    for (row, line) in pattern.iter().enumerate() {
        for col in 0..declared_cols {
            let filled = !valid || line.chars().nth(col) == Some('#');
            if filled {
                blocks.push(Block {
                    rect: Rect::new(
                        origin.x + col as f32 * BLOCK_SIZE,
                        origin.y + row as f32 * BLOCK_SIZE,
                        BLOCK_SIZE,
                        BLOCK_SIZE,
                    ),
                    alive: true,
                });
            }
        }
    }
    Barrier::new(blocks)
}

/// Evenly spaced barriers across the canvas
pub fn build_barriers() -> Vec<Barrier> {
    let width = BARRIER_COLUMNS as f32 * BLOCK_SIZE;
    let spacing = CANVAS_WIDTH / BARRIER_COUNT as f32;
    (0..BARRIER_COUNT)
        .map(|i| {
            let x = spacing * (i as f32 + 0.5) - width / 2.0;
            barrier_from_pattern(Vec2::new(x, BARRIER_Y), &BARRIER_PATTERN, BARRIER_COLUMNS)
        })
        .collect()
}

/// Enemy grid for a level, centered horizontally
pub fn build_enemy_grid(rows: u32, cols: u32) -> Vec<Enemy> {
    let grid_width = cols as f32 * ENEMY_WIDTH + (cols.saturating_sub(1)) as f32 * ENEMY_H_GAP;
    let start_x = (CANVAS_WIDTH - grid_width) / 2.0;

    let mut enemies = Vec::with_capacity((rows * cols) as usize);
    for row in 0..rows {
        let kind = EnemyKind::for_row(row);
        for col in 0..cols {
            enemies.push(Enemy::new(
                start_x + col as f32 * (ENEMY_WIDTH + ENEMY_H_GAP),
                ENEMY_TOP + row as f32 * (ENEMY_HEIGHT + ENEMY_V_GAP),
                kind,
            ));
        }
    }
    enemies
}

/// Reset the field for `state.level`: fresh grid, barriers, cannon; no projectiles
pub fn build_level(state: &mut GameState) {
    let level = state.level;
    let rows = state.tuning.rows_for_level(level);
    let cols = state.tuning.cols_for_level(level);

    state.enemies = build_enemy_grid(rows, cols);
    state.swarm_dir = 1.0;
    state.swarm_speed = state.tuning.enemy_speed_for_level(level);
    state.barriers = build_barriers();
    state.player.respawn();
    state.player_bullets.clear();
    state.enemy_bullets.clear();
    state.falling.clear();

    log::info!(
        "Level {}: {}x{} grid, swarm speed {:.2}",
        level,
        rows,
        cols,
        state.swarm_speed
    );
}

/// Pick a falling object kind: `bomb_share` bombs, the rest split evenly
pub fn roll_falling_kind<R: Rng>(rng: &mut R, bomb_share: f32) -> FallingKind {
    let bomb_share = bomb_share.clamp(0.0, 1.0);
    let roll: f32 = rng.random();
    if roll < bomb_share {
        return FallingKind::Bomb;
    }
    let slot = (roll - bomb_share) / (1.0 - bomb_share) * FallingKind::POWER_UPS.len() as f32;
    let idx = (slot as usize).min(FallingKind::POWER_UPS.len() - 1);
    FallingKind::POWER_UPS[idx]
}

/// Bernoulli draw: maybe one random alive enemy shoots
pub fn maybe_enemy_fire(state: &mut GameState) {
    let chance = state.tuning.enemy_fire_chance(state.level) as f64;
    if !state.rng.random_bool(chance) {
        return;
    }
    let shooters: Vec<usize> = state
        .enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| e.alive)
        .map(|(i, _)| i)
        .collect();
    if let Some(&idx) = shooters.choose(&mut state.rng) {
        let rect = state.enemies[idx].rect;
        let from = Vec2::new(rect.center().x, rect.bottom());
        state.enemy_bullets.push(Bullet::enemy(from));
    }
}

/// Bernoulli draw: maybe a bomb or power-up capsule appears at the top
pub fn maybe_spawn_falling(state: &mut GameState) {
    let chance = state.tuning.falling_spawn_chance(state.level) as f64;
    if !state.rng.random_bool(chance) {
        return;
    }
    let kind = roll_falling_kind(&mut state.rng, state.tuning.bomb_share);
    let x = state.rng.random_range(0.0..CANVAS_WIDTH - FALLING_SIZE);
    let vel = Vec2::new(
        state.rng.random_range(-1.0..1.0),
        state.rng.random_range(1.5..2.5),
    );
    log::debug!("Spawned {:?} at x={:.0}", kind, x);
    state.falling.push(FallingObject {
        rect: Rect::new(x, 0.0, FALLING_SIZE, FALLING_SIZE),
        vel,
        kind,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_barrier_pattern_is_well_formed() {
        let barrier = barrier_from_pattern(Vec2::ZERO, &BARRIER_PATTERN, BARRIER_COLUMNS);
        let expected: usize = BARRIER_PATTERN
            .iter()
            .map(|row| row.chars().filter(|&c| c == '#').count())
            .sum();
        assert_eq!(barrier.blocks.len(), expected);
        assert_eq!(barrier.alive_count(), expected);
    }

    #[test]
    fn test_mismatched_pattern_falls_back_to_solid() {
        let pattern = ["####", "##"];
        let barrier = barrier_from_pattern(Vec2::ZERO, &pattern, 4);
        assert_eq!(barrier.blocks.len(), 8);
        assert_eq!(barrier.bounds, Rect::new(0.0, 0.0, 4.0 * BLOCK_SIZE, 2.0 * BLOCK_SIZE));
    }

    #[test]
    fn test_barriers_fit_on_canvas() {
        let barriers = build_barriers();
        assert_eq!(barriers.len(), BARRIER_COUNT);
        for b in &barriers {
            assert!(b.bounds.left() >= 0.0);
            assert!(b.bounds.right() <= CANVAS_WIDTH);
            assert!(b.bounds.bottom() < PLAYER_Y);
        }
    }

    #[test]
    fn test_grid_rows_and_kinds() {
        let enemies = build_enemy_grid(5, 8);
        assert_eq!(enemies.len(), 40);
        assert_eq!(enemies[0].kind, EnemyKind::Squid);
        assert_eq!(enemies[8].kind, EnemyKind::Crab);
        assert_eq!(enemies[39].kind, EnemyKind::Octopus);
        assert!(enemies.iter().all(|e| e.alive));
    }

    #[test]
    fn test_widest_grid_fits_on_canvas() {
        let enemies = build_enemy_grid(8, 10);
        for e in &enemies {
            assert!(e.rect.left() >= 0.0 && e.rect.right() <= CANVAS_WIDTH);
            assert!(e.rect.bottom() < BARRIER_Y);
        }
    }

    #[test]
    fn test_build_level_scales_with_level() {
        let mut state = GameState::new(1);
        build_level(&mut state);
        let first = state.enemies.len();
        state.level = 9;
        build_level(&mut state);
        assert!(state.enemies.len() > first);
        assert!(state.swarm_speed > state.tuning.enemy_base_speed);
    }

    #[test]
    fn test_falling_kind_distribution() {
        let mut rng = Pcg32::seed_from_u64(7);
        let n = 20_000;
        let bombs = (0..n)
            .filter(|_| roll_falling_kind(&mut rng, 0.7).is_bomb())
            .count();
        let share = bombs as f32 / n as f32;
        assert!((share - 0.7).abs() < 0.02, "bomb share {share}");
    }

    #[test]
    fn test_every_power_up_can_roll() {
        let mut rng = Pcg32::seed_from_u64(11);
        let mut seen = std::collections::HashSet::new();
        for _ in 0..5_000 {
            seen.insert(roll_falling_kind(&mut rng, 0.7));
        }
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn test_out_of_range_bomb_share() {
        let mut rng = Pcg32::seed_from_u64(3);
        assert!((0..1_000).all(|_| roll_falling_kind(&mut rng, 1.5).is_bomb()));
        assert!((0..1_000).all(|_| !roll_falling_kind(&mut rng, -0.5).is_bomb()));
    }

    #[test]
    fn test_over_one_chances_always_fire_and_spawn() {
        let tuning = Tuning::from_json_or_default(
            r#"{ "enemy_fire_base": 1.5, "enemy_fire_max": 1.5, "falling_spawn_base": 3.0, "falling_spawn_max": 3.0, "bomb_share": 2.0 }"#,
        );
        let mut state = GameState::with_tuning(4242, tuning);
        build_level(&mut state);
        maybe_enemy_fire(&mut state);
        maybe_spawn_falling(&mut state);
        assert_eq!(state.enemy_bullets.len(), 1);
        assert_eq!(state.falling.len(), 1);
        assert!(state.falling[0].kind.is_bomb());
    }
}
