//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One call is one
//! animation frame; all speeds are in pixels per tick.

use glam::Vec2;

use super::collision::{blast_blocks, explosion_sweep, first_block_hit, first_enemy_hit, reflect_velocity};
use super::spawn::{build_level, maybe_enemy_fire, maybe_spawn_falling};
use super::state::{Bullet, FallingKind, GameEvent, GamePhase, GameState, Outcome, Tint};
use crate::consts::*;
use crate::ui::{self, ButtonId};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Any fire source is held
    pub fire_held: bool,
    /// Fire went from released to held
    pub fire_pressed: bool,
    /// Enter / start: accept the default button of a screen
    pub confirm: bool,
    /// Escape: leave the current screen
    pub back: bool,
    /// Pause toggle
    pub pause: bool,
    /// Pointer press in logical canvas coordinates
    pub click: Option<Vec2>,
}

impl TickInput {
    /// Fold a newer sample in: held state is replaced, one-shots accumulate
    pub fn absorb(&mut self, newer: TickInput) {
        *self = TickInput {
            fire_pressed: self.fire_pressed || newer.fire_pressed,
            confirm: self.confirm || newer.confirm,
            back: self.back || newer.back,
            pause: self.pause || newer.pause,
            click: newer.click.or(self.click),
            ..newer
        };
    }

    /// Clear one-shot inputs after a tick consumed them
    pub fn clear_one_shots(&mut self) {
        self.fire_pressed = false;
        self.confirm = false;
        self.back = false;
        self.pause = false;
        self.click = None;
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    state.time_ticks += 1;

    // Decay screen shake
    state.screen_shake *= 0.9;
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    let pressed = ui::clicked(state.phase, input.click);

    match state.phase {
        GamePhase::Title => match pressed {
            Some(ButtonId::Start) => start_new_game(state),
            Some(ButtonId::OpenSettings) => state.set_phase(GamePhase::Settings),
            _ if input.confirm => start_new_game(state),
            _ => {}
        },

        GamePhase::Settings => match pressed {
            Some(ButtonId::Toggle(setting)) => {
                state.settings.toggle(setting);
                log::info!("{:?} -> {}", setting, state.settings.get(setting));
                state.events.push(GameEvent::SettingsChanged);
            }
            Some(ButtonId::Back) => state.set_phase(GamePhase::Title),
            _ if input.back => state.set_phase(GamePhase::Title),
            _ => {}
        },

        GamePhase::Countdown { ticks_left } => {
            update_particles(state);
            if ticks_left <= 1 {
                state.set_phase(GamePhase::Playing);
            } else {
                state.phase = GamePhase::Countdown {
                    ticks_left: ticks_left - 1,
                };
            }
        }

        GamePhase::Playing => {
            if input.pause {
                state.set_phase(GamePhase::Paused);
                return;
            }
            update_playing(state, input);
        }

        GamePhase::Paused => {
            if input.pause || input.confirm || pressed == Some(ButtonId::Resume) {
                state.set_phase(GamePhase::Playing);
            }
        }

        GamePhase::FreezeFrame { ticks_left, outcome } => {
            // Only visuals move during the freeze
            update_particles(state);
            if ticks_left <= 1 {
                state.set_phase(match outcome {
                    Outcome::GameOver => GamePhase::GameOver,
                    Outcome::LevelComplete => GamePhase::LevelComplete,
                });
            } else {
                state.phase = GamePhase::FreezeFrame {
                    ticks_left: ticks_left - 1,
                    outcome,
                };
            }
        }

        GamePhase::GameOver => match pressed {
            Some(ButtonId::Continue) => continue_game(state),
            Some(ButtonId::ToTitle) => return_to_title(state),
            _ if input.confirm => continue_game(state),
            _ if input.back => return_to_title(state),
            _ => {}
        },

        GamePhase::LevelComplete => {
            if pressed == Some(ButtonId::NextWave) || input.confirm {
                next_wave(state);
            }
        }
    }
}

/// Fresh run from level 1, via the countdown
pub fn start_new_game(state: &mut GameState) {
    state.level = 1;
    state.score = 0;
    state.particles.clear();
    build_level(state);
    log::info!("New game (seed {})", state.seed);
    state.set_phase(GamePhase::Countdown {
        ticks_left: state.tuning.countdown_ticks,
    });
}

/// Retry the level that was lost; the score starts over
pub fn continue_game(state: &mut GameState) {
    state.score = 0;
    state.particles.clear();
    build_level(state);
    log::info!("Continue at level {}", state.level);
    state.set_phase(GamePhase::Playing);
}

/// Advance to the next level
pub fn next_wave(state: &mut GameState) {
    state.level += 1;
    state.particles.clear();
    build_level(state);
    state.set_phase(GamePhase::Playing);
}

/// Drop the field and show the title screen
pub fn return_to_title(state: &mut GameState) {
    state.enemies.clear();
    state.barriers.clear();
    state.player_bullets.clear();
    state.enemy_bullets.clear();
    state.falling.clear();
    state.particles.clear();
    state.set_phase(GamePhase::Title);
}

/// Begin the dramatic pause before an outcome screen
fn freeze(state: &mut GameState, outcome: Outcome) {
    match outcome {
        Outcome::GameOver => {
            let center = state.player.rect.center();
            state.spawn_burst(center, Tint::Player, 30);
            state.shake(0.8);
            state.events.push(GameEvent::PlayerHit);
            log::info!("Game over at level {} with {} points", state.level, state.score);
        }
        Outcome::LevelComplete => {
            state.events.push(GameEvent::LevelCleared(state.level));
            log::info!("Level {} cleared", state.level);
        }
    }
    state.set_phase(GamePhase::FreezeFrame {
        ticks_left: state.tuning.freeze_frame_ticks,
        outcome,
    });
}

/// One tick of active play
fn update_playing(state: &mut GameState, input: &TickInput) {
    // Player movement
    let mut dx = 0.0;
    if input.move_left {
        dx -= state.player.speed;
    }
    if input.move_right {
        dx += state.player.speed;
    }
    state.player.move_by(dx);
    state.player.power.tick_down();

    fire(state, input);
    march_swarm(state);
    maybe_enemy_fire(state);
    maybe_spawn_falling(state);

    update_player_bullets(state);
    let shot = update_enemy_bullets(state);
    let bombed = update_falling(state);
    update_particles(state);

    // Loss wins over a simultaneous clear
    if shot || bombed || state.enemies_reached_player() {
        freeze(state, Outcome::GameOver);
    } else if state.all_enemies_dead() {
        freeze(state, Outcome::LevelComplete);
    }
}

/// Edge-triggered fire, or cooldown-gated auto-fire while held
fn fire(state: &mut GameState, input: &TickInput) {
    let player = &mut state.player;
    player.fire_cooldown = player.fire_cooldown.saturating_sub(1);

    let auto = player.power.has_auto_fire() && input.fire_held && player.fire_cooldown == 0;
    if !(input.fire_pressed || auto) {
        return;
    }
    for muzzle in player.muzzles() {
        state.player_bullets.push(Bullet::player(muzzle));
    }
    player.fire_cooldown = state.tuning.auto_fire_cooldown;
}

/// Move the swarm sideways, or flip and drop when it would leave the canvas
fn march_swarm(state: &mut GameState) {
    let dx = state.swarm_speed * state.swarm_dir;
    let hits_wall = state
        .enemies
        .iter()
        .filter(|e| e.alive)
        .any(|e| e.rect.left() + dx < 0.0 || e.rect.right() + dx > CANVAS_WIDTH);

    if hits_wall {
        state.swarm_dir = -state.swarm_dir;
        for enemy in &mut state.enemies {
            enemy.rect.pos.y += ENEMY_DROP;
        }
    } else {
        for enemy in &mut state.enemies {
            enemy.rect.pos.x += dx;
        }
    }
}

/// Player bullets: off-screen, then first enemy, then first barrier block
fn update_player_bullets(state: &mut GameState) {
    let mut i = 0;
    while i < state.player_bullets.len() {
        let bullet = &mut state.player_bullets[i];
        bullet.advance();
        let rect = bullet.rect;
        if bullet.is_off_screen() {
            state.player_bullets.swap_remove(i);
            continue;
        }

        let impact = if let Some(idx) = first_enemy_hit(&rect, &state.enemies) {
            let enemy = &mut state.enemies[idx];
            enemy.alive = false;
            let (kind, center) = (enemy.kind, enemy.rect.center());
            state.award(kind.points());
            state.events.push(GameEvent::EnemyDestroyed {
                kind,
                points: kind.points(),
            });
            state.spawn_burst(center, Tint::Enemy(kind), 12);
            true
        } else if let Some((b, k)) = first_block_hit(&rect, &state.barriers) {
            let block = &mut state.barriers[b].blocks[k];
            block.alive = false;
            let center = block.rect.center();
            state.spawn_burst(center, Tint::Block, 4);
            true
        } else {
            false
        };

        if impact {
            if state.player.power.has_explosive() {
                detonate(state, rect.center());
            }
            state.player_bullets.swap_remove(i);
        } else {
            i += 1;
        }
    }
}

/// Explosive-bullet sweep around an impact point, scored in the same step
fn detonate(state: &mut GameState, point: Vec2) {
    let radius = state.tuning.explosion_radius;
    let sweep = explosion_sweep(point, radius, &mut state.enemies, &mut state.barriers);
    state.award(sweep.points());
    for &(kind, center) in &sweep.enemies {
        state.events.push(GameEvent::EnemyDestroyed {
            kind,
            points: kind.points(),
        });
        state.spawn_burst(center, Tint::Enemy(kind), 12);
    }
    state.spawn_burst(point, Tint::Spark, 10);
    state.shake(0.3);
    log::debug!(
        "Explosion at ({:.0}, {:.0}): {} enemies, {} blocks",
        point.x,
        point.y,
        sweep.enemies.len(),
        sweep.blocks
    );
}

/// Enemy bullets: off-screen, then the player, then barrier blocks.
/// Returns true if the player was hit.
fn update_enemy_bullets(state: &mut GameState) -> bool {
    let mut player_hit = false;
    let mut i = 0;
    while i < state.enemy_bullets.len() {
        let bullet = &mut state.enemy_bullets[i];
        bullet.advance();
        let rect = bullet.rect;
        if bullet.is_off_screen() {
            state.enemy_bullets.swap_remove(i);
            continue;
        }

        if state.player.is_hit_by(&rect) {
            state.enemy_bullets.swap_remove(i);
            if state.player.power.is_invincible() {
                log::debug!("Shield absorbed a bullet");
            } else {
                player_hit = true;
            }
            continue;
        }

        if let Some((b, k)) = first_block_hit(&rect, &state.barriers) {
            let block = &mut state.barriers[b].blocks[k];
            block.alive = false;
            let center = block.rect.center();
            state.spawn_burst(center, Tint::Block, 4);
            state.enemy_bullets.swap_remove(i);
            continue;
        }

        i += 1;
    }
    player_hit
}

/// Bombs and capsules: bounce off side walls, leave at the bottom, hit the
/// player, and (bombs only) blast barriers. Returns true if a bomb hit the player.
fn update_falling(state: &mut GameState) -> bool {
    let mut player_hit = false;
    let mut i = 0;
    while i < state.falling.len() {
        let obj = &mut state.falling[i];
        obj.rect.translate(obj.vel);
        if obj.rect.left() < 0.0 {
            obj.rect.pos.x = 0.0;
            obj.vel = reflect_velocity(obj.vel, Vec2::X);
        } else if obj.rect.right() > CANVAS_WIDTH {
            obj.rect.pos.x = CANVAS_WIDTH - obj.rect.size.x;
            obj.vel = reflect_velocity(obj.vel, -Vec2::X);
        }
        let (rect, kind) = (obj.rect, obj.kind);

        if rect.top() > CANVAS_HEIGHT {
            state.falling.swap_remove(i);
            continue;
        }

        if state.player.is_hit_by(&rect) {
            state.falling.swap_remove(i);
            match kind {
                FallingKind::Bomb if state.player.power.is_invincible() => {
                    log::debug!("Shield absorbed a bomb");
                }
                FallingKind::Bomb => player_hit = true,
                power_up => {
                    state.player.power.activate(power_up, &state.tuning);
                    state.events.push(GameEvent::PowerUpCollected(power_up));
                    state.spawn_burst(rect.center(), Tint::Falling(power_up), 8);
                    log::info!("Power-up collected: {:?}", power_up);
                }
            }
            continue;
        }

        // Capsules pass through barriers; bombs blow a hole
        if kind.is_bomb() {
            if let Some((b, k)) = first_block_hit(&rect, &state.barriers) {
                state.barriers[b].blocks[k].alive = false;
                let center = rect.center();
                let radius = state.tuning.bomb_blast_radius;
                let blasted = blast_blocks(center, radius, &mut state.barriers);
                log::debug!("Bomb hit barrier {b}: {blasted} extra blocks");
                state.spawn_burst(center, Tint::Falling(FallingKind::Bomb), 10);
                state.shake(0.2);
                state.falling.swap_remove(i);
                continue;
            }
        }

        i += 1;
    }
    player_hit
}

/// Move and age particles
fn update_particles(state: &mut GameState) {
    for particle in state.particles.iter_mut() {
        particle.pos += particle.vel;
        particle.vel *= 0.96;
        particle.life = particle.life.saturating_sub(1);
    }
    state.particles.retain(|p| p.life > 0);
}
