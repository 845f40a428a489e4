//! Per-phase scene composition
//!
//! Pure function from game state to a draw list. Nothing here touches the
//! simulation RNG, so rendering never perturbs a seeded run.

use glam::Vec2;

use super::draw::{Align, DrawList, colors, falling_color, tint_color, with_alpha};
use super::sprites::enemy_bitmap;
use crate::consts::*;
use crate::sim::{FallingKind, GamePhase, GameState, Rect, Tint};
use crate::ui::{self, Button, ButtonId, TOUCH_PADS};

/// Ticks per sprite animation frame
const MARCH_FRAME_TICKS: u64 = 30;
/// Maximum shake displacement in pixels
const SHAKE_PIXELS: f32 = 8.0;

/// Build the draw list for the current frame. `fps` is shown only when the
/// setting is on.
pub fn render(state: &GameState, fps: Option<u32>) -> DrawList {
    let mut list = DrawList::new(colors::BACKGROUND);
    list.offset = shake_offset(state);

    match state.phase {
        GamePhase::Title => title_screen(&mut list, state),
        GamePhase::Settings => settings_screen(&mut list, state),
        GamePhase::Countdown { ticks_left } => {
            field(&mut list, state);
            hud(&mut list, state);
            let seconds = ticks_left.div_ceil(60).max(1);
            list.label(
                Vec2::new(CANVAS_WIDTH / 2.0, CANVAS_HEIGHT / 2.0),
                seconds.to_string(),
                72.0,
                colors::ACCENT,
            );
        }
        GamePhase::Playing => {
            field(&mut list, state);
            hud(&mut list, state);
            if state.settings.touch_controls {
                touch_pads(&mut list);
            }
        }
        GamePhase::FreezeFrame { .. } => {
            field(&mut list, state);
            hud(&mut list, state);
        }
        GamePhase::Paused => {
            field(&mut list, state);
            hud(&mut list, state);
            overlay(&mut list, "PAUSED", colors::TEXT);
            menu_buttons(&mut list, state);
        }
        GamePhase::GameOver => {
            field(&mut list, state);
            overlay(&mut list, "GAME OVER", colors::ENEMY_BULLET);
            list.label(
                Vec2::new(CANVAS_WIDTH / 2.0, 270.0),
                format!("SCORE {}   BEST {}", state.score, state.high_score),
                22.0,
                colors::TEXT,
            );
            menu_buttons(&mut list, state);
        }
        GamePhase::LevelComplete => {
            field(&mut list, state);
            overlay(
                &mut list,
                &format!("WAVE {} CLEARED", state.level),
                colors::ACCENT,
            );
            list.label(
                Vec2::new(CANVAS_WIDTH / 2.0, 270.0),
                format!("SCORE {}", state.score),
                22.0,
                colors::TEXT,
            );
            menu_buttons(&mut list, state);
        }
    }

    if let Some(fps) = fps.filter(|_| state.settings.show_fps) {
        list.text(
            Vec2::new(CANVAS_WIDTH - 10.0, CANVAS_HEIGHT - 8.0),
            format!("{fps} FPS"),
            12.0,
            colors::TEXT_DIM,
            Align::Right,
        );
    }

    list
}

/// Deterministic jitter derived from the tick counter
fn shake_offset(state: &GameState) -> Vec2 {
    if state.screen_shake <= 0.0 {
        return Vec2::ZERO;
    }
    let t = state.time_ticks as f32;
    Vec2::new((t * 12.9898).sin(), (t * 78.233).cos()) * state.screen_shake * SHAKE_PIXELS
}

fn title_screen(list: &mut DrawList, state: &GameState) {
    list.label(Vec2::new(CANVAS_WIDTH / 2.0, 150.0), "CANVAS INVADERS", 48.0, colors::ACCENT);
    list.label(
        Vec2::new(CANVAS_WIDTH / 2.0, 210.0),
        format!("HIGH SCORE {}", state.high_score),
        20.0,
        colors::TEXT,
    );
    menu_buttons(list, state);
    list.label(
        Vec2::new(CANVAS_WIDTH / 2.0, 500.0),
        "ARROWS MOVE   SPACE FIRES   P PAUSES",
        14.0,
        colors::TEXT_DIM,
    );
}

fn settings_screen(list: &mut DrawList, state: &GameState) {
    list.label(Vec2::new(CANVAS_WIDTH / 2.0, 110.0), "SETTINGS", 40.0, colors::ACCENT);
    menu_buttons(list, state);
}

fn menu_buttons(list: &mut DrawList, state: &GameState) {
    for b in ui::buttons(state.phase) {
        let caption = match b.id {
            ButtonId::Toggle(setting) => toggle_caption(b.label, state.settings.get(setting)),
            _ => b.label.to_string(),
        };
        button(list, b, &caption);
    }
}

fn toggle_caption(label: &str, on: bool) -> String {
    format!("{label}: {}", if on { "ON" } else { "OFF" })
}

fn button(list: &mut DrawList, b: &Button, caption: &str) {
    list.rect(b.rect, colors::BUTTON);
    list.stroke_rect(b.rect, colors::BUTTON_BORDER, 2.0);
    let c = b.rect.center();
    list.label(Vec2::new(c.x, c.y + 7.0), caption, 20.0, colors::TEXT);
}

/// Dimmed backdrop with a headline
fn overlay(list: &mut DrawList, headline: &str, color: [f32; 4]) {
    list.rect(Rect::new(0.0, 0.0, CANVAS_WIDTH, CANVAS_HEIGHT), colors::OVERLAY);
    list.label(Vec2::new(CANVAS_WIDTH / 2.0, 220.0), headline, 48.0, color);
}

fn touch_pads(list: &mut DrawList) {
    for pad in &TOUCH_PADS {
        list.rect(pad.rect, colors::TOUCH_PAD);
        let c = pad.rect.center();
        list.label(Vec2::new(c.x, c.y + 8.0), pad.label, 22.0, colors::TEXT_DIM);
    }
}

/// Barriers, enemies, the cannon, projectiles and particles
fn field(list: &mut DrawList, state: &GameState) {
    for barrier in &state.barriers {
        for block in barrier.blocks.iter().filter(|b| b.alive) {
            list.rect(block.rect, colors::BLOCK);
        }
    }

    let frame = state.time_ticks / MARCH_FRAME_TICKS;
    for enemy in state.enemies.iter().filter(|e| e.alive) {
        let color = tint_color(Tint::Enemy(enemy.kind));
        for run in enemy_bitmap(enemy.kind, frame).runs(enemy.rect) {
            list.rect(run, color);
        }
    }

    player(list, state);

    for bullet in state.player_bullets.iter().chain(&state.enemy_bullets) {
        list.rect(bullet.rect, tint_color(bullet.tint));
    }

    for obj in &state.falling {
        let color = falling_color(obj.kind);
        match obj.kind {
            FallingKind::Bomb => {
                list.circle(obj.rect.center(), obj.rect.size.x / 2.0, color);
            }
            kind => {
                list.rect(obj.rect, color);
                let c = obj.rect.center();
                let initial = &kind.label()[..1];
                list.label(Vec2::new(c.x, c.y + 4.0), initial, 11.0, colors::BACKGROUND);
            }
        }
    }

    for p in &state.particles {
        let half = p.size / 2.0;
        list.rect(
            Rect::new(p.pos.x - half, p.pos.y - half, p.size, p.size),
            with_alpha(tint_color(p.tint), p.alpha()),
        );
    }
}

fn player(list: &mut DrawList, state: &GameState) {
    let player = &state.player;
    for part in player.hitbox() {
        list.rect(part, colors::PLAYER);
    }
    if player.power.is_invincible() {
        // Blink during the last second
        let ticks = player.power.invincible_ticks;
        if ticks > 60 || (state.time_ticks / 6) % 2 == 0 {
            let c = player.rect.center();
            list.circle(c, PLAYER_WIDTH * 0.75, colors::SHIELD);
        }
    }
}

fn hud(list: &mut DrawList, state: &GameState) {
    list.text(
        Vec2::new(10.0, 24.0),
        format!("SCORE {}", state.score),
        18.0,
        colors::TEXT,
        Align::Left,
    );
    list.label(
        Vec2::new(CANVAS_WIDTH / 2.0, 24.0),
        format!("HI {}", state.high_score),
        18.0,
        colors::TEXT,
    );
    list.text(
        Vec2::new(CANVAS_WIDTH - 10.0, 24.0),
        format!("LEVEL {}", state.level),
        18.0,
        colors::TEXT,
        Align::Right,
    );

    let power = &state.player.power;
    let timers = [
        (FallingKind::Shield, power.invincible_ticks),
        (FallingKind::AutoFire, power.auto_fire_ticks),
        (FallingKind::DualBarrel, power.dual_barrel_ticks),
        (FallingKind::Explosive, power.explosive_ticks),
    ];
    let mut x = 10.0;
    for (kind, ticks) in timers.into_iter().filter(|(_, t)| *t > 0) {
        list.text(
            Vec2::new(x, 44.0),
            format!("{} {}s", kind.label(), ticks.div_ceil(60)),
            12.0,
            falling_color(kind),
            Align::Left,
        );
        x += 90.0;
    }
}
