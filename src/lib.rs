//! Canvas Invaders - A fixed-screen arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, collisions, game state)
//! - `input`: Keyboard/touch/gamepad aggregation into tick input
//! - `renderer`: Pure state-to-draw-list rendering
//! - `platform`: Browser/native platform abstraction (storage, canvas)
//! - `tuning`: Data-driven game balance

pub mod game;
pub mod highscores;
pub mod input;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use game::Game;
pub use highscores::HighScore;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (one animation frame at 60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 4;

    /// Logical render surface
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player cannon (body rectangle; the barrel sits on top of it)
    pub const PLAYER_WIDTH: f32 = 50.0;
    pub const PLAYER_HEIGHT: f32 = 20.0;
    pub const PLAYER_Y: f32 = CANVAS_HEIGHT - 50.0;
    pub const PLAYER_SPEED: f32 = 5.0; // pixels per tick
    pub const BARREL_WIDTH: f32 = 8.0;
    pub const BARREL_HEIGHT: f32 = 10.0;
    /// Horizontal offset of each barrel from the cannon center in dual-barrel mode
    pub const DUAL_BARREL_OFFSET: f32 = 15.0;

    /// Enemy grid
    pub const ENEMY_WIDTH: f32 = 30.0;
    pub const ENEMY_HEIGHT: f32 = 30.0;
    pub const ENEMY_H_GAP: f32 = 15.0;
    pub const ENEMY_V_GAP: f32 = 12.0;
    pub const ENEMY_TOP: f32 = 60.0;
    /// Vertical drop when the swarm bounces off a side wall
    pub const ENEMY_DROP: f32 = 20.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 12.0;
    pub const PLAYER_BULLET_SPEED: f32 = -7.0;
    pub const ENEMY_BULLET_SPEED: f32 = 4.0;

    /// Barriers
    pub const BARRIER_COUNT: usize = 4;
    pub const BARRIER_Y: f32 = 460.0;
    pub const BLOCK_SIZE: f32 = 6.0;

    /// Falling bombs and power-up capsules
    pub const FALLING_SIZE: f32 = 16.0;
}

