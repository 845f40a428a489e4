//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entity vectors are scanned front to back)
//! - No rendering or platform dependencies

pub mod collision;
pub mod rect;
pub mod spawn;
pub mod state;
pub mod tick;

pub use rect::Rect;
pub use state::{
    Barrier, Block, Bullet, Enemy, EnemyKind, FallingKind, FallingObject, GameEvent, GamePhase,
    GameState, Outcome, Particle, Player, PowerUps, Tint, MAX_PARTICLES,
};
pub use tick::{TickInput, tick};
