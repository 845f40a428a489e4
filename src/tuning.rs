//! Data-driven game balance
//!
//! Difficulty scaling coefficients and timer lengths. Every field has a
//! default, so a JSON override only needs the keys it changes.

use serde::{Deserialize, Serialize};

/// Balance knobs for a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Enemy grid ===
    pub base_rows: u32,
    pub base_cols: u32,
    /// Cap on rows added by level scaling
    pub max_extra_rows: u32,
    /// Cap on columns added by level scaling
    pub max_extra_cols: u32,

    // === Enemy movement (pixels per tick) ===
    pub enemy_base_speed: f32,
    pub enemy_speed_per_level: f32,
    pub enemy_max_speed: f32,

    // === Per-tick Bernoulli probabilities ===
    pub enemy_fire_base: f32,
    pub enemy_fire_per_level: f32,
    pub enemy_fire_max: f32,
    pub falling_spawn_base: f32,
    pub falling_spawn_per_level: f32,
    pub falling_spawn_max: f32,
    /// Share of falling objects that are bombs (rest split across power-ups)
    pub bomb_share: f32,

    // === Power-ups (ticks) ===
    pub shield_ticks: u32,
    pub power_up_ticks: u32,
    pub auto_fire_cooldown: u32,

    // === Area of effect ===
    pub explosion_radius: f32,
    pub bomb_blast_radius: f32,

    // === Transitions (ticks) ===
    pub freeze_frame_ticks: u32,
    pub countdown_ticks: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            base_rows: 4,
            base_cols: 8,
            max_extra_rows: 4,
            max_extra_cols: 2,

            enemy_base_speed: 1.0,
            enemy_speed_per_level: 0.25,
            enemy_max_speed: 3.0,

            enemy_fire_base: 0.01,
            enemy_fire_per_level: 0.005,
            enemy_fire_max: 0.05,
            falling_spawn_base: 0.003,
            falling_spawn_per_level: 0.0015,
            falling_spawn_max: 0.012,
            bomb_share: 0.7,

            shield_ticks: 300,
            power_up_ticks: 600,
            auto_fire_cooldown: 8,

            explosion_radius: 30.0,
            bomb_blast_radius: 18.0,

            freeze_frame_ticks: 60,
            countdown_ticks: 180,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Parse an override, falling back to defaults on malformed input
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning override ({e}), using defaults");
                Self::default()
            }
        }
    }

    /// Enemy grid rows for a level (1-based)
    pub fn rows_for_level(&self, level: u32) -> u32 {
        let extra = (level.saturating_sub(1) / 2).min(self.max_extra_rows);
        self.base_rows + extra
    }

    /// Enemy grid columns for a level (1-based)
    pub fn cols_for_level(&self, level: u32) -> u32 {
        let extra = (level.saturating_sub(1) / 3).min(self.max_extra_cols);
        self.base_cols + extra
    }

    /// Horizontal swarm speed for a level
    pub fn enemy_speed_for_level(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        (self.enemy_base_speed + steps * self.enemy_speed_per_level).min(self.enemy_max_speed)
    }

    /// Per-tick chance that some enemy fires
    pub fn enemy_fire_chance(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        probability(
            (self.enemy_fire_base + steps * self.enemy_fire_per_level).min(self.enemy_fire_max),
        )
    }

    /// Per-tick chance that a falling object spawns
    pub fn falling_spawn_chance(&self, level: u32) -> f32 {
        let steps = level.saturating_sub(1) as f32;
        probability(
            (self.falling_spawn_base + steps * self.falling_spawn_per_level)
                .min(self.falling_spawn_max),
        )
    }
}

/// Clamp an overridden chance into [0, 1]
fn probability(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}
