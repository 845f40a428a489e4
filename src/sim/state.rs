//! Game state and core simulation types
//!
//! All state the tick function reads or writes lives here.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::rect::Rect;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::Tuning;

/// How a round of play ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    GameOver,
    LevelComplete,
}

/// Current screen / phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen with Start / Settings buttons
    Title,
    /// Settings screen with toggles
    Settings,
    /// "3, 2, 1" before the first wave
    Countdown { ticks_left: u32 },
    /// Active gameplay
    Playing,
    /// Game is paused
    Paused,
    /// Static dramatic pause before the outcome screen
    FreezeFrame { ticks_left: u32, outcome: Outcome },
    /// Run ended; Continue or back to Title
    GameOver,
    /// Every enemy destroyed; Next Wave
    LevelComplete,
}

/// Palette slot for entities; the renderer maps these to colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tint {
    Player,
    PlayerBullet,
    EnemyBullet,
    Enemy(EnemyKind),
    Block,
    Falling(FallingKind),
    Spark,
}

/// Timed power-up effects on the player (ticks remaining, 0 = off)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerUps {
    pub invincible_ticks: u32,
    pub auto_fire_ticks: u32,
    pub dual_barrel_ticks: u32,
    pub explosive_ticks: u32,
}

impl PowerUps {
    pub fn is_invincible(&self) -> bool {
        self.invincible_ticks > 0
    }

    pub fn has_auto_fire(&self) -> bool {
        self.auto_fire_ticks > 0
    }

    pub fn has_dual_barrel(&self) -> bool {
        self.dual_barrel_ticks > 0
    }

    pub fn has_explosive(&self) -> bool {
        self.explosive_ticks > 0
    }

    /// Start (or refresh) the effect carried by a capsule. Bombs do nothing.
    pub fn activate(&mut self, kind: FallingKind, tuning: &Tuning) {
        match kind {
            FallingKind::Bomb => {}
            FallingKind::Shield => self.invincible_ticks = tuning.shield_ticks,
            FallingKind::AutoFire => self.auto_fire_ticks = tuning.power_up_ticks,
            FallingKind::DualBarrel => self.dual_barrel_ticks = tuning.power_up_ticks,
            FallingKind::Explosive => self.explosive_ticks = tuning.power_up_ticks,
        }
    }

    /// Count every active timer down by one tick
    pub fn tick_down(&mut self) {
        self.invincible_ticks = self.invincible_ticks.saturating_sub(1);
        self.auto_fire_ticks = self.auto_fire_ticks.saturating_sub(1);
        self.dual_barrel_ticks = self.dual_barrel_ticks.saturating_sub(1);
        self.explosive_ticks = self.explosive_ticks.saturating_sub(1);
    }
}

/// The player's cannon
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Cannon body; `rect.pos.y` is the top of the body
    pub rect: Rect,
    /// Horizontal speed (pixels per tick)
    pub speed: f32,
    pub power: PowerUps,
    /// Ticks until auto-fire may shoot again
    pub fire_cooldown: u32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            rect: Rect::new(
                (CANVAS_WIDTH - PLAYER_WIDTH) / 2.0,
                PLAYER_Y,
                PLAYER_WIDTH,
                PLAYER_HEIGHT,
            ),
            speed: PLAYER_SPEED,
            power: PowerUps::default(),
            fire_cooldown: 0,
        }
    }
}

impl Player {
    /// Top of the cannon body (the line enemies must not reach)
    #[inline]
    pub fn y(&self) -> f32 {
        self.rect.top()
    }

    /// Barrel rectangles on top of the body: one centered, or two offset
    /// sideways while dual-barrel is active
    pub fn barrels(&self) -> Vec<Rect> {
        let cx = self.rect.center().x;
        let offsets = if self.power.has_dual_barrel() {
            vec![-DUAL_BARREL_OFFSET, DUAL_BARREL_OFFSET]
        } else {
            vec![0.0]
        };
        offsets
            .into_iter()
            .map(|dx| {
                Rect::new(
                    cx + dx - BARREL_WIDTH / 2.0,
                    self.rect.top() - BARREL_HEIGHT,
                    BARREL_WIDTH,
                    BARREL_HEIGHT,
                )
            })
            .collect()
    }

    /// Visual hitbox: cannon body plus every drawn barrel
    pub fn hitbox(&self) -> Vec<Rect> {
        let mut parts = vec![self.rect];
        parts.extend(self.barrels());
        parts
    }

    /// True if the rectangle touches any part of the visual hitbox
    pub fn is_hit_by(&self, other: &Rect) -> bool {
        self.hitbox().iter().any(|r| r.overlaps(other))
    }

    /// Move horizontally and clamp to the canvas
    pub fn move_by(&mut self, dx: f32) {
        self.rect.pos.x = (self.rect.pos.x + dx).clamp(0.0, CANVAS_WIDTH - self.rect.size.x);
    }

    /// Bullet spawn points, top center of each barrel
    pub fn muzzles(&self) -> Vec<Vec2> {
        self.barrels()
            .iter()
            .map(|b| Vec2::new(b.center().x, b.top()))
            .collect()
    }

    /// Put the cannon back in the middle with no effects
    pub fn respawn(&mut self) {
        *self = Self::default();
    }
}

/// Enemy types, one per shape pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Squid,
    Crab,
    Octopus,
}

impl EnemyKind {
    /// Row 0 is squids, rows 1-2 crabs, the rest octopi
    pub fn for_row(row: u32) -> Self {
        match row {
            0 => EnemyKind::Squid,
            1 | 2 => EnemyKind::Crab,
            _ => EnemyKind::Octopus,
        }
    }

    pub fn points(&self) -> u64 {
        match self {
            EnemyKind::Squid => 30,
            EnemyKind::Crab => 20,
            EnemyKind::Octopus => 10,
        }
    }
}

/// An enemy in the marching grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub rect: Rect,
    pub kind: EnemyKind,
    pub alive: bool,
}

impl Enemy {
    pub fn new(x: f32, y: f32, kind: EnemyKind) -> Self {
        Self {
            rect: Rect::new(x, y, ENEMY_WIDTH, ENEMY_HEIGHT),
            kind,
            alive: true,
        }
    }
}

/// A bullet (player bullets move up, enemy bullets down)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub rect: Rect,
    /// Vertical speed (pixels per tick, negative = up)
    pub speed: f32,
    pub tint: Tint,
}

impl Bullet {
    /// Player bullet centered on a muzzle point
    pub fn player(muzzle: Vec2) -> Self {
        Self {
            rect: Rect::new(
                muzzle.x - BULLET_WIDTH / 2.0,
                muzzle.y - BULLET_HEIGHT,
                BULLET_WIDTH,
                BULLET_HEIGHT,
            ),
            speed: PLAYER_BULLET_SPEED,
            tint: Tint::PlayerBullet,
        }
    }

    /// Enemy bullet dropped from the bottom center of a shooter
    pub fn enemy(from: Vec2) -> Self {
        Self {
            rect: Rect::new(from.x - BULLET_WIDTH / 2.0, from.y, BULLET_WIDTH, BULLET_HEIGHT),
            speed: ENEMY_BULLET_SPEED,
            tint: Tint::EnemyBullet,
        }
    }

    #[inline]
    pub fn advance(&mut self) {
        self.rect.pos.y += self.speed;
    }

    /// Entirely outside the canvas vertically
    pub fn is_off_screen(&self) -> bool {
        self.rect.bottom() < 0.0 || self.rect.top() > CANVAS_HEIGHT
    }
}

/// One destructible cell of a barrier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub rect: Rect,
    pub alive: bool,
}

/// A barrier: a grid of blocks with a cached bounding box
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Barrier {
    pub bounds: Rect,
    pub blocks: Vec<Block>,
}

impl Barrier {
    pub fn new(blocks: Vec<Block>) -> Self {
        let bounds = blocks
            .iter()
            .map(|b| b.rect)
            .reduce(|a, b| a.union(&b))
            .unwrap_or_default();
        Self { bounds, blocks }
    }

    pub fn alive_count(&self) -> usize {
        self.blocks.iter().filter(|b| b.alive).count()
    }
}

/// Falling object types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FallingKind {
    Bomb,
    Shield,
    AutoFire,
    DualBarrel,
    Explosive,
}

impl FallingKind {
    pub const POWER_UPS: [FallingKind; 4] = [
        FallingKind::Shield,
        FallingKind::AutoFire,
        FallingKind::DualBarrel,
        FallingKind::Explosive,
    ];

    pub fn is_bomb(&self) -> bool {
        matches!(self, FallingKind::Bomb)
    }

    /// Short HUD label
    pub fn label(&self) -> &'static str {
        match self {
            FallingKind::Bomb => "BOMB",
            FallingKind::Shield => "SHIELD",
            FallingKind::AutoFire => "AUTO",
            FallingKind::DualBarrel => "DUAL",
            FallingKind::Explosive => "BOOM",
        }
    }
}

/// A bomb or power-up capsule drifting down the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FallingObject {
    pub rect: Rect,
    pub vel: Vec2,
    pub kind: FallingKind,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub tint: Tint,
    /// Ticks left to live
    pub life: u32,
    pub max_life: u32,
}

impl Particle {
    /// Remaining life in 0-1 (for fading)
    pub fn alpha(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Maximum particles
pub const MAX_PARTICLES: usize = 256;

/// Mixed into the run seed for the effects stream
const FX_SEED_SALT: u64 = 0x9E37_79B9_7F4A_7C15;

/// Things that happened during a tick that the driver may act on
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// Score passed the stored high score
    NewHighScore(u64),
    /// A setting was toggled on the Settings screen
    SettingsChanged,
    PlayerHit,
    EnemyDestroyed { kind: EnemyKind, points: u64 },
    PowerUpCollected(FallingKind),
    LevelCleared(u32),
    PhaseChanged(GamePhase),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    /// Gameplay randomness (enemy fire, falling spawns)
    pub rng: Pcg32,
    /// Particle randomness, separate so effects never shift gameplay draws
    pub fx_rng: Pcg32,
    pub tuning: Tuning,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Best score seen so far (stored value or this session's best)
    pub high_score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Enemy grid (dead entries stay until the next level build)
    pub enemies: Vec<Enemy>,
    /// Swarm marching direction (+1 right, -1 left)
    pub swarm_dir: f32,
    /// Swarm horizontal speed for the current level
    pub swarm_speed: f32,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub barriers: Vec<Barrier>,
    pub falling: Vec<FallingObject>,
    /// Visual particles (not gameplay-affecting)
    pub particles: Vec<Particle>,
    /// Screen shake intensity (0-1, decays)
    pub screen_shake: f32,
    /// Events raised since the driver last drained them
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new game state on the title screen
    pub fn new(seed: u64) -> Self {
        Self::with_tuning(seed, Tuning::default())
    }

    pub fn with_tuning(seed: u64, tuning: Tuning) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            tuning,
            settings: Settings::default(),
            phase: GamePhase::Title,
            level: 1,
            score: 0,
            high_score: 0,
            time_ticks: 0,
            player: Player::default(),
            enemies: Vec::new(),
            swarm_dir: 1.0,
            swarm_speed: 0.0,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            barriers: Vec::new(),
            falling: Vec::new(),
            particles: Vec::new(),
            screen_shake: 0.0,
            events: Vec::new(),
        }
    }

    /// Switch phase and record the transition
    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase != phase {
            log::debug!("Phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.events.push(GameEvent::PhaseChanged(phase));
        }
    }

    /// Add points, raising a high score event when the best is beaten
    pub fn award(&mut self, points: u64) {
        self.score += points;
        if self.score > self.high_score {
            self.high_score = self.score;
            self.events.push(GameEvent::NewHighScore(self.score));
        }
    }

    /// True when no enemy is left alive
    pub fn all_enemies_dead(&self) -> bool {
        self.enemies.iter().all(|e| !e.alive)
    }

    /// True when any alive enemy's bottom edge reached the cannon
    pub fn enemies_reached_player(&self) -> bool {
        let line = self.player.y();
        self.enemies.iter().any(|e| e.alive && e.rect.bottom() >= line)
    }

    /// Add a particle burst around a point (no-op when particles are off)
    pub fn spawn_burst(&mut self, center: Vec2, tint: Tint, count: usize) {
        if !self.settings.particles {
            return;
        }
        for _ in 0..count {
            if self.particles.len() >= MAX_PARTICLES {
                // Remove oldest particles to make room
                self.particles.remove(0);
            }
            let angle = self.fx_rng.random_range(0.0..std::f32::consts::TAU);
            let speed = self.fx_rng.random_range(0.5..3.0);
            let life = self.fx_rng.random_range(20..45);
            self.particles.push(Particle {
                pos: center,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                size: self.fx_rng.random_range(2.0..4.0),
                tint,
                life,
                max_life: life,
            });
        }
    }

    /// Bump screen shake (respects the setting)
    pub fn shake(&mut self, amount: f32) {
        if self.settings.screen_shake {
            self.screen_shake = (self.screen_shake + amount).min(1.0);
        }
    }

    /// Take and clear pending events
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_complete_condition() {
        let mut state = GameState::new(1);
        state.enemies = vec![
            Enemy::new(0.0, 0.0, EnemyKind::Squid),
            Enemy::new(50.0, 0.0, EnemyKind::Crab),
        ];
        for e in &mut state.enemies {
            e.alive = false;
        }
        assert!(state.all_enemies_dead());

        state.enemies[1].alive = true;
        assert!(!state.all_enemies_dead());
    }

    #[test]
    fn test_loss_condition_bottom_edge() {
        let mut state = GameState::new(1);
        assert_eq!(state.player.y(), 550.0);

        state.enemies = vec![Enemy::new(100.0, 525.0, EnemyKind::Octopus)];
        assert!(state.enemies_reached_player()); // 555 >= 550

        state.enemies = vec![Enemy::new(100.0, 500.0, EnemyKind::Octopus)];
        assert!(!state.enemies_reached_player()); // 530 < 550

        // Dead enemies never count
        state.enemies = vec![Enemy::new(100.0, 525.0, EnemyKind::Octopus)];
        state.enemies[0].alive = false;
        assert!(!state.enemies_reached_player());
    }

    #[test]
    fn test_award_raises_high_score_event_only_when_beaten() {
        let mut state = GameState::new(1);
        state.high_score = 100;
        state.award(50);
        assert!(state.events.is_empty());
        state.award(60);
        assert_eq!(state.high_score, 110);
        assert_eq!(state.drain_events(), vec![GameEvent::NewHighScore(110)]);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_player_clamped_to_canvas() {
        let mut player = Player::default();
        player.move_by(-10_000.0);
        assert_eq!(player.rect.left(), 0.0);
        player.move_by(10_000.0);
        assert_eq!(player.rect.right(), CANVAS_WIDTH);
    }

    #[test]
    fn test_hitbox_includes_barrel() {
        let player = Player::default();
        let barrel = player.barrels()[0];
        // A bullet touching only the barrel still hits
        let probe = Rect::new(barrel.center().x - 1.0, barrel.top() + 1.0, 2.0, 2.0);
        assert!(!player.rect.overlaps(&probe));
        assert!(player.is_hit_by(&probe));
    }

    #[test]
    fn test_dual_barrel_muzzles() {
        let mut player = Player::default();
        assert_eq!(player.muzzles().len(), 1);
        player.power.activate(FallingKind::DualBarrel, &Tuning::default());
        assert_eq!(player.muzzles().len(), 2);
    }

    #[test]
    fn test_dual_barrel_hitbox_follows_drawn_barrels() {
        let mut player = Player::default();
        let cx = player.rect.center().x;
        let top = player.rect.top();
        // Just above the body, beside the center barrel, inside the right dual barrel
        let side = Rect::new(cx + DUAL_BARREL_OFFSET - 1.0, top - 3.0, 2.0, 2.0);
        // Just above the body, on the center barrel
        let middle = Rect::new(cx - 1.0, top - 3.0, 2.0, 2.0);
        assert!(!player.is_hit_by(&side));
        assert!(player.is_hit_by(&middle));

        player.power.activate(FallingKind::DualBarrel, &Tuning::default());
        assert_eq!(player.hitbox().len(), 3);
        assert!(player.is_hit_by(&side));
        assert!(!player.is_hit_by(&middle));
        for (muzzle, barrel) in player.muzzles().iter().zip(player.barrels()) {
            assert_eq!(muzzle.x, barrel.center().x);
            assert_eq!(muzzle.y, barrel.top());
        }
    }

    #[test]
    fn test_power_up_timers_expire() {
        let tuning = Tuning {
            shield_ticks: 2,
            ..Default::default()
        };
        let mut power = PowerUps::default();
        power.activate(FallingKind::Shield, &tuning);
        assert!(power.is_invincible());
        power.tick_down();
        power.tick_down();
        assert!(!power.is_invincible());
    }

    #[test]
    fn test_particle_cap() {
        let mut state = GameState::new(3);
        state.spawn_burst(Vec2::ZERO, Tint::Spark, MAX_PARTICLES + 40);
        assert_eq!(state.particles.len(), MAX_PARTICLES);
    }

    #[test]
    fn test_bursts_leave_gameplay_rng_untouched() {
        let mut state = GameState::new(3);
        let before = state.rng.clone();
        state.spawn_burst(Vec2::ZERO, Tint::Spark, 10);
        assert_eq!(state.particles.len(), 10);
        assert_eq!(state.rng, before);
    }

    #[test]
    fn test_particles_disabled_by_setting() {
        let mut state = GameState::new(3);
        state.settings.particles = false;
        state.spawn_burst(Vec2::ZERO, Tint::Spark, 10);
        assert!(state.particles.is_empty());
    }
}
