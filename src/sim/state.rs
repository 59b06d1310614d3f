//! Game state and core simulation types
//!
//! The whole simulation is one explicit aggregate, [`GameState`], passed by
//! mutable reference to each system. There are no ambient globals.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bonus::ActiveBonuses;
use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title screen
    Menu,
    /// Upgrade shop, opened over the menu
    Shop,
    /// Active gameplay
    Playing,
    /// Run ended, waiting for a tap
    GameOver,
}

/// Difficulty level for a cumulative score: `1 + floor(score / points_per_level)`
pub fn difficulty_level(score: u32, points_per_level: u32) -> u32 {
    1 + score / points_per_level.max(1)
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner
    pub pos: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Desired x, written by the input layer
    pub target_x: f32,
    /// Easing factor toward `target_x`
    pub smoothing: f32,
    /// Ticks between shots
    pub fire_rate: u32,
    pub fire_cooldown: i32,
    /// Set for the tick the ship was hit (screen shake)
    pub took_damage: bool,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let x = PLAYFIELD_WIDTH / 2.0 - PLAYER_SIZE / 2.0;
        Self {
            pos: Vec2::new(x, PLAYFIELD_HEIGHT - PLAYER_BOTTOM_OFFSET),
            hp: tuning.player_base_hp,
            max_hp: tuning.player_base_hp,
            target_x: x,
            smoothing: tuning.player_smoothing,
            fire_rate: tuning.player_base_fire_rate,
            fire_cooldown: 0,
            took_damage: false,
        }
    }

    /// Put the ship back on the launch pad for a new run.
    ///
    /// Upgraded stats (`max_hp`, `fire_rate`) are kept.
    pub fn reset(&mut self) {
        let x = PLAYFIELD_WIDTH / 2.0 - PLAYER_SIZE / 2.0;
        self.pos = Vec2::new(x, PLAYFIELD_HEIGHT - PLAYER_BOTTOM_OFFSET);
        self.target_x = x;
        self.hp = self.max_hp;
        // First shot lands on tick `fire_rate`
        self.fire_cooldown = self.fire_rate as i32 - 1;
        self.took_damage = false;
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(PLAYER_SIZE))
    }

    /// Muzzle position
    pub fn top_center(&self) -> Vec2 {
        Vec2::new(self.pos.x + PLAYER_SIZE / 2.0, self.pos.y)
    }
}

/// A player bullet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    /// Upward speed (pixels per tick)
    pub speed: f32,
    /// Fired under super shot: kills whatever it hits
    pub pierce: bool,
}

impl Bullet {
    /// Bullet centered horizontally on `muzzle`, bottom edge at the muzzle
    pub fn fired_from(muzzle: Vec2, pierce: bool) -> Self {
        Self {
            pos: Vec2::new(muzzle.x - BULLET_WIDTH / 2.0, muzzle.y - BULLET_HEIGHT),
            speed: BULLET_SPEED,
            pierce,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::new(BULLET_WIDTH, BULLET_HEIGHT))
    }
}

/// A descending enemy. The boss uses the same shape, only bigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub pos: Vec2,
    pub size: Vec2,
    pub hp: u32,
    pub max_hp: u32,
    /// Downward speed (pixels per tick)
    pub speed: f32,
}

impl Enemy {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, self.size)
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    pub fn is_dead(&self) -> bool {
        self.hp == 0
    }
}

/// The boss singleton shares the enemy layout
pub type Boss = Enemy;

/// A coin pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Coin {
    pub pos: Vec2,
    pub speed: f32,
}

impl Coin {
    /// Coin centered on `center`
    pub fn dropped_at(center: Vec2) -> Self {
        Self {
            pos: center - Vec2::splat(COIN_SIZE / 2.0),
            speed: COIN_SPEED,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(COIN_SIZE))
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Immune to enemy contact damage
    Invincible,
    /// Bullets fired while active one-shot their target
    SuperShot,
    /// Enemy kill rewards are doubled
    DoubleCoins,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 3] = [
        PowerUpKind::Invincible,
        PowerUpKind::SuperShot,
        PowerUpKind::DoubleCoins,
    ];

    /// Buff duration in ticks
    pub fn duration(&self, tuning: &Tuning) -> u32 {
        match self {
            PowerUpKind::Invincible => tuning.invincible_ticks,
            PowerUpKind::SuperShot => tuning.super_shot_ticks,
            PowerUpKind::DoubleCoins => tuning.double_coins_ticks,
        }
    }
}

/// A power-up capsule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub pos: Vec2,
    pub kind: PowerUpKind,
    pub speed: f32,
}

impl PowerUp {
    pub fn rect(&self) -> Rect {
        Rect::at(self.pos, Vec2::splat(POWERUP_SIZE))
    }
}

/// Cosmetic explosion ring
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
}

/// Background star (cosmetic)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub pos: Vec2,
    pub size: f32,
    pub speed: f32,
}

/// Things that happened during a tick, drained by the session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    BossSpawned { hp: u32 },
    EnemyDestroyed { reward: u32 },
    BossDestroyed { reward: u32 },
    PlayerHit { hp: u32 },
    CoinCollected,
    PowerUpCollected(PowerUpKind),
    /// Player ran out of hp; `score` is this run's total
    GameOver { score: u32 },
}

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: Tuning,
    /// Simulation tick counter (reset each run)
    pub time_ticks: u64,
    pub phase: GamePhase,
    /// Score this run
    pub score: u32,
    pub player: Player,
    pub bullets: Vec<Bullet>,
    pub enemies: Vec<Enemy>,
    /// At most one boss at a time
    pub boss: Option<Boss>,
    pub coins: Vec<Coin>,
    pub powerups: Vec<PowerUp>,
    pub explosions: Vec<Explosion>,
    pub bonuses: ActiveBonuses,
    pub stars: Vec<Star>,
    /// Events raised since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new state sitting on the menu
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let stars = (0..STAR_COUNT)
            .map(|_| Star {
                pos: Vec2::new(
                    rng.random::<f32>() * PLAYFIELD_WIDTH,
                    rng.random::<f32>() * PLAYFIELD_HEIGHT,
                ),
                size: rng.random::<f32>() * 2.0 + 1.0,
                speed: rng.random::<f32>() * 0.5 + 0.2,
            })
            .collect();

        let player = Player::new(&tuning);
        Self {
            seed,
            rng,
            tuning,
            time_ticks: 0,
            phase: GamePhase::Menu,
            score: 0,
            player,
            bullets: Vec::new(),
            enemies: Vec::new(),
            boss: None,
            coins: Vec::new(),
            powerups: Vec::new(),
            explosions: Vec::new(),
            bonuses: ActiveBonuses::default(),
            stars,
            events: Vec::new(),
        }
    }

    /// Begin a fresh run: clear every transient entity and refill hp
    pub fn start_run(&mut self) {
        self.bullets.clear();
        self.enemies.clear();
        self.coins.clear();
        self.powerups.clear();
        self.explosions.clear();
        self.events.clear();
        self.boss = None;
        self.bonuses = ActiveBonuses::default();
        self.score = 0;
        self.time_ticks = 0;
        self.player.reset();
        self.phase = GamePhase::Playing;
    }

    /// Current difficulty level, derived from score
    pub fn difficulty(&self) -> u32 {
        difficulty_level(self.score, self.tuning.points_per_level)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Take the events raised since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_level() {
        assert_eq!(difficulty_level(0, 20), 1);
        assert_eq!(difficulty_level(19, 20), 1);
        assert_eq!(difficulty_level(20, 20), 2);
        assert_eq!(difficulty_level(50, 20), 3);
    }

    #[test]
    fn test_start_run_resets_transients() {
        let mut state = GameState::new(7, Tuning::default());
        state.score = 42;
        state.player.max_hp = 5;
        state.player.hp = 1;
        state.bullets.push(Bullet::fired_from(Vec2::new(10.0, 10.0), false));
        state.boss = Some(Enemy {
            pos: Vec2::ZERO,
            size: Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
            hp: 80,
            max_hp: 80,
            speed: BOSS_SPEED,
        });
        state.phase = GamePhase::GameOver;

        state.start_run();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.score, 0);
        assert_eq!(state.player.hp, 5);
        assert!(state.bullets.is_empty());
        assert!(state.boss.is_none());
    }

    #[test]
    fn test_new_state_has_starfield() {
        let state = GameState::new(1, Tuning::default());
        assert_eq!(state.stars.len(), STAR_COUNT);
        assert!(state.stars.iter().all(|s| s.size >= 1.0 && s.size <= 3.0));
        assert_eq!(state.phase, GamePhase::Menu);
    }
}
