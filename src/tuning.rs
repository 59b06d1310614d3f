//! Data-driven game balance
//!
//! Every rule constant of the canonical rule set lives here so balance can
//! be overridden from JSON without touching simulation code.

use serde::{Deserialize, Serialize};

/// Price and cap for one permanent upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpgradeSpec {
    pub max_level: u32,
    pub price: u64,
}

/// Balance configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Spawning ===
    /// Per-tick enemy spawn chance (only while no boss is alive)
    pub enemy_spawn_chance: f64,
    /// Per-tick power-up spawn chance
    pub powerup_spawn_chance: f64,
    /// Boss appears whenever the score lands on a multiple of this
    pub boss_score_interval: u32,
    pub boss_base_hp: u32,
    pub boss_hp_per_level: u32,

    // === Difficulty ===
    /// Score needed per difficulty level
    pub points_per_level: u32,

    // === Rewards ===
    /// Inclusive range of score awarded per enemy kill
    pub enemy_reward_min: u32,
    pub enemy_reward_max: u32,
    pub boss_reward_base: u32,
    pub boss_reward_per_level: u32,
    /// Chance a destroyed enemy drops a coin pickup
    pub coin_drop_chance: f64,
    /// Score added when the player collects a coin
    pub coin_value: u32,

    // === Buff durations (ticks) ===
    pub invincible_ticks: u32,
    pub super_shot_ticks: u32,
    pub double_coins_ticks: u32,

    // === Player ===
    pub player_base_hp: u32,
    pub player_base_fire_rate: u32,
    pub min_fire_rate: u32,
    /// Fraction of the remaining distance to `target_x` covered each tick
    pub player_smoothing: f32,

    // === Shop ===
    pub fire_rate_upgrade: UpgradeSpec,
    pub hp_upgrade: UpgradeSpec,
    /// Stars requested for one real-currency max-HP purchase
    pub star_hp_price: u32,
    /// Apply the star purchase as soon as it is requested instead of
    /// waiting for a payment confirmation
    pub optimistic_star_purchase: bool,

    // === Lifecycle ===
    /// Drop enemies and the boss once they scroll below the playfield
    pub despawn_below_playfield: bool,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            enemy_spawn_chance: 0.03,
            powerup_spawn_chance: 0.005,
            boss_score_interval: 50,
            boss_base_hp: 50,
            boss_hp_per_level: 10,

            points_per_level: 20,

            enemy_reward_min: 3,
            enemy_reward_max: 5,
            boss_reward_base: 10,
            boss_reward_per_level: 2,
            coin_drop_chance: 0.7,
            coin_value: 1,

            // 4s / 1s / 6s at 60 Hz
            invincible_ticks: 240,
            super_shot_ticks: 60,
            double_coins_ticks: 360,

            player_base_hp: 3,
            player_base_fire_rate: 8,
            min_fire_rate: 2,
            player_smoothing: 0.15,

            fire_rate_upgrade: UpgradeSpec {
                max_level: 5,
                price: 50,
            },
            hp_upgrade: UpgradeSpec {
                max_level: 3,
                price: 100,
            },
            star_hp_price: 50,
            optimistic_star_purchase: true,

            despawn_below_playfield: true,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Tuning with every random spawn disabled (bosses still trigger on score)
    pub fn without_random_spawns() -> Self {
        Self {
            enemy_spawn_chance: 0.0,
            powerup_spawn_chance: 0.0,
            ..Self::default()
        }
    }
}
