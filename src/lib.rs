//! Star Shooter - A vertical-scrolling arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, buffs, spawning)
//! - `economy`: Persistent currency and permanent upgrades
//! - `session`: Menu/shop/game-over state machine wrapping the simulation
//! - `platform`: Outbound purchase-request channel
//! - `persistence`: Key-value storage (LocalStorage on web)
//! - `tuning`: Data-driven game balance
//! - `ui`: Button layout and tap hit-testing

pub mod economy;
pub mod persistence;
pub mod platform;
pub mod session;
pub mod sim;
pub mod tuning;
pub mod ui;

pub use economy::{Economy, PurchaseError, UpgradeKind};
pub use session::{Session, Snapshot};
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Nominal frame rate the tick counts are tuned for
    pub const TICKS_PER_SECOND: u32 = 60;

    /// Logical playfield dimensions
    pub const PLAYFIELD_WIDTH: f32 = 360.0;
    pub const PLAYFIELD_HEIGHT: f32 = 640.0;

    /// Player ship
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Distance of the ship's top edge from the bottom of the playfield
    pub const PLAYER_BOTTOM_OFFSET: f32 = 90.0;

    /// Bullets
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 8.0;

    /// Regular enemies
    pub const ENEMY_SIZE: f32 = 40.0;
    pub const ENEMY_BASE_SPEED: f32 = 2.0;
    pub const ENEMY_SPEED_PER_LEVEL: f32 = 0.2;

    /// Boss
    pub const BOSS_WIDTH: f32 = 120.0;
    pub const BOSS_HEIGHT: f32 = 80.0;
    pub const BOSS_SPEED: f32 = 0.5;

    /// Coin pickups
    pub const COIN_SIZE: f32 = 14.0;
    pub const COIN_SPEED: f32 = 2.0;
    pub const COIN_SWAY: f32 = 0.5;

    /// Power-up capsules
    pub const POWERUP_SIZE: f32 = 24.0;
    pub const POWERUP_SPEED: f32 = 2.0;

    /// Explosions
    pub const EXPLOSION_GROWTH: f32 = 2.0;
    pub const EXPLOSION_MAX_RADIUS: f32 = 30.0;

    /// Background stars
    pub const STAR_COUNT: usize = 100;
}
