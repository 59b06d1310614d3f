//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One call to [`tick`] per rendered frame
//! - Seeded RNG only
//! - Removal is mark-and-compact, never splice-while-iterating
//! - No rendering, storage or platform dependencies

pub mod bonus;
pub mod collision;
pub mod combat;
pub mod motion;
pub mod spawn;
pub mod state;
pub mod tick;

pub use bonus::{ActiveBonuses, Bonus};
pub use collision::Rect;
pub use state::{
    Boss, Bullet, Coin, Enemy, Explosion, GameEvent, GamePhase, GameState, Player,
    PowerUp, PowerUpKind, Star, difficulty_level,
};
pub use tick::{TickInput, tick};
