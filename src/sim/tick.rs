//! Per-frame simulation tick
//!
//! Core game loop that advances the simulation deterministically.

use super::state::{Bullet, GamePhase, GameState, PowerUpKind};
use super::{combat, motion, spawn};

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired ship x (from pointer/touch position)
    pub target_x: Option<f32>,
}

/// Advance the game state by one frame.
///
/// Does nothing outside of [`GamePhase::Playing`]. Within a tick everything
/// moves before any collision is checked, so a bullet fired this tick is
/// always moved once before it can hit anything.
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase != GamePhase::Playing {
        return;
    }

    // The hit flag is only shown for one frame
    state.player.took_damage = false;

    if let Some(x) = input.target_x {
        state.player.target_x = x;
    }

    state.time_ticks += 1;

    motion::update_stars(state);
    state.bonuses.tick();

    motion::move_player(state);
    auto_fire(state);
    motion::move_bullets(state);

    spawn::spawn_all(state);

    motion::move_enemies(state);
    motion::move_coins(state);
    motion::move_powerups(state);

    combat::resolve_bullet_hits(state);
    combat::resolve_player_contact(state);
    if state.phase == GamePhase::GameOver {
        return;
    }
    combat::collect_pickups(state);

    motion::age_explosions(state);
}

/// Count down the fire cooldown and shoot when it runs out
pub fn auto_fire(state: &mut GameState) {
    let player = &mut state.player;
    player.fire_cooldown -= 1;
    if player.fire_cooldown >= 0 {
        return;
    }

    let pierce = state.bonuses.is_active(PowerUpKind::SuperShot);
    state
        .bullets
        .push(Bullet::fired_from(player.top_center(), pierce));
    player.fire_cooldown = player.fire_rate as i32;
}
