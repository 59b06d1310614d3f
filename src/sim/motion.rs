//! Per-tick movement and lifecycle for every entity kind
//!
//! Each pass moves its entities and drops the ones that left the playfield
//! (or expired) with a single `retain_mut`, so no entity is ever skipped or
//! visited twice.

use rand::Rng;

use super::state::GameState;
use crate::consts::*;

/// Ease the ship toward `target_x`, then clamp it into the playfield
pub fn move_player(state: &mut GameState) {
    let player = &mut state.player;
    player.pos.x += (player.target_x - player.pos.x) * player.smoothing;
    player.pos.x = player.pos.x.clamp(0.0, PLAYFIELD_WIDTH - PLAYER_SIZE);
}

/// Bullets already above the top edge are dropped; the rest fly up
pub fn move_bullets(state: &mut GameState) {
    state.bullets.retain_mut(|bullet| {
        if bullet.pos.y < 0.0 {
            return false;
        }
        bullet.pos.y -= bullet.speed;
        true
    });
}

/// Enemies and the boss descend at their own speed
pub fn move_enemies(state: &mut GameState) {
    let despawn = state.tuning.despawn_below_playfield;

    state.enemies.retain_mut(|enemy| {
        enemy.pos.y += enemy.speed;
        !(despawn && enemy.pos.y > PLAYFIELD_HEIGHT)
    });

    if let Some(boss) = state.boss.as_mut() {
        boss.pos.y += boss.speed;
        if despawn && boss.pos.y > PLAYFIELD_HEIGHT {
            log::debug!("Boss left the playfield");
            state.boss = None;
        }
    }
}

/// Coins fall with a sideways sway keyed on time and their own height
pub fn move_coins(state: &mut GameState) {
    let t = state.time_ticks as f32;
    state.coins.retain_mut(|coin| {
        coin.pos.x += (t * 0.05 + coin.pos.y * 0.02).sin() * COIN_SWAY;
        coin.pos.y += coin.speed;
        coin.pos.y <= PLAYFIELD_HEIGHT
    });
}

pub fn move_powerups(state: &mut GameState) {
    state.powerups.retain_mut(|powerup| {
        powerup.pos.y += powerup.speed;
        powerup.pos.y <= PLAYFIELD_HEIGHT
    });
}

/// Grow explosion rings; a ring past the cap is removed
pub fn age_explosions(state: &mut GameState) {
    state.explosions.retain_mut(|explosion| {
        explosion.radius += EXPLOSION_GROWTH;
        explosion.radius <= EXPLOSION_MAX_RADIUS
    });
}

/// Scroll the starfield, wrapping stars to the top at a random x
pub fn update_stars(state: &mut GameState) {
    for star in &mut state.stars {
        star.pos.y += star.speed;
        if star.pos.y > PLAYFIELD_HEIGHT {
            star.pos.y = 0.0;
            star.pos.x = state.rng.random::<f32>() * PLAYFIELD_WIDTH;
        }
    }
}
