//! Probabilistic per-tick spawning of enemies, power-ups and the boss

use glam::Vec2;
use rand::Rng;

use super::state::{Boss, Enemy, GameEvent, GameState, PowerUp, PowerUpKind};
use crate::consts::*;

/// Run every spawner once
pub fn spawn_all(state: &mut GameState) {
    spawn_boss(state);
    spawn_enemy(state);
    spawn_powerup(state);
}

/// Spawn the boss when the score sits on a boss threshold and none is alive.
///
/// The absence check keeps the score condition from re-triggering every
/// tick while the score stays on the threshold.
pub fn spawn_boss(state: &mut GameState) {
    let interval = state.tuning.boss_score_interval;
    if state.boss.is_some() || state.score == 0 || interval == 0 {
        return;
    }
    if !state.score.is_multiple_of(interval) {
        return;
    }

    let level = state.difficulty();
    let hp = state.tuning.boss_base_hp + state.tuning.boss_hp_per_level * level;
    state.boss = Some(Boss {
        pos: Vec2::new((PLAYFIELD_WIDTH - BOSS_WIDTH) / 2.0, -BOSS_HEIGHT),
        size: Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
        hp,
        max_hp: hp,
        speed: BOSS_SPEED,
    });
    state.events.push(GameEvent::BossSpawned { hp });
    log::info!("Boss spawned at score {} (level {}, hp {})", state.score, level, hp);
}

/// Roll for a regular enemy; suppressed while the boss is alive
pub fn spawn_enemy(state: &mut GameState) {
    if state.boss.is_some() {
        return;
    }
    if state.rng.random::<f64>() >= state.tuning.enemy_spawn_chance {
        return;
    }

    let level = state.difficulty();
    let hp = state.rng.random_range(2..=3) * level;
    let x = state.rng.random::<f32>() * (PLAYFIELD_WIDTH - ENEMY_SIZE);
    state.enemies.push(Enemy {
        pos: Vec2::new(x, -ENEMY_SIZE),
        size: Vec2::splat(ENEMY_SIZE),
        hp,
        max_hp: hp,
        speed: ENEMY_BASE_SPEED + ENEMY_SPEED_PER_LEVEL * level as f32,
    });
}

/// Roll for a power-up capsule of a uniformly chosen kind
pub fn spawn_powerup(state: &mut GameState) {
    if state.rng.random::<f64>() >= state.tuning.powerup_spawn_chance {
        return;
    }

    let kind = PowerUpKind::ALL[state.rng.random_range(0..PowerUpKind::ALL.len())];
    let x = state.rng.random::<f32>() * (PLAYFIELD_WIDTH - POWERUP_SIZE);
    state.powerups.push(PowerUp {
        pos: Vec2::new(x, -POWERUP_SIZE),
        kind,
        speed: POWERUP_SPEED,
    });
}
