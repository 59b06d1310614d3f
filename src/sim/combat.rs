//! Combat resolution and pickup collection
//!
//! Hits are applied in a marking pass and the dead are compacted out
//! afterwards, so a removal never shifts an entity past the scan.

use glam::Vec2;
use rand::Rng;

use super::state::{Coin, Enemy, Explosion, GameEvent, GamePhase, GameState, PowerUpKind};

/// Apply one bullet hit. A piercing bullet kills outright.
fn apply_hit(target: &mut Enemy, pierce: bool) {
    if pierce {
        target.hp = 0;
    } else {
        target.hp = target.hp.saturating_sub(1);
    }
}

/// Bullets against enemies and the boss.
///
/// Each bullet is consumed by the first live target it overlaps (enemies in
/// spawn order, then the boss) and can never hit a second one.
pub fn resolve_bullet_hits(state: &mut GameState) {
    let enemies = &mut state.enemies;
    let boss = &mut state.boss;

    state.bullets.retain(|bullet| {
        let rect = bullet.rect();
        if let Some(enemy) = enemies
            .iter_mut()
            .find(|e| !e.is_dead() && e.rect().overlaps(&rect))
        {
            apply_hit(enemy, bullet.pierce);
            return false;
        }
        if let Some(boss) = boss
            .as_mut()
            .filter(|b| !b.is_dead() && b.rect().overlaps(&rect))
        {
            apply_hit(boss, bullet.pierce);
            return false;
        }
        true
    });

    collect_destroyed_enemies(state);
    collect_destroyed_boss(state);
}

/// Remove dead enemies, paying out score and maybe dropping a coin
fn collect_destroyed_enemies(state: &mut GameState) {
    let mut destroyed: Vec<Vec2> = Vec::new();
    state.enemies.retain(|enemy| {
        if enemy.is_dead() {
            destroyed.push(enemy.center());
            false
        } else {
            true
        }
    });

    let tuning = &state.tuning;
    let lo = tuning.enemy_reward_min.min(tuning.enemy_reward_max);
    let hi = tuning.enemy_reward_min.max(tuning.enemy_reward_max);

    for center in destroyed {
        let mut reward = state.rng.random_range(lo..=hi);
        if state.bonuses.is_active(PowerUpKind::DoubleCoins) {
            reward *= 2;
        }
        state.score = state.score.saturating_add(reward);
        state.explosions.push(Explosion {
            center,
            radius: 0.0,
        });
        if state.rng.random::<f64>() < state.tuning.coin_drop_chance {
            state.coins.push(Coin::dropped_at(center));
        }
        state.events.push(GameEvent::EnemyDestroyed { reward });
    }
}

fn collect_destroyed_boss(state: &mut GameState) {
    let Some(boss) = state.boss.take_if(|b| b.is_dead()) else {
        return;
    };

    let reward =
        state.tuning.boss_reward_base + state.tuning.boss_reward_per_level * state.difficulty();
    state.score = state.score.saturating_add(reward);
    state.explosions.push(Explosion {
        center: boss.center(),
        radius: 0.0,
    });
    state.events.push(GameEvent::BossDestroyed { reward });
    log::info!("Boss destroyed (+{}), score {}", reward, state.score);
}

/// Enemies ramming the ship. The boss never does contact damage.
pub fn resolve_player_contact(state: &mut GameState) {
    if state.bonuses.is_active(PowerUpKind::Invincible) {
        return;
    }

    let player_rect = state.player.rect();
    let before = state.enemies.len();
    state
        .enemies
        .retain(|enemy| !enemy.rect().overlaps(&player_rect));
    let hits = (before - state.enemies.len()) as u32;
    if hits == 0 {
        return;
    }

    let player = &mut state.player;
    player.hp = player.hp.saturating_sub(hits);
    player.took_damage = true;
    state.events.push(GameEvent::PlayerHit { hp: player.hp });

    if player.hp == 0 && state.phase != GamePhase::GameOver {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver { score: state.score });
        log::info!("Game over with score {}", state.score);
    }
}

/// Coins and power-ups touching the ship are picked up
pub fn collect_pickups(state: &mut GameState) {
    let player_rect = state.player.rect();

    let before = state.coins.len();
    state.coins.retain(|coin| !coin.rect().overlaps(&player_rect));
    for _ in state.coins.len()..before {
        state.score = state.score.saturating_add(state.tuning.coin_value);
        state.events.push(GameEvent::CoinCollected);
    }

    let mut picked: Vec<PowerUpKind> = Vec::new();
    state.powerups.retain(|powerup| {
        if powerup.rect().overlaps(&player_rect) {
            picked.push(powerup.kind);
            false
        } else {
            true
        }
    });
    for kind in picked {
        state.bonuses.activate(kind, kind.duration(&state.tuning));
        state.events.push(GameEvent::PowerUpCollected(kind));
        log::debug!("Power-up collected: {:?}", kind);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::sim::state::{Bullet, PowerUp};
    use crate::tuning::Tuning;

    fn playing_state() -> GameState {
        let mut state = GameState::new(21, Tuning::without_random_spawns());
        state.start_run();
        state
    }

    fn enemy_at(x: f32, y: f32, hp: u32) -> Enemy {
        Enemy {
            pos: Vec2::new(x, y),
            size: Vec2::splat(ENEMY_SIZE),
            hp,
            max_hp: hp,
            speed: 2.0,
        }
    }

    fn bullet_into(enemy: &Enemy, pierce: bool) -> Bullet {
        Bullet::fired_from(enemy.center() + Vec2::new(0.0, 5.0), pierce)
    }

    #[test]
    fn test_single_hit_decrements() {
        let mut state = playing_state();
        let enemy = enemy_at(100.0, 100.0, 2);
        state.bullets.push(bullet_into(&enemy, false));
        state.enemies.push(enemy);

        resolve_bullet_hits(&mut state);

        assert!(state.bullets.is_empty());
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].hp, 1);
        assert_eq!(state.score, 0);
        assert!(state.explosions.is_empty());
    }

    #[test]
    fn test_pierce_one_shots_and_is_consumed() {
        let mut state = playing_state();
        let enemy = enemy_at(100.0, 100.0, 9);
        state.bullets.push(bullet_into(&enemy, true));
        state.enemies.push(enemy);

        resolve_bullet_hits(&mut state);

        assert!(state.enemies.is_empty());
        assert!(state.bullets.is_empty());
        assert!((3..=5).contains(&state.score));
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_bullet_hits_only_one_of_two_overlapping_targets() {
        let mut state = playing_state();
        let first = enemy_at(100.0, 100.0, 3);
        let second = enemy_at(100.0, 100.0, 3);
        state.bullets.push(bullet_into(&first, false));
        state.enemies.push(first);
        state.enemies.push(second);

        resolve_bullet_hits(&mut state);

        let total_hp: u32 = state.enemies.iter().map(|e| e.hp).sum();
        assert_eq!(total_hp, 5);
        assert!(state.bullets.is_empty());
    }

    #[test]
    fn test_second_bullet_skips_already_killed_enemy() {
        let mut state = playing_state();
        let dying = enemy_at(100.0, 100.0, 1);
        let behind = enemy_at(100.0, 100.0, 3);
        state.bullets.push(bullet_into(&dying, false));
        state.bullets.push(bullet_into(&dying, false));
        state.enemies.push(dying);
        state.enemies.push(behind);

        resolve_bullet_hits(&mut state);

        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.enemies[0].hp, 2);
    }

    #[test]
    fn test_double_coins_doubles_reward() {
        let mut state = playing_state();
        state.bonuses.activate(PowerUpKind::DoubleCoins, 360);
        let enemy = enemy_at(100.0, 100.0, 1);
        state.bullets.push(bullet_into(&enemy, false));
        state.enemies.push(enemy);

        resolve_bullet_hits(&mut state);

        assert!((6..=10).contains(&state.score));
        assert_eq!(state.score % 2, 0);
    }

    #[test]
    fn test_boss_kill_awards_fixed_bonus_without_coin() {
        let mut state = playing_state();
        state.score = 50; // level 3
        let boss = Enemy {
            pos: Vec2::new(120.0, 50.0),
            size: Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
            hp: 1,
            max_hp: 80,
            speed: BOSS_SPEED,
        };
        state.bullets.push(bullet_into(&boss, false));
        state.boss = Some(boss);

        resolve_bullet_hits(&mut state);

        assert!(state.boss.is_none());
        assert_eq!(state.score, 50 + 16);
        assert!(state.coins.is_empty());
        assert_eq!(state.explosions.len(), 1);
    }

    #[test]
    fn test_contact_damages_player() {
        let mut state = playing_state();
        let pos = state.player.pos;
        state.enemies.push(enemy_at(pos.x, pos.y, 3));

        resolve_player_contact(&mut state);

        assert!(state.enemies.is_empty());
        assert_eq!(state.player.hp, state.player.max_hp - 1);
        assert!(state.player.took_damage);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_last_hit_ends_the_run() {
        let mut state = playing_state();
        state.player.hp = 1;
        state.score = 17;
        let pos = state.player.pos;
        state.enemies.push(enemy_at(pos.x, pos.y, 3));

        resolve_player_contact(&mut state);

        assert_eq!(state.player.hp, 0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.events.contains(&GameEvent::GameOver { score: 17 }));
    }

    #[test]
    fn test_boss_contact_is_harmless() {
        let mut state = playing_state();
        let pos = state.player.pos;
        state.boss = Some(Enemy {
            pos,
            size: Vec2::new(BOSS_WIDTH, BOSS_HEIGHT),
            hp: 80,
            max_hp: 80,
            speed: BOSS_SPEED,
        });
        resolve_player_contact(&mut state);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert!(state.boss.is_some());
    }

    #[test]
    fn test_pickups() {
        let mut state = playing_state();
        let center = state.player.rect().center();
        state.coins.push(Coin::dropped_at(center));
        state.powerups.push(PowerUp {
            pos: center,
            kind: PowerUpKind::SuperShot,
            speed: POWERUP_SPEED,
        });

        collect_pickups(&mut state);

        assert!(state.coins.is_empty());
        assert!(state.powerups.is_empty());
        assert_eq!(state.score, 1);
        assert!(state.bonuses.is_active(PowerUpKind::SuperShot));
        assert_eq!(state.bonuses.super_shot.ticks_remaining, 60);
    }
}
