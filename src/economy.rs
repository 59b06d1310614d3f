//! Persistent currency and permanent upgrades
//!
//! Saved coins accumulate across runs (each run's score is paid out on game
//! over) and buy permanent upgrades in the shop. Every mutation is written
//! to the store right away.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::persistence::{KeyValueStore, keys, store_int};
use crate::sim::Player;
use crate::tuning::{Tuning, UpgradeSpec};

/// Cap on star-bought max hp
pub const MAX_STAR_HP: u32 = 999;

/// Shop upgrade kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UpgradeKind {
    /// One tick less between shots (floor applies)
    FireRate,
    /// +1 max hp
    Hp,
}

impl UpgradeKind {
    /// Shop order
    pub const ALL: [UpgradeKind; 2] = [UpgradeKind::FireRate, UpgradeKind::Hp];

    pub fn as_str(&self) -> &'static str {
        match self {
            UpgradeKind::FireRate => "FIRERATE",
            UpgradeKind::Hp => "HP",
        }
    }

    fn storage_key(&self) -> &'static str {
        match self {
            UpgradeKind::FireRate => keys::UPGRADE_FIRE_RATE,
            UpgradeKind::Hp => keys::UPGRADE_HP,
        }
    }
}

/// Why a shop purchase was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PurchaseError {
    #[error("{0:?} is already at max level")]
    MaxLevel(UpgradeKind),
    #[error("insufficient funds: price {price}, have {available}")]
    InsufficientFunds { price: u64, available: u64 },
}

/// One upgrade track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub level: u32,
    pub max_level: u32,
    pub price: u64,
}

impl Upgrade {
    fn from_spec(spec: UpgradeSpec) -> Self {
        Self {
            level: 0,
            max_level: spec.max_level,
            price: spec.price,
        }
    }

    pub fn is_maxed(&self) -> bool {
        self.level >= self.max_level
    }
}

/// Both upgrade tracks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrades {
    pub fire_rate: Upgrade,
    pub hp: Upgrade,
}

impl Upgrades {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            fire_rate: Upgrade::from_spec(tuning.fire_rate_upgrade),
            hp: Upgrade::from_spec(tuning.hp_upgrade),
        }
    }

    pub fn get(&self, kind: UpgradeKind) -> &Upgrade {
        match kind {
            UpgradeKind::FireRate => &self.fire_rate,
            UpgradeKind::Hp => &self.hp,
        }
    }

    pub fn get_mut(&mut self, kind: UpgradeKind) -> &mut Upgrade {
        match kind {
            UpgradeKind::FireRate => &mut self.fire_rate,
            UpgradeKind::Hp => &mut self.hp,
        }
    }
}

/// Saved currency plus everything it has bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Economy {
    pub saved_coins: u64,
    pub upgrades: Upgrades,
    /// Max-hp bought with stars (real currency), outside the shop levels
    pub star_hp: u32,
}

impl Economy {
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            saved_coins: 0,
            upgrades: Upgrades::new(tuning),
            star_hp: 0,
        }
    }

    /// Read saved state. Missing, garbage or negative values count as zero
    /// and levels are capped at their maximum.
    pub fn load(store: &dyn KeyValueStore, tuning: &Tuning) -> Self {
        let read = |key: &str| -> u64 {
            match store.get_int(key) {
                Some(v) => v.max(0) as u64,
                None => {
                    log::debug!("No saved value for {}, using 0", key);
                    0
                }
            }
        };

        let mut economy = Self::new(tuning);
        economy.saved_coins = read(keys::COINS);
        for kind in UpgradeKind::ALL {
            let upgrade = economy.upgrades.get_mut(kind);
            upgrade.level = read(kind.storage_key()).min(upgrade.max_level as u64) as u32;
        }
        economy.star_hp = read(keys::STAR_HP).min(MAX_STAR_HP as u64) as u32;

        log::info!(
            "Loaded economy: {} coins, fire rate lvl {}, hp lvl {}",
            economy.saved_coins,
            economy.upgrades.fire_rate.level,
            economy.upgrades.hp.level
        );
        economy
    }

    /// Write every value
    pub fn save(&self, store: &mut dyn KeyValueStore) {
        store_int(store, keys::COINS, self.saved_coins as i64);
        for kind in UpgradeKind::ALL {
            store_int(store, kind.storage_key(), self.upgrades.get(kind).level as i64);
        }
        store_int(store, keys::STAR_HP, self.star_hp as i64);
    }

    /// Set the ship's permanent stats from the purchased levels
    pub fn apply_to_player(&self, player: &mut Player, tuning: &Tuning) {
        player.fire_rate = tuning
            .player_base_fire_rate
            .saturating_sub(self.upgrades.fire_rate.level)
            .max(tuning.min_fire_rate);
        player.max_hp = tuning
            .player_base_hp
            .saturating_add(self.upgrades.hp.level)
            .saturating_add(self.star_hp);
        player.hp = player.hp.min(player.max_hp);
    }

    /// Whether a purchase of `kind` would go through right now
    pub fn can_buy(&self, kind: UpgradeKind) -> bool {
        self.check(kind).is_ok()
    }

    fn check(&self, kind: UpgradeKind) -> Result<(), PurchaseError> {
        let upgrade = self.upgrades.get(kind);
        if upgrade.is_maxed() {
            return Err(PurchaseError::MaxLevel(kind));
        }
        if self.saved_coins < upgrade.price {
            return Err(PurchaseError::InsufficientFunds {
                price: upgrade.price,
                available: self.saved_coins,
            });
        }
        Ok(())
    }

    /// Buy one level of `kind`.
    ///
    /// On refusal nothing changes: coins, levels and ship stats stay as
    /// they were. Current hp is never raised by the hp upgrade.
    pub fn purchase(
        &mut self,
        kind: UpgradeKind,
        player: &mut Player,
        tuning: &Tuning,
        store: &mut dyn KeyValueStore,
    ) -> Result<(), PurchaseError> {
        self.check(kind)?;

        let upgrade = self.upgrades.get_mut(kind);
        self.saved_coins -= upgrade.price;
        upgrade.level += 1;
        let level = upgrade.level;

        match kind {
            UpgradeKind::FireRate => {
                player.fire_rate = player
                    .fire_rate
                    .saturating_sub(1)
                    .max(tuning.min_fire_rate);
            }
            UpgradeKind::Hp => player.max_hp = player.max_hp.saturating_add(1),
        }

        store_int(store, keys::COINS, self.saved_coins as i64);
        store_int(store, kind.storage_key(), level as i64);
        log::info!(
            "Bought {} level {}, {} coins left",
            kind.as_str(),
            level,
            self.saved_coins
        );
        Ok(())
    }

    /// Fold a finished run's score into the saved coins
    pub fn payout(&mut self, score: u32, store: &mut dyn KeyValueStore) {
        self.saved_coins = self.saved_coins.saturating_add(score as u64);
        store_int(store, keys::COINS, self.saved_coins as i64);
        log::info!("Run paid out {} coins, total {}", score, self.saved_coins);
    }

    /// Grant one star-bought max hp, up to [`MAX_STAR_HP`]
    pub fn grant_star_hp(&mut self, player: &mut Player, store: &mut dyn KeyValueStore) {
        if self.star_hp >= MAX_STAR_HP {
            log::warn!("Star hp already at {}, nothing granted", MAX_STAR_HP);
            return;
        }
        self.star_hp += 1;
        player.max_hp = player.max_hp.saturating_add(1);
        store_int(store, keys::STAR_HP, self.star_hp as i64);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    fn setup(coins: u64) -> (Economy, Player, Tuning, MemoryStore) {
        let tuning = Tuning::default();
        let mut economy = Economy::new(&tuning);
        economy.saved_coins = coins;
        let player = Player::new(&tuning);
        (economy, player, tuning, MemoryStore::new())
    }

    #[test]
    fn test_hp_purchase() {
        let (mut economy, mut player, tuning, mut store) = setup(150);
        player.hp = 2;

        economy
            .purchase(UpgradeKind::Hp, &mut player, &tuning, &mut store)
            .expect("affordable");

        assert_eq!(player.max_hp, 4);
        assert_eq!(player.hp, 2);
        assert_eq!(economy.saved_coins, 50);
        assert_eq!(economy.upgrades.hp.level, 1);
        assert_eq!(store.get_int(keys::COINS), Some(50));
        assert_eq!(store.get_int(keys::UPGRADE_HP), Some(1));
    }

    #[test]
    fn test_insufficient_funds_is_noop() {
        let (mut economy, mut player, tuning, mut store) = setup(99);
        let before = (economy.clone(), player.max_hp, player.fire_rate);

        let result = economy.purchase(UpgradeKind::Hp, &mut player, &tuning, &mut store);

        assert_eq!(
            result,
            Err(PurchaseError::InsufficientFunds {
                price: 100,
                available: 99
            })
        );
        assert_eq!((economy, player.max_hp, player.fire_rate), before);
        assert_eq!(store.get_int(keys::COINS), None);
    }

    #[test]
    fn test_fire_rate_floor_and_max_level() {
        let tuning = Tuning {
            fire_rate_upgrade: UpgradeSpec {
                max_level: 10,
                price: 1,
            },
            ..Tuning::default()
        };
        let mut economy = Economy::new(&tuning);
        economy.saved_coins = 100;
        let mut player = Player::new(&tuning);
        let mut store = MemoryStore::new();

        for _ in 0..10 {
            economy
                .purchase(UpgradeKind::FireRate, &mut player, &tuning, &mut store)
                .expect("affordable");
        }
        assert_eq!(player.fire_rate, 2);
        assert_eq!(economy.upgrades.fire_rate.level, 10);

        let result = economy.purchase(UpgradeKind::FireRate, &mut player, &tuning, &mut store);
        assert_eq!(result, Err(PurchaseError::MaxLevel(UpgradeKind::FireRate)));
        assert_eq!(economy.saved_coins, 90);
    }

    #[test]
    fn test_payout() {
        let (mut economy, _, _, mut store) = setup(5);
        economy.payout(17, &mut store);
        assert_eq!(economy.saved_coins, 22);
        assert_eq!(store.get_int(keys::COINS), Some(22));
    }

    #[test]
    fn test_load_defaults_and_clamps() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        store.set_item(keys::COINS, "abc").expect("memory write");
        store.set_int(keys::UPGRADE_HP, 99).expect("memory write");
        store.set_int(keys::UPGRADE_FIRE_RATE, -4).expect("memory write");

        let economy = Economy::load(&store, &tuning);

        assert_eq!(economy.saved_coins, 0);
        assert_eq!(economy.upgrades.hp.level, 3);
        assert_eq!(economy.upgrades.fire_rate.level, 0);
    }

    #[test]
    fn test_load_clamps_oversized_values() {
        let tuning = Tuning::default();
        let mut store = MemoryStore::new();
        store.set_item(keys::STAR_HP, "4294967295").expect("memory write");
        store.set_int(keys::UPGRADE_HP, (1i64 << 32) + 1).expect("memory write");
        store.set_int(keys::UPGRADE_FIRE_RATE, i64::MAX).expect("memory write");

        let economy = Economy::load(&store, &tuning);
        assert_eq!(economy.star_hp, MAX_STAR_HP);
        assert_eq!(economy.upgrades.hp.level, 3);
        assert_eq!(economy.upgrades.fire_rate.level, 5);

        let mut player = Player::new(&tuning);
        economy.apply_to_player(&mut player, &tuning);
        assert_eq!(player.max_hp, 3 + 3 + MAX_STAR_HP);
        assert_eq!(player.fire_rate, 3);

        let mut economy = economy;
        economy.grant_star_hp(&mut player, &mut store);
        assert_eq!(economy.star_hp, MAX_STAR_HP);
        assert_eq!(player.max_hp, 3 + 3 + MAX_STAR_HP);
    }

    #[test]
    fn test_save_load_reapplies_stats() {
        let (mut economy, mut player, tuning, mut store) = setup(500);
        economy
            .purchase(UpgradeKind::FireRate, &mut player, &tuning, &mut store)
            .expect("affordable");
        economy
            .purchase(UpgradeKind::Hp, &mut player, &tuning, &mut store)
            .expect("affordable");
        economy.grant_star_hp(&mut player, &mut store);

        let loaded = Economy::load(&store, &tuning);
        let mut fresh = Player::new(&tuning);
        loaded.apply_to_player(&mut fresh, &tuning);

        assert_eq!(loaded, economy);
        assert_eq!(fresh.fire_rate, player.fire_rate);
        assert_eq!(fresh.max_hp, player.max_hp);
        assert_eq!(fresh.max_hp, 5);
    }
}
