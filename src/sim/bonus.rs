//! Timed buffs picked up from power-up capsules

use serde::{Deserialize, Serialize};

use super::state::PowerUpKind;

/// One buff slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bonus {
    pub active: bool,
    pub ticks_remaining: u32,
}

impl Bonus {
    /// (Re)start the buff; picking up a running buff refreshes its timer
    pub fn activate(&mut self, ticks: u32) {
        self.active = ticks > 0;
        self.ticks_remaining = ticks;
    }

    /// Advance one tick, deactivating at zero
    pub fn tick(&mut self) {
        if !self.active {
            return;
        }
        self.ticks_remaining = self.ticks_remaining.saturating_sub(1);
        if self.ticks_remaining == 0 {
            self.active = false;
        }
    }
}

/// Active power-up effects
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveBonuses {
    pub invincible: Bonus,
    pub super_shot: Bonus,
    pub double_coins: Bonus,
}

impl ActiveBonuses {
    pub fn get(&self, kind: PowerUpKind) -> &Bonus {
        match kind {
            PowerUpKind::Invincible => &self.invincible,
            PowerUpKind::SuperShot => &self.super_shot,
            PowerUpKind::DoubleCoins => &self.double_coins,
        }
    }

    pub fn get_mut(&mut self, kind: PowerUpKind) -> &mut Bonus {
        match kind {
            PowerUpKind::Invincible => &mut self.invincible,
            PowerUpKind::SuperShot => &mut self.super_shot,
            PowerUpKind::DoubleCoins => &mut self.double_coins,
        }
    }

    pub fn is_active(&self, kind: PowerUpKind) -> bool {
        self.get(kind).active
    }

    pub fn activate(&mut self, kind: PowerUpKind, ticks: u32) {
        self.get_mut(kind).activate(ticks);
    }

    /// Count every buff down by one tick
    pub fn tick(&mut self) {
        for kind in PowerUpKind::ALL {
            self.get_mut(kind).tick();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bonus_expires() {
        let mut bonuses = ActiveBonuses::default();
        bonuses.activate(PowerUpKind::SuperShot, 2);
        assert!(bonuses.is_active(PowerUpKind::SuperShot));

        bonuses.tick();
        assert!(bonuses.is_active(PowerUpKind::SuperShot));
        assert_eq!(bonuses.super_shot.ticks_remaining, 1);

        bonuses.tick();
        assert!(!bonuses.is_active(PowerUpKind::SuperShot));
        assert_eq!(bonuses.super_shot.ticks_remaining, 0);

        // Inactive buffs stay put
        bonuses.tick();
        assert_eq!(bonuses.super_shot.ticks_remaining, 0);
    }

    #[test]
    fn test_pickup_refreshes_timer() {
        let mut bonuses = ActiveBonuses::default();
        bonuses.activate(PowerUpKind::Invincible, 240);
        for _ in 0..100 {
            bonuses.tick();
        }
        bonuses.activate(PowerUpKind::Invincible, 240);
        assert_eq!(bonuses.invincible.ticks_remaining, 240);
    }

    #[test]
    fn test_buffs_are_independent() {
        let mut bonuses = ActiveBonuses::default();
        bonuses.activate(PowerUpKind::DoubleCoins, 360);
        bonuses.tick();
        assert!(bonuses.is_active(PowerUpKind::DoubleCoins));
        assert!(!bonuses.is_active(PowerUpKind::Invincible));
        assert!(!bonuses.is_active(PowerUpKind::SuperShot));
    }
}
