//! Game session: the state machine around the simulation
//!
//! `Menu <-> Shop`, `Menu -> Playing -> GameOver -> Menu`. The session
//! owns the simulation state, the economy, the store and the purchase
//! channel, turns taps into actions, runs one tick per frame while playing
//! and pays out the run's score when it ends.

use serde::Serialize;

use crate::consts::PLAYER_SIZE;
use crate::economy::{Economy, PurchaseError, UpgradeKind};
use crate::persistence::KeyValueStore;
use crate::platform::{ChannelError, PurchaseChannel, PurchaseRequest};
use crate::sim::{
    ActiveBonuses, Boss, Bullet, Coin, Enemy, Explosion, GameEvent, GamePhase, GameState, Player,
    PowerUp, Star, TickInput, tick,
};
use crate::tuning::Tuning;
use crate::ui::{self, UiAction};

/// One shop row as the presentation layer shows it
#[derive(Debug, Clone, Serialize)]
pub struct ShopEntry {
    pub kind: UpgradeKind,
    pub level: u32,
    pub max_level: u32,
    pub price: u64,
    /// Enough coins and not maxed
    pub available: bool,
}

/// Read-only view of everything the presentation layer draws
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    pub phase: GamePhase,
    pub player: &'a Player,
    pub bullets: &'a [Bullet],
    pub enemies: &'a [Enemy],
    pub boss: Option<&'a Boss>,
    pub coins: &'a [Coin],
    pub powerups: &'a [PowerUp],
    pub explosions: &'a [Explosion],
    pub stars: &'a [Star],
    pub bonuses: &'a ActiveBonuses,
    pub score: u32,
    pub level: u32,
    pub saved_coins: u64,
    pub took_damage: bool,
    pub shop: Vec<ShopEntry>,
}

pub struct Session {
    state: GameState,
    economy: Economy,
    store: Box<dyn KeyValueStore>,
    channel: Box<dyn PurchaseChannel>,
    input: TickInput,
    /// Star purchases requested but not yet confirmed
    pending_star_purchases: u32,
}

impl Session {
    /// Load saved progress from `store` and sit on the menu
    pub fn new(
        seed: u64,
        tuning: Tuning,
        store: Box<dyn KeyValueStore>,
        channel: Box<dyn PurchaseChannel>,
    ) -> Self {
        let economy = Economy::load(store.as_ref(), &tuning);
        let mut state = GameState::new(seed, tuning);
        economy.apply_to_player(&mut state.player, &state.tuning);
        state.player.hp = state.player.max_hp;
        log::info!("Session started (seed {})", seed);

        Self {
            state,
            economy,
            store,
            channel,
            input: TickInput::default(),
            pending_star_purchases: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for hosts that script the simulation (tests, demos)
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn economy(&self) -> &Economy {
        &self.economy
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_game_over(&self) -> bool {
        self.state.is_game_over()
    }

    /// Pointer/touch moved to `x`; steers the ship while playing
    pub fn pointer_moved(&mut self, x: f32) {
        if self.state.phase == GamePhase::Playing {
            self.input.target_x = Some(x - PLAYER_SIZE / 2.0);
        }
    }

    /// Tap at playfield coordinates. Returns the action it triggered.
    pub fn tap(&mut self, x: f32, y: f32) -> Option<UiAction> {
        let action = ui::hit_test(self.state.phase, x, y)?;
        self.perform(action);
        Some(action)
    }

    pub fn perform(&mut self, action: UiAction) {
        match action {
            UiAction::StartGame | UiAction::Restart => self.start_game(),
            UiAction::OpenShop => self.state.phase = GamePhase::Shop,
            UiAction::CloseShop => self.state.phase = GamePhase::Menu,
            UiAction::ReturnToMenu => {
                if self.state.phase == GamePhase::GameOver {
                    self.input = TickInput::default();
                    self.state.player.took_damage = false;
                    self.state.phase = GamePhase::Menu;
                }
            }
            UiAction::BuyUpgrade(kind) => {
                if let Err(e) = self.buy_upgrade(kind) {
                    log::info!("Purchase of {} refused: {}", kind.as_str(), e);
                }
            }
        }
    }

    /// Start a fresh run
    pub fn start_game(&mut self) {
        self.input = TickInput::default();
        self.state.start_run();
        log::info!(
            "Run started: hp {}, fire rate {}",
            self.state.player.max_hp,
            self.state.player.fire_rate
        );
    }

    /// Buy a shop upgrade with saved coins
    pub fn buy_upgrade(&mut self, kind: UpgradeKind) -> Result<(), PurchaseError> {
        self.economy.purchase(
            kind,
            &mut self.state.player,
            &self.state.tuning,
            self.store.as_mut(),
        )
    }

    /// Ask the host to charge stars for one extra max hp.
    ///
    /// With optimistic purchases the hp is granted immediately; otherwise it
    /// waits for [`Session::confirm_star_purchase`].
    pub fn request_star_purchase(&mut self) -> Result<(), ChannelError> {
        let request = PurchaseRequest::buy_hp(self.state.tuning.star_hp_price);
        self.channel.send(&request)?;

        if self.state.tuning.optimistic_star_purchase {
            self.economy
                .grant_star_hp(&mut self.state.player, self.store.as_mut());
        } else {
            self.pending_star_purchases += 1;
        }
        Ok(())
    }

    /// Payment for an earlier star request went through. Returns whether a
    /// pending request was settled.
    pub fn confirm_star_purchase(&mut self) -> bool {
        if self.pending_star_purchases == 0 {
            log::warn!("Star purchase confirmed with nothing pending");
            return false;
        }
        self.pending_star_purchases -= 1;
        self.economy
            .grant_star_hp(&mut self.state.player, self.store.as_mut());
        true
    }

    /// Run one frame. Returns the events the tick raised.
    pub fn frame(&mut self) -> Vec<GameEvent> {
        if self.state.phase != GamePhase::Playing {
            self.state.player.took_damage = false;
            return Vec::new();
        }

        let input = std::mem::take(&mut self.input);
        tick(&mut self.state, &input);

        let events = self.state.drain_events();
        for event in &events {
            if let GameEvent::GameOver { .. } = event {
                self.economy.payout(self.state.score, self.store.as_mut());
            }
        }
        events
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        let state = &self.state;
        let shop = UpgradeKind::ALL
            .into_iter()
            .map(|kind| {
                let upgrade = self.economy.upgrades.get(kind);
                ShopEntry {
                    kind,
                    level: upgrade.level,
                    max_level: upgrade.max_level,
                    price: upgrade.price,
                    available: self.economy.can_buy(kind),
                }
            })
            .collect();

        Snapshot {
            phase: state.phase,
            player: &state.player,
            bullets: &state.bullets,
            enemies: &state.enemies,
            boss: state.boss.as_ref(),
            coins: &state.coins,
            powerups: &state.powerups,
            explosions: &state.explosions,
            stars: &state.stars,
            bonuses: &state.bonuses,
            score: state.score,
            level: state.difficulty(),
            saved_coins: self.economy.saved_coins,
            took_damage: state.player.took_damage,
            shop,
        }
    }
}
