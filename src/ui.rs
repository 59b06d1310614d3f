//! Menu, shop and game-over button layout
//!
//! Maps a tap in playfield coordinates to the action it triggers. Drawing
//! the buttons is left to the presentation layer, which reads the same
//! layout from here.

use serde::{Deserialize, Serialize};

use crate::economy::UpgradeKind;
use crate::sim::{GamePhase, Rect};

pub const PLAY_BUTTON: Rect = Rect::new(80.0, 280.0, 200.0, 50.0);
pub const SHOP_BUTTON: Rect = Rect::new(80.0, 350.0, 200.0, 50.0);
pub const BACK_BUTTON: Rect = Rect::new(80.0, 550.0, 200.0, 50.0);

/// First shop row baseline and spacing
const SHOP_ROW_Y: f32 = 180.0;
const SHOP_ROW_SPACING: f32 = 60.0;

/// What a tap asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UiAction {
    StartGame,
    OpenShop,
    CloseShop,
    BuyUpgrade(UpgradeKind),
    /// Leave the game-over screen
    ReturnToMenu,
    Restart,
}

/// "Buy" button for the shop row of `kind`
pub fn shop_button(kind: UpgradeKind) -> Rect {
    let index = UpgradeKind::ALL
        .iter()
        .position(|k| *k == kind)
        .unwrap_or_default() as f32;
    Rect::new(200.0, SHOP_ROW_Y + index * SHOP_ROW_SPACING - 25.0, 90.0, 30.0)
}

/// Resolve a tap in the given phase
pub fn hit_test(phase: GamePhase, x: f32, y: f32) -> Option<UiAction> {
    match phase {
        GamePhase::Menu => {
            if PLAY_BUTTON.contains(x, y) {
                Some(UiAction::StartGame)
            } else if SHOP_BUTTON.contains(x, y) {
                Some(UiAction::OpenShop)
            } else {
                None
            }
        }
        GamePhase::Shop => {
            if let Some(kind) = UpgradeKind::ALL
                .into_iter()
                .find(|k| shop_button(*k).contains(x, y))
            {
                Some(UiAction::BuyUpgrade(kind))
            } else if BACK_BUTTON.contains(x, y) {
                Some(UiAction::CloseShop)
            } else {
                None
            }
        }
        GamePhase::Playing => None,
        // Anywhere goes back to the menu
        GamePhase::GameOver => Some(UiAction::ReturnToMenu),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_buttons() {
        assert_eq!(hit_test(GamePhase::Menu, 180.0, 300.0), Some(UiAction::StartGame));
        assert_eq!(hit_test(GamePhase::Menu, 180.0, 370.0), Some(UiAction::OpenShop));
        assert_eq!(hit_test(GamePhase::Menu, 10.0, 10.0), None);
        // Back button only exists in the shop
        assert_eq!(hit_test(GamePhase::Menu, 180.0, 570.0), None);
    }

    #[test]
    fn test_shop_buttons() {
        assert_eq!(shop_button(UpgradeKind::FireRate), Rect::new(200.0, 155.0, 90.0, 30.0));
        assert_eq!(shop_button(UpgradeKind::Hp), Rect::new(200.0, 215.0, 90.0, 30.0));

        assert_eq!(
            hit_test(GamePhase::Shop, 240.0, 170.0),
            Some(UiAction::BuyUpgrade(UpgradeKind::FireRate))
        );
        assert_eq!(
            hit_test(GamePhase::Shop, 240.0, 230.0),
            Some(UiAction::BuyUpgrade(UpgradeKind::Hp))
        );
        assert_eq!(hit_test(GamePhase::Shop, 180.0, 570.0), Some(UiAction::CloseShop));
        // Play is covered by the shop panel
        assert_eq!(hit_test(GamePhase::Shop, 180.0, 300.0), None);
    }

    #[test]
    fn test_playing_and_game_over() {
        assert_eq!(hit_test(GamePhase::Playing, 180.0, 300.0), None);
        assert_eq!(hit_test(GamePhase::GameOver, 1.0, 1.0), Some(UiAction::ReturnToMenu));
    }
}
