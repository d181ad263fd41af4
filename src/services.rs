use crate::events::EventBus;
use crate::inventory::Inventory;
use crate::player::PlayerState;

/// Long-lived game services handed to the level by the composition root.
/// They outlive any single level; `new_game` is their reset point.
pub struct GameServices {
    pub inventory: Inventory,
    pub player: PlayerState,
    pub events: EventBus,
}

impl Default for GameServices {
    fn default() -> Self {
        Self::new()
    }
}

impl GameServices {
    pub fn new() -> Self {
        Self { inventory: Inventory::new(), player: PlayerState::new(), events: EventBus::default() }
    }

    pub fn new_game(&mut self) {
        self.inventory.reset();
        self.player.reset();
        self.events.drain();
    }
}
