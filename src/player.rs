use crate::events::{EventBus, GameEvent};

const MAX_HEALTH: f32 = 100.0;
const MAX_HEALTH_BOOSTED: f32 = 200.0;
const MAX_ARMOR: f32 = 100.0;
const MAX_ARMOR_BOOSTED: f32 = 200.0;

/// Health and armor of the one player, shared across pawn respawns.
/// Armor soaks damage before health does.
pub struct PlayerState {
    health: f32,
    armor: f32,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self::new()
    }
}

impl PlayerState {
    pub fn new() -> Self {
        Self { health: 75.0, armor: 0.0 }
    }

    pub fn reset(&mut self) {
        self.health = 75.0;
        self.armor = 0.0;
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn armor(&self) -> f32 {
        self.armor
    }

    pub fn is_health_full(&self, boosted: bool) -> bool {
        self.health >= if boosted { MAX_HEALTH_BOOSTED } else { MAX_HEALTH }
    }

    pub fn is_armor_full(&self, boosted: bool) -> bool {
        self.armor >= if boosted { MAX_ARMOR_BOOSTED } else { MAX_ARMOR }
    }

    pub fn add_health(&mut self, amount: f32, boosted: bool, events: &mut EventBus) {
        let cap = if boosted { MAX_HEALTH_BOOSTED } else { MAX_HEALTH };
        self.health = (self.health + amount).min(cap);
        events.push(GameEvent::HealthChanged { value: self.health });
    }

    pub fn add_armor(&mut self, amount: f32, boosted: bool, events: &mut EventBus) {
        let cap = if boosted { MAX_ARMOR_BOOSTED } else { MAX_ARMOR };
        self.armor = (self.armor + amount).min(cap);
        events.push(GameEvent::ArmorChanged { value: self.armor });
    }

    /// Armor absorbs first; whatever it cannot soak spills into health,
    /// floored at zero. Death fires once, when health reaches zero.
    pub fn remove_health(&mut self, amount: f32, events: &mut EventBus) {
        let had_armor = self.armor > 0.0;
        let was_alive = self.health > 0.0;
        let spill = amount - self.armor;
        if spill > 0.0 {
            self.armor = 0.0;
            self.health = (self.health - spill).max(0.0);
            events.push(GameEvent::HealthChanged { value: self.health });
        } else {
            self.armor -= amount;
        }
        if had_armor {
            events.push(GameEvent::ArmorChanged { value: self.armor });
        }
        if was_alive && self.health <= 0.0 {
            events.push(GameEvent::PlayerDied);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn armor_soaks_before_health() {
        let mut events = EventBus::default();
        let mut player = PlayerState::new();
        player.add_armor(50.0, false, &mut events);
        player.remove_health(60.0, &mut events);
        assert_eq!(player.armor(), 0.0);
        assert_eq!(player.health(), 65.0);
    }

    #[test]
    fn health_floors_at_zero_and_death_fires_once() {
        let mut events = EventBus::default();
        let mut player = PlayerState::new();
        player.remove_health(500.0, &mut events);
        player.remove_health(10.0, &mut events);
        assert_eq!(player.health(), 0.0);
        let died = events.drain().into_iter().filter(|e| *e == GameEvent::PlayerDied).count();
        assert_eq!(died, 1);
    }

    #[test]
    fn boosted_health_cap_applies() {
        let mut events = EventBus::default();
        let mut player = PlayerState::new();
        player.add_health(500.0, true, &mut events);
        assert_eq!(player.health(), 200.0);
        assert!(player.is_health_full(false));
    }
}
