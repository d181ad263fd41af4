use crate::events::GameEvent;
use crate::geometry::TilemapInfo;
use crate::level::{Level, LevelLoadError};
use crate::map::LevelData;
use crate::services::GameServices;
use crate::weapons::WeaponRack;
use anyhow::{Context, Result};

/// Composition root the outer loop talks to: owns the services, the
/// weapon rack and the currently loaded level.
pub struct Game {
    services: GameServices,
    weapons: WeaponRack,
    level: Option<Level>,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    pub fn new() -> Self {
        Self { services: GameServices::new(), weapons: WeaponRack::new(), level: None }
    }

    /// Starts a fresh run: services reset, default loadout, new level from
    /// the raw map. Load errors abort before any live state is replaced
    /// beyond the unload of the previous level.
    pub fn start_new(&mut self, raw_map: &str) -> Result<()> {
        self.services.new_game();
        self.weapons.default_loadout(&mut self.services);
        if let Some(mut old) = self.level.take() {
            old.unload();
        }
        let data = LevelData::parse(raw_map).context("failed to parse map")?;
        let mut level = Level::new(data);
        level.load().context("failed to load level")?;
        self.level = Some(level);
        Ok(())
    }

    /// Save games do not exist yet.
    pub fn load_existing(&mut self) -> Result<()> {
        Err(LevelLoadError::NotImplemented("loading a saved game").into())
    }

    pub fn on_tilemap_ready(&mut self, tilemap: TilemapInfo) {
        if let Some(level) = &mut self.level {
            level.on_tilemap_ready(tilemap, &mut self.services);
        }
    }

    /// One outer-loop tick. Returns the events the simulation produced,
    /// in push order, for the collaborator to render, play or display.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        if let Some(level) = &mut self.level {
            level.update(dt, &mut self.services);
        }
        self.weapons.update(dt, &mut self.services);
        let events = self.services.events.drain();
        for event in &events {
            if let GameEvent::WeaponPickedUp { item } = event {
                self.weapons.select_if_better(*item, &mut self.services);
            }
        }
        events
    }

    pub fn fire_active_weapon(&mut self) {
        let Some(level) = self.level.as_mut() else {
            return;
        };
        let Some(player) = level.player_pawn() else {
            return;
        };
        let weapon = self.weapons.active_weapon_mut();
        weapon.fire(level, player, &mut self.services);
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    pub fn level_mut(&mut self) -> Option<&mut Level> {
        self.level.as_mut()
    }

    pub fn services(&self) -> &GameServices {
        &self.services
    }

    pub fn services_mut(&mut self) -> &mut GameServices {
        &mut self.services
    }

    pub fn weapons(&self) -> &WeaponRack {
        &self.weapons
    }

    pub fn weapons_mut(&mut self) -> &mut WeaponRack {
        &mut self.weapons
    }
}
