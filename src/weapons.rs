use crate::events::GameEvent;
use crate::inventory::InventoryItem;
use crate::level::Level;
use crate::services::GameServices;
use bevy_ecs::prelude::Entity;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponState {
    Idle,
    Firing,
    IdleAfterFire,
    Reloading,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Pistol,
    Shotgun,
}

/// Fire and timing parameters for one weapon kind. Selecting behaviour by
/// data instead of subclassing keeps the whole arsenal in one table.
#[derive(Debug, Clone, Copy)]
pub struct WeaponSpec {
    pub firing_time: f32,
    pub idle_after_fire_time: f32,
    pub reload_time: f32,
    pub damage: f32,
    pub pellets: u32,
    pub spread: f32,
    pub ammo_item: InventoryItem,
    pub weapon_item: InventoryItem,
    pub fire_sound: &'static str,
    pub reload_sound: Option<&'static str>,
}

impl WeaponKind {
    pub fn spec(self) -> WeaponSpec {
        match self {
            WeaponKind::Pistol => WeaponSpec {
                firing_time: 0.2,
                idle_after_fire_time: 0.1,
                reload_time: 0.0,
                damage: 8.0,
                pellets: 1,
                spread: 0.01,
                ammo_item: InventoryItem::PistolAmmo,
                weapon_item: InventoryItem::Pistol,
                fire_sound: "pistolFire",
                reload_sound: None,
            },
            WeaponKind::Shotgun => WeaponSpec {
                firing_time: 0.2,
                idle_after_fire_time: 0.2,
                reload_time: 0.6,
                damage: 10.0,
                pellets: 6,
                spread: 0.1,
                ammo_item: InventoryItem::ShotgunAmmo,
                weapon_item: InventoryItem::Shotgun,
                fire_sound: "shotgunFire",
                reload_sound: Some("shotgunReload"),
            },
        }
    }

    fn rank(self) -> u32 {
        match self {
            WeaponKind::Pistol => 1,
            WeaponKind::Shotgun => 2,
        }
    }

    fn from_item(item: InventoryItem) -> Option<WeaponKind> {
        match item {
            InventoryItem::Pistol => Some(WeaponKind::Pistol),
            InventoryItem::Shotgun => Some(WeaponKind::Shotgun),
            _ => None,
        }
    }
}

/// One weapon's runtime: a small cycle of Idle, Firing, IdleAfterFire and
/// Reloading driven by the spec's durations.
pub struct Weapon {
    kind: WeaponKind,
    spec: WeaponSpec,
    state: WeaponState,
    state_time: f32,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        Self { kind, spec: kind.spec(), state: WeaponState::Idle, state_time: 0.0 }
    }

    pub fn kind(&self) -> WeaponKind {
        self.kind
    }

    pub fn state(&self) -> WeaponState {
        self.state
    }

    pub fn ammo_count(&self, services: &GameServices) -> u32 {
        services.inventory.item_count(self.spec.ammo_item)
    }

    pub fn update(&mut self, dt: f32, services: &mut GameServices) {
        self.state_time += dt;
        match self.state {
            WeaponState::Idle => {}
            WeaponState::Firing => {
                if self.state_time > self.spec.firing_time {
                    self.change_state(WeaponState::IdleAfterFire, services);
                }
            }
            WeaponState::IdleAfterFire => {
                if self.state_time > self.spec.idle_after_fire_time {
                    self.change_state(WeaponState::Reloading, services);
                    if let Some(sound) = self.spec.reload_sound {
                        services.events.push(GameEvent::SoundEffect { name: sound });
                    }
                }
            }
            WeaponState::Reloading => {
                if self.state_time > self.spec.reload_time {
                    self.change_state(WeaponState::Idle, services);
                }
            }
        }
    }

    /// Fires if idle and loaded: consumes one round and casts the spec's
    /// pellet count through the level. An empty weapon just clicks.
    pub fn fire(&mut self, level: &mut Level, shooter: Entity, services: &mut GameServices) {
        if self.state != WeaponState::Idle {
            return;
        }
        if !services.inventory.has_item(self.spec.ammo_item) {
            services.events.push(GameEvent::SoundEffect { name: "dryfire" });
            return;
        }
        services.inventory.remove_item(self.spec.ammo_item, 1);
        self.change_state(WeaponState::Firing, services);
        services.events.push(GameEvent::SoundEffect { name: self.spec.fire_sound });
        for _ in 0..self.spec.pellets {
            level.hitscan(shooter, self.spec.spread, self.spec.damage, services);
        }
    }

    pub fn on_selected(&mut self, services: &mut GameServices) {
        self.change_state(WeaponState::Reloading, services);
        if let Some(sound) = self.spec.reload_sound {
            services.events.push(GameEvent::SoundEffect { name: sound });
        }
    }

    pub fn on_deselected(&mut self, services: &mut GameServices) {
        self.change_state(WeaponState::Idle, services);
    }

    fn change_state(&mut self, state: WeaponState, services: &mut GameServices) {
        let from = self.state;
        self.state = state;
        self.state_time = 0.0;
        services.events.push(GameEvent::WeaponStateChanged { kind: self.kind, from, to: state });
    }
}

/// The player's arsenal and active selection.
pub struct WeaponRack {
    weapons: Vec<Weapon>,
    active: usize,
}

impl Default for WeaponRack {
    fn default() -> Self {
        Self::new()
    }
}

impl WeaponRack {
    pub fn new() -> Self {
        Self {
            weapons: vec![Weapon::new(WeaponKind::Pistol), Weapon::new(WeaponKind::Shotgun)],
            active: 0,
        }
    }

    pub fn active_weapon(&self) -> &Weapon {
        &self.weapons[self.active]
    }

    pub fn active_weapon_mut(&mut self) -> &mut Weapon {
        &mut self.weapons[self.active]
    }

    /// Starting gear: a pistol and a full clip, nothing else.
    pub fn default_loadout(&mut self, services: &mut GameServices) {
        services.inventory.reset_weapons();
        services.inventory.add_item(InventoryItem::Pistol, 1);
        services.inventory.add_item(InventoryItem::PistolAmmo, 50);
        self.active = 0;
    }

    pub fn update(&mut self, dt: f32, services: &mut GameServices) {
        self.weapons[self.active].update(dt, services);
    }

    pub fn select(&mut self, kind: WeaponKind, services: &mut GameServices) {
        let Some(index) = self.weapons.iter().position(|w| w.kind() == kind) else {
            return;
        };
        if index == self.active {
            return;
        }
        self.weapons[self.active].on_deselected(services);
        self.active = index;
        self.weapons[self.active].on_selected(services);
    }

    /// Auto-select on pickup: only switches upward in the ranking.
    pub fn select_if_better(&mut self, item: InventoryItem, services: &mut GameServices) {
        let Some(kind) = WeaponKind::from_item(item) else {
            return;
        };
        if kind.rank() > self.weapons[self.active].kind().rank() {
            self.select(kind, services);
        }
    }

    /// Picks the best weapon the player both owns and has ammo for.
    pub fn select_best(&mut self, services: &mut GameServices) {
        let mut best = WeaponKind::Pistol;
        for weapon in &self.weapons {
            let spec = weapon.kind().spec();
            if services.inventory.has_item(spec.weapon_item)
                && services.inventory.has_item(spec.ammo_item)
                && weapon.kind().rank() > best.rank()
            {
                best = weapon.kind();
            }
        }
        self.select(best, services);
    }
}
