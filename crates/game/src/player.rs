//! Player state: credits, ship resources, cargo and navigation.
//!
//! Every mutating method keeps hull, shield and fuel within their maxima and
//! notifies registered listeners once the change is fully applied.

use engine_core::{Gauge, ListenerId, Observers};
use glam::Vec3;
use procgen::{base_price, SystemId};
use std::collections::{BTreeMap, VecDeque};
use time::OffsetDateTime;

use crate::save::SaveData;
use crate::ship_class::{ship_class, starter_ship, ShipClass};

/// Shield capacity, the same on every ship.
pub const DEFAULT_MAX_SHIELD: u32 = 50;

pub const STARTING_CREDITS: i64 = 50_000;

#[derive(Debug)]
pub struct PlayerState {
    credits: i64,
    hull: Gauge,
    shield: Gauge,
    fuel: Gauge,
    ship: &'static ShipClass,
    cargo_capacity: u32,
    speed_multiplier: f32,
    cargo: BTreeMap<String, u32>,
    current_system: SystemId,
    route: VecDeque<SystemId>,
    auto_navigating: bool,
    supporter: bool,
    observers: Observers<PlayerState>,
}

impl PlayerState {
    /// A fresh pilot in the starter ship, fully serviced, at `start`.
    pub fn new(start: SystemId) -> Self {
        Self::with_credits(start, STARTING_CREDITS)
    }

    pub fn with_credits(start: SystemId, credits: i64) -> Self {
        let ship = starter_ship();
        Self {
            credits,
            hull: Gauge::new(ship.stats.max_hull),
            shield: Gauge::new(DEFAULT_MAX_SHIELD),
            fuel: Gauge::new(ship.stats.max_fuel),
            ship,
            cargo_capacity: ship.stats.cargo_capacity,
            speed_multiplier: ship.stats.speed_multiplier,
            cargo: BTreeMap::new(),
            current_system: start,
            route: VecDeque::new(),
            auto_navigating: false,
            supporter: false,
            observers: Observers::new(),
        }
    }

    // ── Queries ─────────────────────────────────────────────────────────

    pub fn credits(&self) -> i64 {
        self.credits
    }

    pub fn hull(&self) -> Gauge {
        self.hull
    }

    pub fn shield(&self) -> Gauge {
        self.shield
    }

    pub fn fuel(&self) -> Gauge {
        self.fuel
    }

    pub fn ship(&self) -> &'static ShipClass {
        self.ship
    }

    pub fn cargo_capacity(&self) -> u32 {
        self.cargo_capacity
    }

    pub fn speed_multiplier(&self) -> f32 {
        self.speed_multiplier
    }

    pub fn cargo(&self) -> &BTreeMap<String, u32> {
        &self.cargo
    }

    pub fn cargo_of(&self, item: &str) -> u32 {
        self.cargo.get(item).copied().unwrap_or(0)
    }

    /// Sum of all held quantities, saturating at `u32::MAX`.
    pub fn cargo_total(&self) -> u32 {
        self.cargo.values().fold(0u32, |total, &qty| total.saturating_add(qty))
    }

    pub fn free_cargo_space(&self) -> u32 {
        self.cargo_capacity.saturating_sub(self.cargo_total())
    }

    pub fn current_system(&self) -> SystemId {
        self.current_system
    }

    pub fn route(&self) -> &VecDeque<SystemId> {
        &self.route
    }

    pub fn next_waypoint(&self) -> Option<SystemId> {
        self.route.front().copied()
    }

    pub fn is_auto_navigating(&self) -> bool {
        self.auto_navigating
    }

    pub fn is_supporter(&self) -> bool {
        self.supporter
    }

    /// Hull at zero. What happens next is up to the caller.
    pub fn is_disabled(&self) -> bool {
        self.hull.is_empty()
    }

    // ── Listeners ───────────────────────────────────────────────────────

    /// Register a listener called after every mutation.
    pub fn subscribe(&mut self, listener: impl Fn(&PlayerState) + 'static) -> ListenerId {
        self.observers.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn notify(&self) {
        self.observers.notify(self);
    }

    // ── Mutations ───────────────────────────────────────────────────────

    /// Add (or with a negative amount, subtract) credits. No floor here:
    /// purchases check affordability before calling this.
    pub fn modify_credits(&mut self, amount: i64) {
        self.credits = self.credits.saturating_add(amount);
        self.notify();
    }

    /// Shield absorbs damage first; whatever it cannot absorb hits the hull.
    pub fn take_damage(&mut self, amount: u32) {
        let bleed = self.shield.drain(amount);
        self.hull.drain(bleed);
        if self.hull.is_empty() {
            log::info!("Hull breached: ship disabled");
        }
        self.notify();
    }

    pub fn recharge_shield(&mut self, amount: u32) {
        self.shield.fill(amount);
        self.notify();
    }

    pub fn repair(&mut self, amount: u32) {
        self.hull.fill(amount);
        self.notify();
    }

    pub fn refuel(&mut self, amount: u32) {
        self.fuel.fill(amount);
        self.notify();
    }

    /// Add to an item's quantity. Capacity is the caller's concern.
    pub fn add_cargo(&mut self, item: &str, qty: u32) {
        if qty > 0 {
            let held = self.cargo.entry(item.to_string()).or_insert(0);
            *held = held.saturating_add(qty);
        }
        self.notify();
    }

    /// Take from an item's quantity; the entry is dropped at zero.
    pub fn remove_cargo(&mut self, item: &str, qty: u32) {
        if let Some(held) = self.cargo.get_mut(item) {
            *held = held.saturating_sub(qty);
            if *held == 0 {
                self.cargo.remove(item);
            }
        }
        self.notify();
    }

    /// Switch to `class` with a full service: hull and fuel are topped up to
    /// the new maxima. Cargo beyond the new capacity is jettisoned, cheapest
    /// goods first.
    pub fn change_ship(&mut self, class: &'static ShipClass) {
        self.apply_ship_stats(class);
        self.hull.refill();
        self.fuel.refill();

        let dumped = self.jettison_overflow();
        if !dumped.is_empty() {
            log::info!("Jettisoned cargo to fit {}: {:?}", class.name, dumped);
        }
        self.notify();
    }

    /// Replace state from a snapshot, clamping hull and fuel to the ship's
    /// maxima and fitting cargo into the hold. An unknown ship class in the
    /// snapshot leaves the current ship in place.
    pub fn load_snapshot(&mut self, data: &SaveData) {
        match ship_class(&data.ship_class_id) {
            Some(class) => self.apply_ship_stats(class),
            None => log::warn!(
                "Snapshot references unknown ship class {:?}; keeping {}",
                data.ship_class_id,
                self.ship.id
            ),
        }

        self.credits = data.credits;
        self.hull.set(data.hull);
        self.fuel.set(data.fuel);
        self.cargo = data
            .cargo
            .iter()
            .filter(|(_, &qty)| qty > 0)
            .map(|(k, &v)| (k.clone(), v))
            .collect();
        let dumped = self.jettison_overflow();
        if !dumped.is_empty() {
            log::warn!("Snapshot cargo exceeds {} hold; jettisoned {:?}", self.ship.name, dumped);
        }
        self.current_system = data.current_system_id;
        self.supporter = data.is_supporter;
        self.route.clear();
        self.auto_navigating = false;
        self.notify();
    }

    /// Snapshot of the persistent fields, with the ship's in-system position.
    pub fn to_snapshot(&self, position: Vec3, timestamp: OffsetDateTime) -> SaveData {
        SaveData {
            credits: self.credits,
            fuel: self.fuel.current(),
            hull: self.hull.current(),
            cargo: self.cargo.clone(),
            current_system_id: self.current_system,
            ship_class_id: self.ship.id.to_string(),
            position_x: position.x,
            position_y: position.y,
            position_z: position.z,
            timestamp,
            is_supporter: self.supporter,
        }
    }

    pub fn set_supporter(&mut self, supporter: bool) {
        self.supporter = supporter;
        self.notify();
    }

    /// Store a planned route. A leading entry for the current system is
    /// dropped; autopilot engages when anything is left.
    pub fn set_route(&mut self, route: Vec<SystemId>) {
        let mut route: VecDeque<SystemId> = route.into();
        if route.front() == Some(&self.current_system) {
            route.pop_front();
        }
        self.auto_navigating = !route.is_empty();
        self.route = route;
        self.notify();
    }

    pub fn clear_route(&mut self) {
        self.route.clear();
        self.auto_navigating = false;
        self.notify();
    }

    /// Record arrival in `system`. Reaching the next waypoint advances the
    /// route; arriving anywhere else abandons it.
    pub fn arrive(&mut self, system: SystemId) {
        self.current_system = system;
        if self.route.front() == Some(&system) {
            self.route.pop_front();
        } else if !self.route.is_empty() {
            log::info!("Left planned route at {}; autopilot disengaged", system);
            self.route.clear();
        }
        if self.route.is_empty() {
            self.auto_navigating = false;
        }
        self.notify();
    }

    fn apply_ship_stats(&mut self, class: &'static ShipClass) {
        self.ship = class;
        self.hull.set_max(class.stats.max_hull);
        self.fuel.set_max(class.stats.max_fuel);
        self.cargo_capacity = class.stats.cargo_capacity;
        self.speed_multiplier = class.stats.speed_multiplier;
    }

    /// Drop units until the hold fits, lowest base price first (ties by
    /// name). Returns what was dropped.
    fn jettison_overflow(&mut self) -> Vec<(String, u32)> {
        let held_total: u64 = self.cargo.values().map(|&qty| u64::from(qty)).sum();
        let mut excess = held_total.saturating_sub(u64::from(self.cargo_capacity));
        if excess == 0 {
            return Vec::new();
        }

        let mut order: Vec<(u32, String)> = self
            .cargo
            .keys()
            .map(|name| (base_price(name), name.clone()))
            .collect();
        order.sort();

        let mut dumped = Vec::new();
        for (_, name) in order {
            if excess == 0 {
                break;
            }
            let held = self.cargo_of(&name);
            let drop = u64::from(held).min(excess) as u32;
            excess -= u64::from(drop);
            if drop == held {
                self.cargo.remove(&name);
            } else if let Some(q) = self.cargo.get_mut(&name) {
                *q -= drop;
            }
            dumped.push((name, drop));
        }
        dumped
    }
}
