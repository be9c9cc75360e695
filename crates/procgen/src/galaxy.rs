//! Galaxy generation: star systems linked by jump gates.
//!
//! The galaxy is built from one seed. Systems are generated in index order,
//! then linked in a chain (0-1, 1-2, ...) so every system is reachable from
//! the home system, then extra random shortcuts are added on top.

use engine_core::{RandomStream, SeededStream};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::market::generate_market;
use crate::route;
use crate::star_system::{
    JumpGate, Planet, PlanetType, Rgb, SpaceStation, StarSystem, StationId, StationType, SystemId,
};

/// Names for the first systems, in order. System 0 is home.
pub const SYSTEM_NAMES: [&str; 10] = [
    "Sol",
    "Alpha Centauri",
    "Sirius",
    "Vega",
    "Procyon",
    "Betelgeuse",
    "Rigel",
    "Deneb",
    "Altair",
    "Antares",
];

/// Prefixes for synthesized `{prefix}-{nn}` names.
pub const NAME_PREFIXES: [&str; 5] = ["Sigma", "Tau", "Omicron", "Theta", "Zeta"];

pub const SYSTEM_DESCRIPTION: &str = "A generic star system in the void.";

/// Where the home system's first gate sits, just ahead of a fresh ship.
pub const HOME_GATE_POSITION: Vec3 = Vec3::new(0.0, 0.0, 200.0);

/// Main station position for a system without planets.
pub const FALLBACK_STATION_POSITION: Vec3 = Vec3::new(1000.0, 0.0, 1000.0);

/// Offset of the main station from the first planet.
const STATION_OFFSET: Vec3 = Vec3::new(300.0, 50.0, 300.0);

/// Offset of the shipyard from the last planet.
const SHIPYARD_OFFSET: Vec3 = Vec3::new(-300.0, -50.0, -300.0);

/// Primary light colors, roughly red dwarf through blue giant.
const STAR_PALETTE: [Rgb; 5] = [
    Rgb::new(255, 170, 120),
    Rgb::new(255, 214, 160),
    Rgb::new(255, 244, 224),
    Rgb::new(236, 242, 255),
    Rgb::new(170, 196, 255),
];

/// Generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalaxyConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Number of systems. At least one is always generated.
    #[serde(default = "default_system_count")]
    pub system_count: usize,
    /// Number of shortcut attempts after the chain is built.
    #[serde(default = "default_shortcut_count")]
    pub shortcut_count: usize,
}

fn default_seed() -> u64 {
    1337
}
fn default_system_count() -> usize {
    50
}
fn default_shortcut_count() -> usize {
    20
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            system_count: default_system_count(),
            shortcut_count: default_shortcut_count(),
        }
    }
}

/// The generated galaxy and the currently occupied system.
#[derive(Debug, Clone)]
pub struct Galaxy {
    pub seed: u64,
    systems: Vec<StarSystem>,
    start: SystemId,
    current: SystemId,
}

impl Galaxy {
    /// Generate a galaxy with default size from `seed`.
    pub fn generate(seed: u64) -> Self {
        Self::generate_with(&GalaxyConfig {
            seed,
            ..GalaxyConfig::default()
        })
    }

    /// Generate a galaxy from a full config.
    pub fn generate_with(config: &GalaxyConfig) -> Self {
        let mut rng = SeededStream::new(config.seed);
        let count = config.system_count.max(1);
        let mut station_ids = 0u32;

        let mut systems: Vec<StarSystem> = (0..count)
            .map(|i| generate_system(SystemId(i as u32), &mut rng, &mut station_ids))
            .collect();

        // Chain first: guarantees reachability from system 0.
        for i in 0..count.saturating_sub(1) {
            connect(&mut systems, SystemId(i as u32), SystemId(i as u32 + 1), &mut rng);
        }

        if let Some(gate) = systems[0].gates.first_mut() {
            gate.position = HOME_GATE_POSITION;
        }

        let mut shortcuts = 0;
        for _ in 0..config.shortcut_count {
            let a = rng.next_index(count);
            let b = rng.next_index(count);
            if a != b && connect(&mut systems, SystemId(a as u32), SystemId(b as u32), &mut rng) {
                shortcuts += 1;
            }
        }

        let start = systems[0].id;
        let galaxy = Self {
            seed: config.seed,
            systems,
            start,
            current: start,
        };
        log::info!(
            "Generated galaxy: seed {}, {} systems, {} gates ({} shortcuts)",
            config.seed,
            galaxy.systems.len(),
            galaxy.gate_count(),
            shortcuts
        );
        galaxy
    }

    pub fn start_id(&self) -> SystemId {
        self.start
    }

    pub fn current_id(&self) -> SystemId {
        self.current
    }

    /// Every system, in id order. Never empty.
    pub fn systems(&self) -> &[StarSystem] {
        &self.systems
    }

    pub fn start_system(&self) -> &StarSystem {
        self.resolve(self.start)
    }

    pub fn current_system(&self) -> &StarSystem {
        self.resolve(self.current)
    }

    /// The system with `id`, or the home system if there is none.
    fn resolve(&self, id: SystemId) -> &StarSystem {
        route::lookup(&self.systems, id).unwrap_or(&self.systems[0])
    }

    pub fn system(&self, id: SystemId) -> Option<&StarSystem> {
        route::lookup(&self.systems, id)
    }

    pub fn system_by_name(&self, name: &str) -> Option<&StarSystem> {
        self.systems.iter().find(|s| s.name == name)
    }

    /// Find a station anywhere in the galaxy.
    pub fn station(&self, id: StationId) -> Option<&SpaceStation> {
        self.systems.iter().find_map(|s| s.station(id))
    }

    /// Total number of one-way gates.
    pub fn gate_count(&self) -> usize {
        self.systems.iter().map(|s| s.gates.len()).sum()
    }

    /// Make `target` the current system. Unknown ids are ignored and
    /// return false.
    pub fn jump(&mut self, target: SystemId) -> bool {
        match self.system(target) {
            Some(sys) => {
                log::debug!("Jump {} -> {} ({})", self.current, target, sys.name);
                self.current = target;
                true
            }
            None => {
                log::warn!("Jump to unknown system {} ignored", target);
                false
            }
        }
    }

    pub fn find_route(&self, from: SystemId, to: SystemId) -> Vec<SystemId> {
        route::find_route(&self.systems, from, to)
    }

    pub fn reachable_from(&self, start: SystemId) -> HashSet<SystemId> {
        route::reachable_from(&self.systems, start)
    }
}

/// Link `a` and `b` with one gate in each direction, each at its own random
/// position. Skipped (returns false) when `a` already has a gate to `b`.
pub fn connect(
    systems: &mut [StarSystem],
    a: SystemId,
    b: SystemId,
    rng: &mut impl RandomStream,
) -> bool {
    let (Some(a_name), Some(b_name)) = (
        route::lookup(systems, a).map(|s| s.name.clone()),
        route::lookup(systems, b).map(|s| s.name.clone()),
    ) else {
        return false;
    };
    if route::lookup(systems, a).is_some_and(|s| s.has_gate_to(b)) {
        return false;
    }

    let forward = JumpGate {
        target: b,
        name: format!("Gate to {}", b_name),
        position: gate_position(rng),
    };
    let back = JumpGate {
        target: a,
        name: format!("Gate to {}", a_name),
        position: gate_position(rng),
    };

    if let Some(sys) = systems.iter_mut().find(|s| s.id == a) {
        sys.gates.push(forward);
    }
    if let Some(sys) = systems.iter_mut().find(|s| s.id == b) {
        sys.gates.push(back);
    }
    true
}

/// Inner-system gate position: 200-600 units out, clear of the sun.
fn gate_position(rng: &mut impl RandomStream) -> Vec3 {
    let dist = rng.next_int(200, 600) as f64;
    let angle = rng.next_angle();
    let y = rng.next_int(-50, 50);
    Vec3::new((angle.cos() * dist) as f32, y as f32, (angle.sin() * dist) as f32)
}

fn system_name(index: usize, rng: &mut impl RandomStream) -> String {
    match SYSTEM_NAMES.get(index) {
        Some(name) => name.to_string(),
        None => {
            let prefix = NAME_PREFIXES[rng.next_index(NAME_PREFIXES.len())];
            format!("{}-{}", prefix, rng.next_int(10, 99))
        }
    }
}

fn roman(n: usize) -> &'static str {
    match n {
        1 => "I",
        2 => "II",
        3 => "III",
        _ => "IV",
    }
}

/// Generate one system. Draw order: name, coordinates, tint and sun color,
/// planets, main station and its market. The shipyard draws nothing.
fn generate_system(id: SystemId, rng: &mut impl RandomStream, station_ids: &mut u32) -> StarSystem {
    let name = system_name(id.index(), rng);

    let coordinates = Vec3::new(
        rng.next_int(-1000, 1000) as f32,
        rng.next_int(-100, 100) as f32,
        rng.next_int(-1000, 1000) as f32,
    );

    // Dark ambient tint
    let ambient_tint = Rgb::new(
        rng.next_int(0, 50) as u8,
        rng.next_int(0, 30) as u8,
        rng.next_int(20, 80) as u8,
    );
    let sun_color = STAR_PALETTE[rng.next_index(STAR_PALETTE.len())];

    // Planets sit far out (1000-3000 units)
    let planet_count = rng.next_int(1, 4) as usize;
    let mut planets = Vec::with_capacity(planet_count);
    for p in 0..planet_count {
        let angle = rng.next_angle();
        let radius = rng.next_int(1000, 3000) as f64;
        let y = rng.next_int(-200, 200) as f32;
        let planet_type = if rng.coin_flip() {
            PlanetType::GasGiant
        } else {
            PlanetType::Rocky
        };
        let size = rng.next_int(100, 400) as f32;
        planets.push(Planet {
            name: format!("{} {}", name, roman(p + 1)),
            planet_type,
            position: Vec3::new((angle.cos() * radius) as f32, y, (angle.sin() * radius) as f32),
            size,
        });
    }

    let station_pos = planets
        .first()
        .map(|p| p.position + STATION_OFFSET)
        .unwrap_or(FALLBACK_STATION_POSITION);
    let station_type = if rng.coin_flip() {
        StationType::TradingPost
    } else {
        StationType::MiningArray
    };
    let market = generate_market(station_type, rng);
    let station = SpaceStation {
        id: next_station_id(station_ids),
        name: format!("{} Outpost", name),
        position: station_pos,
        station_type,
        prices: market.prices,
        quantities: market.quantities,
    };

    // Opposite the main station, or beside the outermost planet when there
    // is more than one.
    let shipyard_pos = match planets.last() {
        Some(last) if planet_count > 1 => last.position + SHIPYARD_OFFSET,
        _ => Vec3::new(-station_pos.x, station_pos.y + 200.0, -station_pos.z),
    };
    let shipyard = SpaceStation {
        id: next_station_id(station_ids),
        name: format!("{} Shipyards", name),
        position: shipyard_pos,
        station_type: StationType::Shipyard,
        prices: Default::default(),
        quantities: Default::default(),
    };

    StarSystem {
        id,
        name,
        description: SYSTEM_DESCRIPTION.to_string(),
        ambient_tint,
        sun_color,
        coordinates,
        planets,
        stations: vec![station, shipyard],
        gates: Vec::new(),
    }
}

fn next_station_id(counter: &mut u32) -> StationId {
    let id = StationId(*counter);
    *counter += 1;
    id
}
