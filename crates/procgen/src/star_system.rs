//! Star system data model: planets, stations, and jump gates.
//!
//! Positions of planets, stations and gates are in-system coordinates; a
//! system's `coordinates` place it on the galaxy map.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity of a star system. Equal to its generation index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SystemId(pub u32);

impl SystemId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SystemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SYS-{:03}", self.0)
    }
}

/// Identity of a station, unique across the galaxy (creation order).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(pub u32);

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "STN-{:04}", self.0)
    }
}

/// 8-bit RGB color. Displays as a CSS `rgb(r,g,b)` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Normalized `0..=1` channels.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r as f32, self.g as f32, self.b as f32) / 255.0
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// Kinds of planet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanetType {
    GasGiant,
    Rocky,
}

impl PlanetType {
    pub fn label(&self) -> &'static str {
        match self {
            PlanetType::GasGiant => "Gas Giant",
            PlanetType::Rocky => "Rocky",
        }
    }
}

/// A planet. Owned by its system and never referenced elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Planet {
    pub name: String,
    pub planet_type: PlanetType,
    pub position: Vec3,
    /// Visual radius.
    pub size: f32,
}

/// Kinds of station.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StationType {
    TradingPost,
    MiningArray,
    Shipyard,
}

impl StationType {
    pub fn label(&self) -> &'static str {
        match self {
            StationType::TradingPost => "Trading Post",
            StationType::MiningArray => "Mining Array",
            StationType::Shipyard => "Shipyard",
        }
    }

    /// Whether stations of this type run a commodity market.
    pub fn trades(&self) -> bool {
        !matches!(self, StationType::Shipyard)
    }
}

/// A station. Trading stations carry one price and one stock entry per
/// catalog commodity; shipyards carry none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpaceStation {
    pub id: StationId,
    pub name: String,
    pub position: Vec3,
    pub station_type: StationType,
    /// Commodity name -> unit price.
    pub prices: BTreeMap<String, u32>,
    /// Commodity name -> available quantity.
    pub quantities: BTreeMap<String, u32>,
}

impl SpaceStation {
    pub fn has_market(&self) -> bool {
        !self.prices.is_empty()
    }

    pub fn price(&self, commodity: &str) -> Option<u32> {
        self.prices.get(commodity).copied()
    }

    pub fn quantity(&self, commodity: &str) -> Option<u32> {
        self.quantities.get(commodity).copied()
    }
}

/// One direction of a link between two systems. The reverse direction is a
/// separate gate owned by the other system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JumpGate {
    pub target: SystemId,
    pub name: String,
    pub position: Vec3,
}

/// A node of the galaxy graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarSystem {
    pub id: SystemId,
    pub name: String,
    pub description: String,
    pub ambient_tint: Rgb,
    pub sun_color: Rgb,
    /// Galaxy-map position.
    pub coordinates: Vec3,
    pub planets: Vec<Planet>,
    pub stations: Vec<SpaceStation>,
    pub gates: Vec<JumpGate>,
}

impl StarSystem {
    /// The outgoing gate leading to `target`, if any.
    pub fn gate_to(&self, target: SystemId) -> Option<&JumpGate> {
        self.gates.iter().find(|g| g.target == target)
    }

    pub fn has_gate_to(&self, target: SystemId) -> bool {
        self.gate_to(target).is_some()
    }

    pub fn station(&self, id: StationId) -> Option<&SpaceStation> {
        self.stations.iter().find(|s| s.id == id)
    }

    pub fn planet(&self, name: &str) -> Option<&Planet> {
        self.planets.iter().find(|p| p.name == name)
    }

    /// The system's commodity market station.
    pub fn market_station(&self) -> Option<&SpaceStation> {
        self.stations.iter().find(|s| s.station_type.trades())
    }

    pub fn shipyard(&self) -> Option<&SpaceStation> {
        self.stations
            .iter()
            .find(|s| s.station_type == StationType::Shipyard)
    }

    /// Target ids of all outgoing gates, in gate order.
    pub fn neighbors(&self) -> impl Iterator<Item = SystemId> + '_ {
        self.gates.iter().map(|g| g.target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_displays_as_css() {
        assert_eq!(Rgb::new(12, 0, 79).to_string(), "rgb(12,0,79)");
        assert_eq!(Rgb::new(255, 255, 255).to_vec3(), Vec3::ONE);
    }

    #[test]
    fn shipyards_do_not_trade() {
        assert!(!StationType::Shipyard.trades());
        assert!(StationType::MiningArray.trades());
        assert_eq!(StationType::MiningArray.label(), "Mining Array");
    }

    #[test]
    fn ids_display_padded() {
        assert_eq!(SystemId(7).to_string(), "SYS-007");
        assert_eq!(StationId(42).to_string(), "STN-0042");
    }
}
