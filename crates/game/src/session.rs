//! The game session: galaxy plus player, built once and handed to whatever
//! drives the game (renderer bridge, UI, headless driver).

use glam::Vec3;
use procgen::{
    Galaxy, JumpGate, PlanetType, Rgb, SpaceStation, StationId, StationType, SystemId,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::config::GameConfig;
use crate::player::PlayerState;
use crate::save::SaveData;
use crate::ship_class::ship_class;
use crate::trade::{self, TradeError};

/// What the renderer needs to draw the current system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemView {
    pub system_id: SystemId,
    pub name: String,
    pub sun_color: Rgb,
    pub ambient_tint: Rgb,
    pub planets: Vec<PlanetView>,
    pub gates: Vec<GateView>,
    pub stations: Vec<StationView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetView {
    pub name: String,
    pub planet_type: PlanetType,
    pub position: Vec3,
    pub size: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateView {
    pub target: SystemId,
    pub name: String,
    pub position: Vec3,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationView {
    pub id: StationId,
    pub name: String,
    pub position: Vec3,
    pub station_type: StationType,
}

/// Discrete proximity notifications coming back from the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProximityEvent {
    /// The ship flew into a gate leading to this system.
    GateReached(SystemId),
    /// Entered (`Some`) or left (`None`) a station's docking range.
    Docking(Option<StationId>),
    /// Entered or left a planet's landing range.
    Landing(Option<String>),
}

#[derive(Debug)]
pub struct GameSession {
    pub galaxy: Galaxy,
    pub player: PlayerState,
    docked_at: Option<StationId>,
    landing_target: Option<String>,
}

impl GameSession {
    pub fn new(galaxy: Galaxy, player: PlayerState) -> Self {
        Self {
            galaxy,
            player,
            docked_at: None,
            landing_target: None,
        }
    }

    /// Fresh galaxy and pilot from config.
    pub fn from_config(config: &GameConfig) -> Self {
        let galaxy = Galaxy::generate_with(&config.galaxy);
        let player = PlayerState::with_credits(galaxy.start_id(), config.starting_credits);
        Self::new(galaxy, player)
    }

    pub fn docked_at(&self) -> Option<StationId> {
        self.docked_at
    }

    pub fn landing_target(&self) -> Option<&str> {
        self.landing_target.as_deref()
    }

    /// The station the player is docked at, if it is in the current system.
    pub fn docked_station(&self) -> Option<&SpaceStation> {
        self.docked_at
            .and_then(|id| self.galaxy.current_system().station(id))
    }

    pub fn system_view(&self) -> SystemView {
        let sys = self.galaxy.current_system();
        SystemView {
            system_id: sys.id,
            name: sys.name.clone(),
            sun_color: sys.sun_color,
            ambient_tint: sys.ambient_tint,
            planets: sys
                .planets
                .iter()
                .map(|p| PlanetView {
                    name: p.name.clone(),
                    planet_type: p.planet_type,
                    position: p.position,
                    size: p.size,
                })
                .collect(),
            gates: sys
                .gates
                .iter()
                .map(|g| GateView {
                    target: g.target,
                    name: g.name.clone(),
                    position: g.position,
                })
                .collect(),
            stations: sys
                .stations
                .iter()
                .map(|s| StationView {
                    id: s.id,
                    name: s.name.clone(),
                    position: s.position,
                    station_type: s.station_type,
                })
                .collect(),
        }
    }

    /// Apply a renderer event. Returns the new system payload when the
    /// current system changed.
    pub fn handle(&mut self, event: ProximityEvent) -> Option<SystemView> {
        match event {
            ProximityEvent::GateReached(target) => {
                if !self.galaxy.jump(target) {
                    return None;
                }
                self.player.arrive(target);
                self.docked_at = None;
                self.landing_target = None;
                log::info!("Arrived in {}", self.galaxy.current_system().name);
                Some(self.system_view())
            }
            ProximityEvent::Docking(station) => {
                self.docked_at = match station {
                    Some(id) if self.galaxy.current_system().station(id).is_none() => {
                        log::warn!("Docking range for {} outside the current system ignored", id);
                        None
                    }
                    other => other,
                };
                None
            }
            ProximityEvent::Landing(planet) => {
                self.landing_target = planet;
                None
            }
        }
    }

    /// Plan a route from the current system to `destination` and engage
    /// autopilot. False when there is no route.
    pub fn plot_course(&mut self, destination: SystemId) -> bool {
        let route = self
            .galaxy
            .find_route(self.galaxy.current_id(), destination);
        if route.is_empty() {
            log::info!("No route to {}", destination);
            return false;
        }
        log::info!("Course plotted to {}: {} jumps", destination, route.len() - 1);
        self.player.set_route(route);
        true
    }

    /// Gate in the current system leading to the next waypoint.
    pub fn next_gate(&self) -> Option<&JumpGate> {
        let waypoint = self.player.next_waypoint()?;
        self.galaxy.current_system().gate_to(waypoint)
    }

    pub fn cancel_autonav(&mut self) {
        self.player.clear_route();
    }

    pub fn buy(&mut self, commodity: &str, qty: u32) -> Result<i64, TradeError> {
        let station = self
            .docked_at
            .and_then(|id| self.galaxy.current_system().station(id))
            .ok_or(TradeError::NotDocked)?;
        trade::buy(&mut self.player, station, commodity, qty)
    }

    pub fn sell(&mut self, commodity: &str, qty: u32) -> Result<i64, TradeError> {
        let station = self
            .docked_at
            .and_then(|id| self.galaxy.current_system().station(id))
            .ok_or(TradeError::NotDocked)?;
        trade::sell(&mut self.player, station, commodity, qty)
    }

    /// Buy a ship by class id. Only possible while docked at a shipyard.
    pub fn purchase_ship(&mut self, class_id: &str) -> Result<(), TradeError> {
        let station = self.docked_station().ok_or(TradeError::NotDocked)?;
        if station.station_type != StationType::Shipyard {
            return Err(TradeError::NoShipyard);
        }
        let class =
            ship_class(class_id).ok_or_else(|| TradeError::UnknownShipClass(class_id.to_string()))?;
        trade::purchase_ship(&mut self.player, class)
    }

    pub fn snapshot(&self, position: Vec3) -> SaveData {
        self.player.to_snapshot(position, OffsetDateTime::now_utc())
    }

    /// Load a snapshot into the player and move the galaxy to its system.
    /// A system id the galaxy does not know falls back to the start system.
    pub fn restore(&mut self, data: &SaveData) -> SystemView {
        self.player.load_snapshot(data);
        let target = if self.galaxy.system(data.current_system_id).is_some() {
            data.current_system_id
        } else {
            log::warn!(
                "Snapshot system {} not in this galaxy; starting at {}",
                data.current_system_id,
                self.galaxy.start_system().name
            );
            self.galaxy.start_id()
        };
        self.galaxy.jump(target);
        if target != data.current_system_id {
            self.player.arrive(target);
        }
        self.docked_at = None;
        self.landing_target = None;
        self.system_view()
    }
}
