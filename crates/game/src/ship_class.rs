//! Purchasable ship classes.

/// Stat block of a ship class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipStats {
    pub max_hull: u32,
    pub max_fuel: u32,
    pub cargo_capacity: u32,
    pub speed_multiplier: f32,
    /// Weapon mount count.
    pub hardpoints: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShipClass {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub price: u32,
    pub stats: ShipStats,
}

/// The ship every new pilot starts in.
pub const STARTER_SHIP_ID: &str = "sidewinder";

pub static SHIP_CLASSES: [ShipClass; 4] = [
    ShipClass {
        id: "sidewinder",
        name: "Sidewinder",
        description: "Reliable multi-purpose starter ship.",
        price: 1000,
        stats: ShipStats {
            max_hull: 100,
            max_fuel: 50,
            cargo_capacity: 20,
            speed_multiplier: 1.0,
            hardpoints: 2,
        },
    },
    ShipClass {
        id: "viper",
        name: "Viper Mk III",
        description: "Fast combat fighter. Limited cargo.",
        price: 15000,
        stats: ShipStats {
            max_hull: 150,
            max_fuel: 40,
            cargo_capacity: 10,
            speed_multiplier: 1.5,
            hardpoints: 4,
        },
    },
    ShipClass {
        id: "hauler",
        name: "Type-6 Hauler",
        description: "Heavy freighter. Slow but profitable.",
        price: 25000,
        stats: ShipStats {
            max_hull: 300,
            max_fuel: 100,
            cargo_capacity: 100,
            speed_multiplier: 0.6,
            hardpoints: 1,
        },
    },
    ShipClass {
        id: "cobra",
        name: "Cobra Mk III",
        description: "The ultimate privateer vessel.",
        price: 75000,
        stats: ShipStats {
            max_hull: 200,
            max_fuel: 80,
            cargo_capacity: 40,
            speed_multiplier: 1.2,
            hardpoints: 4,
        },
    },
];

pub fn ship_class(id: &str) -> Option<&'static ShipClass> {
    SHIP_CLASSES.iter().find(|s| s.id == id)
}

pub fn starter_ship() -> &'static ShipClass {
    &SHIP_CLASSES[0]
}
