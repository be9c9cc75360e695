//! Tradeable goods.

use serde::{Deserialize, Serialize};

/// Broad class of a commodity. Station types price categories differently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommodityCategory {
    Ore,
    Tech,
    Fuel,
    Essentials,
}

/// A catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Commodity {
    pub name: &'static str,
    pub base_price: u32,
    pub category: CommodityCategory,
}

/// Every commodity in the game, in market order.
pub static COMMODITIES: [Commodity; 6] = [
    Commodity {
        name: "Iron Ore",
        base_price: 20,
        category: CommodityCategory::Ore,
    },
    Commodity {
        name: "Gold",
        base_price: 200,
        category: CommodityCategory::Ore,
    },
    Commodity {
        name: "Hydrogen Fuel",
        base_price: 10,
        category: CommodityCategory::Fuel,
    },
    Commodity {
        name: "Water",
        base_price: 5,
        category: CommodityCategory::Essentials,
    },
    Commodity {
        name: "Electronics",
        base_price: 150,
        category: CommodityCategory::Tech,
    },
    Commodity {
        name: "Medical Supplies",
        base_price: 300,
        category: CommodityCategory::Tech,
    },
];

/// Look up a commodity by name.
pub fn commodity(name: &str) -> Option<&'static Commodity> {
    COMMODITIES.iter().find(|c| c.name == name)
}

/// Base price of `name`, or 0 for goods outside the catalog.
pub fn base_price(name: &str) -> u32 {
    commodity(name).map(|c| c.base_price).unwrap_or(0)
}
