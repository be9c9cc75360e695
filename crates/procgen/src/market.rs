//! Station markets: prices and stock fixed at generation time.
//!
//! A station discounts what it supplies and surcharges what it demands.
//! Mining arrays supply ore and demand tech and fuel; trading posts supply
//! tech and demand ore.

use engine_core::RandomStream;
use std::collections::BTreeMap;

use crate::commodity::{CommodityCategory, COMMODITIES};
use crate::star_system::StationType;

/// Random spread applied to base prices, as a fraction either side.
pub const PRICE_VARIANCE: f64 = 0.25;

/// Stock draw range, half-open.
pub const STOCK_RANGE: (i32, i32) = (10, 100);

/// Price multiplier for a category at a station type.
pub fn price_multiplier(station_type: StationType, category: CommodityCategory) -> f64 {
    use CommodityCategory::*;
    match (station_type, category) {
        (StationType::MiningArray, Ore) => 0.5,
        (StationType::MiningArray, Tech | Fuel) => 1.5,
        (StationType::TradingPost, Tech) => 0.6,
        (StationType::TradingPost, Ore) => 1.5,
        _ => 1.0,
    }
}

/// Stock multiplier: doubled where the station supplies, halved where it demands.
pub fn stock_multiplier(station_type: StationType, category: CommodityCategory) -> f64 {
    let price = price_multiplier(station_type, category);
    if price < 1.0 {
        2.0
    } else if price > 1.0 {
        0.5
    } else {
        1.0
    }
}

/// Unit price for a base price, a drawn variance in `[-0.25, 0.25)`, and a
/// station multiplier. Never below 1.
pub fn unit_price(base_price: u32, variance: f64, multiplier: f64) -> u32 {
    let price = (base_price as f64 * (1.0 + variance) * multiplier).round();
    price.max(1.0) as u32
}

/// Generated market for one station.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Market {
    pub prices: BTreeMap<String, u32>,
    pub quantities: BTreeMap<String, u32>,
}

/// Generate a market for `station_type`. Shipyards get an empty market and
/// consume no random draws. For each commodity, in catalog order, the price
/// variance is drawn before the stock.
pub fn generate_market(station_type: StationType, rng: &mut impl RandomStream) -> Market {
    let mut market = Market::default();
    if !station_type.trades() {
        return market;
    }

    for com in &COMMODITIES {
        let variance = rng.next_f64() * (PRICE_VARIANCE * 2.0) - PRICE_VARIANCE;
        let price = unit_price(
            com.base_price,
            variance,
            price_multiplier(station_type, com.category),
        );

        let stock = rng.next_int(STOCK_RANGE.0, STOCK_RANGE.1) as f64;
        let quantity = (stock * stock_multiplier(station_type, com.category))
            .round()
            .max(1.0) as u32;

        market.prices.insert(com.name.to_string(), price);
        market.quantities.insert(com.name.to_string(), quantity);
    }
    market
}
