//! Buying and selling at station markets, and buying ships.
//!
//! These are the checks the player primitives leave to their callers: cargo
//! capacity, stock, and a zero floor on credits. A failed check leaves the
//! player untouched.

use procgen::SpaceStation;
use thiserror::Error;

use crate::player::PlayerState;
use crate::ship_class::ShipClass;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TradeError {
    #[error("not docked at a station")]
    NotDocked,
    #[error("{0} has no commodity market")]
    NoMarket(String),
    #[error("not docked at a shipyard")]
    NoShipyard,
    #[error("no ship class {0:?}")]
    UnknownShipClass(String),
    #[error("{0} is not traded here")]
    UnknownCommodity(String),
    #[error("quantity must be at least 1")]
    ZeroQuantity,
    #[error("need {needed} credits, have {available}")]
    InsufficientCredits { needed: i64, available: i64 },
    #[error("need {needed} free cargo space, have {available}")]
    InsufficientCargoSpace { needed: u32, available: u32 },
    #[error("station stocks only {available} units")]
    InsufficientStock { available: u32 },
    #[error("holding only {held} units")]
    InsufficientHeld { held: u32 },
}

/// Unit price of `commodity` at `station`, checking the station trades it.
fn listed_price(station: &SpaceStation, commodity: &str) -> Result<u32, TradeError> {
    if !station.has_market() {
        return Err(TradeError::NoMarket(station.name.clone()));
    }
    station
        .price(commodity)
        .ok_or_else(|| TradeError::UnknownCommodity(commodity.to_string()))
}

/// Buy `qty` units of `commodity`. Returns the total cost.
pub fn buy(
    player: &mut PlayerState,
    station: &SpaceStation,
    commodity: &str,
    qty: u32,
) -> Result<i64, TradeError> {
    let price = listed_price(station, commodity)?;
    if qty == 0 {
        return Err(TradeError::ZeroQuantity);
    }
    let stock = station.quantity(commodity).unwrap_or(0);
    if qty > stock {
        return Err(TradeError::InsufficientStock { available: stock });
    }
    let space = player.free_cargo_space();
    if qty > space {
        return Err(TradeError::InsufficientCargoSpace {
            needed: qty,
            available: space,
        });
    }
    let cost = price as i64 * qty as i64;
    if cost > player.credits() {
        return Err(TradeError::InsufficientCredits {
            needed: cost,
            available: player.credits(),
        });
    }

    player.modify_credits(-cost);
    player.add_cargo(commodity, qty);
    log::debug!("Bought {} x {} at {} for {}", qty, commodity, station.name, cost);
    Ok(cost)
}

/// Sell `qty` units of `commodity`. Returns the revenue.
pub fn sell(
    player: &mut PlayerState,
    station: &SpaceStation,
    commodity: &str,
    qty: u32,
) -> Result<i64, TradeError> {
    let price = listed_price(station, commodity)?;
    if qty == 0 {
        return Err(TradeError::ZeroQuantity);
    }
    let held = player.cargo_of(commodity);
    if qty > held {
        return Err(TradeError::InsufficientHeld { held });
    }

    let revenue = price as i64 * qty as i64;
    player.remove_cargo(commodity, qty);
    player.modify_credits(revenue);
    log::debug!("Sold {} x {} at {} for {}", qty, commodity, station.name, revenue);
    Ok(revenue)
}

/// Pay for `class` and switch to it.
pub fn purchase_ship(player: &mut PlayerState, class: &'static ShipClass) -> Result<(), TradeError> {
    let price = class.price as i64;
    if price > player.credits() {
        return Err(TradeError::InsufficientCredits {
            needed: price,
            available: player.credits(),
        });
    }
    player.modify_credits(-price);
    player.change_ship(class);
    log::info!("Purchased {} for {}", class.name, price);
    Ok(())
}
