//! Starlane - headless pilot: generates the galaxy, flies a course by
//! autopilot, trades along the way and saves the result.
//!
//! Usage: `starlane [DESTINATION]` where DESTINATION is a system name
//! (defaults to the last system in the galaxy).

use anyhow::{Context, Result};
use game::{
    BackendSync, DirStore, GameConfig, GameSession, HttpStore, PilotProfile, ProximityEvent,
    SaveStore,
};
use glam::Vec3;
use time::OffsetDateTime;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = GameConfig::load();
    let mut session = GameSession::from_config(&config);

    let destination = match std::env::args().nth(1) {
        Some(name) => session
            .galaxy
            .system_by_name(&name)
            .map(|s| s.id)
            .with_context(|| format!("no system named {:?}", name))?,
        None => session
            .galaxy
            .systems()
            .last()
            .map(|s| s.id)
            .context("galaxy has no systems")?,
    };

    let mut saves = SaveStore::new(DirStore::new(config.save_dir.clone()));
    if let Some(data) = saves.load_game("autosave")? {
        let view = session.restore(&data);
        log::info!("Resumed autosave in {}", view.name);
    }

    if session.plot_course(destination) {
        fly(&mut session);
    }

    let snapshot = session.snapshot(Vec3::ZERO);
    saves.save_game("autosave", &snapshot)?;
    saves.set_callsign(&config.multiplayer.callsign)?;

    if config.multiplayer.enabled {
        let sync = BackendSync::new(
            HttpStore::new(config.multiplayer.backend_url.clone()),
            config.multiplayer.clone(),
        );
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let callsign = &config.multiplayer.callsign;
        let profile = PilotProfile::from_player(callsign.clone(), &session.player, OffsetDateTime::now_utc());
        // Best effort: local progress is already saved.
        let synced = runtime.block_on(async {
            sync.save_player(callsign, &snapshot).await?;
            sync.update_profile(&profile).await?;
            sync.pilots().await
        });
        match synced {
            Ok(pilots) => {
                let active = pilots.iter().filter(|p| p.is_active()).count();
                log::info!("{} of {} pilots active in {}", active, pilots.len(), config.multiplayer.universe_id);
            }
            Err(e) => log::warn!("Backend sync failed: {}", e),
        }
    }

    let player = &session.player;
    println!("Starlane - seed {}", session.galaxy.seed);
    println!("  System : {}", session.galaxy.current_system().name);
    println!("  Ship   : {}", player.ship().name);
    println!("  Credits: {}", player.credits());
    println!(
        "  Hull {}/{}  Fuel {}/{}  Cargo {}/{}",
        player.hull().current(),
        player.hull().max(),
        player.fuel().current(),
        player.fuel().max(),
        player.cargo_total(),
        player.cargo_capacity()
    );
    Ok(())
}

/// Follow the plotted route gate by gate. At each market, sell whatever is
/// held and fill up on the cheapest listed commodity.
fn fly(session: &mut GameSession) {
    while let Some(gate) = session.next_gate() {
        let target = gate.target;
        if session.handle(ProximityEvent::GateReached(target)).is_none() {
            break;
        }
        trade_at_market(session);
    }
}

fn trade_at_market(session: &mut GameSession) {
    let Some(station) = session.galaxy.current_system().market_station() else {
        return;
    };
    let station_id = station.id;
    let cheapest = station
        .prices
        .iter()
        .min_by_key(|(_, &price)| price)
        .map(|(name, &price)| (name.clone(), price, station.quantity(name).unwrap_or(0)));

    session.handle(ProximityEvent::Docking(Some(station_id)));

    let held: Vec<(String, u32)> = session
        .player
        .cargo()
        .iter()
        .map(|(k, &v)| (k.clone(), v))
        .collect();
    for (item, qty) in held {
        if let Err(e) = session.sell(&item, qty) {
            log::debug!("Kept {} x {}: {}", qty, item, e);
        }
    }

    if let Some((item, price, stock)) = cheapest {
        let affordable = (session.player.credits() / price.max(1) as i64).clamp(0, u32::MAX as i64) as u32;
        let qty = affordable.min(session.player.free_cargo_space()).min(stock);
        if qty > 0 {
            if let Err(e) = session.buy(&item, qty) {
                log::debug!("Skipped buying {}: {}", item, e);
            }
        }
    }

    session.handle(ProximityEvent::Docking(None));
}
