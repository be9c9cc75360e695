//! End-to-end: generate a galaxy, fly a plotted course through gate events,
//! trade, save locally and to the backend, then reload into a new session.

use game::{
    BackendSync, DirStore, GameConfig, GameSession, MemoryRemote, MultiplayerSettings,
    ProximityEvent, SaveStore,
};
use glam::Vec3;
use procgen::{GalaxyConfig, SystemId};

fn config() -> GameConfig {
    GameConfig {
        galaxy: GalaxyConfig {
            seed: 2024,
            system_count: 12,
            shortcut_count: 4,
        },
        ..GameConfig::default()
    }
}

fn dock_at_market(session: &mut GameSession) {
    let id = session
        .galaxy
        .current_system()
        .market_station()
        .map(|s| s.id)
        .expect("every system has a market");
    session.handle(ProximityEvent::Docking(Some(id)));
}

#[test]
fn fly_trade_save_reload() {
    let config = config();
    let mut session = GameSession::from_config(&config);
    let destination = SystemId(11);

    // Buy at home.
    dock_at_market(&mut session);
    session.buy("Water", 5).unwrap();
    let credits_after_buy = session.player.credits();
    assert!(credits_after_buy < config.starting_credits);

    // Fly.
    assert!(session.plot_course(destination));
    let planned = session.galaxy.find_route(session.galaxy.start_id(), destination);
    let mut hops = 0;
    while let Some(gate) = session.next_gate() {
        let target = gate.target;
        let view = session.handle(ProximityEvent::GateReached(target)).unwrap();
        assert_eq!(view.system_id, target);
        assert!(session.docked_at().is_none());
        hops += 1;
    }
    assert_eq!(hops, planned.len() - 1);
    assert_eq!(session.galaxy.current_id(), destination);

    // Sell at the destination.
    dock_at_market(&mut session);
    let revenue = session.sell("Water", 5).unwrap();
    assert!(revenue > 0);
    assert!(session.player.cargo().is_empty());
    let credits = session.player.credits();

    // Save locally.
    let dir = tempfile::tempdir().unwrap();
    let mut saves = SaveStore::new(DirStore::new(dir.path()));
    let position = Vec3::new(120.0, -4.0, 880.0);
    let snapshot = session.snapshot(position);
    saves.save_game("autosave", &snapshot).unwrap();

    // Reload into a fresh session on the same seed.
    let mut resumed = GameSession::from_config(&config);
    assert_eq!(resumed.galaxy.current_id(), resumed.galaxy.start_id());
    let loaded = saves.load_game("autosave").unwrap().unwrap();
    assert_eq!(loaded.position(), position);
    let view = resumed.restore(&loaded);

    assert_eq!(view.system_id, destination);
    assert_eq!(resumed.galaxy.current_system().name, session.galaxy.current_system().name);
    assert_eq!(resumed.player.credits(), credits);
    assert_eq!(resumed.player.hull(), session.player.hull());
    assert_eq!(resumed.player.fuel(), session.player.fuel());
    assert_eq!(resumed.player.ship().id, session.player.ship().id);
}

#[test]
fn upgrade_ship_then_restore_keeps_class() {
    let mut session = GameSession::from_config(&config());
    let yard = session.galaxy.current_system().shipyard().unwrap().id;
    session.handle(ProximityEvent::Docking(Some(yard)));
    session.purchase_ship("viper").unwrap();
    session.player.take_damage(120);

    let snapshot = session.snapshot(Vec3::ZERO);
    let mut resumed = GameSession::from_config(&config());
    resumed.restore(&snapshot);
    assert_eq!(resumed.player.ship().id, "viper");
    assert_eq!(resumed.player.cargo_capacity(), 10);
    assert_eq!(resumed.player.hull().current(), 80);
    assert_eq!(resumed.player.hull().max(), 150);
    assert_eq!(resumed.player.credits(), 35_000);
}

#[tokio::test]
async fn backend_failure_does_not_touch_local_state() {
    let session = GameSession::from_config(&config());
    let settings = MultiplayerSettings {
        enabled: true,
        universe_id: "test".into(),
        callsign: "Ace".into(),
        ..MultiplayerSettings::default()
    };
    let sync = BackendSync::new(MemoryRemote::new(), settings);

    let snapshot = session.snapshot(Vec3::ZERO);
    sync.remote().set_offline(true);
    assert!(sync.save_player("Ace", &snapshot).await.is_err());
    assert_eq!(session.player.credits(), 50_000);

    sync.remote().set_offline(false);
    sync.save_player("Ace", &snapshot).await.unwrap();
    let remote = sync.load_player("Ace").await.unwrap().unwrap();

    let mut resumed = GameSession::from_config(&config());
    resumed.restore(&remote);
    assert_eq!(resumed.player.credits(), session.player.credits());
    assert_eq!(resumed.galaxy.current_id(), session.galaxy.current_id());
}
