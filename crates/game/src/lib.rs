//! Starlane game core: ships, the pilot, trading, saves and the session that
//! ties them to a generated galaxy.

pub mod chat;
pub mod config;
pub mod pilots;
pub mod player;
pub mod save;
pub mod session;
pub mod ship_class;
pub mod storage;
pub mod sync;
pub mod trade;

pub use chat::{ChatLog, ChatMessage, MAX_CHAT_MESSAGES};
pub use config::{GameConfig, MultiplayerSettings};
pub use pilots::{PilotProfile, ACTIVE_WINDOW};
pub use player::{PlayerState, DEFAULT_MAX_SHIELD, STARTING_CREDITS};
pub use save::SaveData;
pub use session::{GameSession, GateView, PlanetView, ProximityEvent, StationView, SystemView};
pub use ship_class::{ship_class, starter_ship, ShipClass, ShipStats, SHIP_CLASSES, STARTER_SHIP_ID};
pub use storage::{DirStore, KeyValueStore, MemoryStore, SaveStore, StorageError};
pub use sync::{BackendSync, HttpStore, MemoryRemote, RemoteStore, SyncError, UniverseMeta};
pub use trade::TradeError;
