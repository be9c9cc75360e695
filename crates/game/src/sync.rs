//! Shared-universe backend: player records, sector chat and the pilot
//! directory per universe, plus a global universe directory, stored in a
//! realtime-database style JSON tree.
//!
//! Sync is a separate step from local play. Nothing here touches a live
//! [`PlayerState`](crate::player::PlayerState); callers snapshot first and
//! restore explicitly.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::future::Future;
use thiserror::Error;
use time::OffsetDateTime;

use crate::chat::ChatMessage;
use crate::config::MultiplayerSettings;
use crate::pilots::PilotProfile;
use crate::save::SaveData;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("backend request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("backend returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("backend data malformed: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend unreachable")]
    Offline,
}

/// Entry in the universe directory.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct UniverseMeta {
    pub name: Option<String>,
    pub creator: Option<String>,
    /// Unix seconds.
    pub created_at: i64,
}

/// A JSON tree addressed by slash-separated paths.
pub trait RemoteStore: Send + Sync {
    /// The node at `path`, or `None` when absent.
    fn get(&self, path: &str) -> impl Future<Output = Result<Option<Value>, SyncError>> + Send;

    /// Merge the children of `value` into the node at `path`. Children not
    /// named in `value` are left alone.
    fn patch(&self, path: &str, value: Value) -> impl Future<Output = Result<(), SyncError>> + Send;

    /// Append `value` as a new child of `path` under a generated key, which
    /// is returned. Keys sort in insertion order.
    fn push(&self, path: &str, value: Value) -> impl Future<Output = Result<String, SyncError>> + Send;
}

/// Body of a successful push reply.
#[derive(Debug, Deserialize)]
struct PushReply {
    name: String,
}

/// REST client for a `{base}/{path}.json` style backend.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    fn node_url(&self, path: &str) -> String {
        format!(
            "{}/{}.json",
            self.base_url.trim_end_matches('/'),
            path.trim_matches('/')
        )
    }
}

impl RemoteStore for HttpStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, SyncError> {
        let url = self.node_url(path);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let value: Value = response.json().await?;
        Ok((!value.is_null()).then_some(value))
    }

    async fn patch(&self, path: &str, value: Value) -> Result<(), SyncError> {
        let url = self.node_url(path);
        let response = self.client.patch(&url).json(&value).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                url,
            });
        }
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, SyncError> {
        let url = self.node_url(path);
        let response = self.client.post(&url).json(&value).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SyncError::Status {
                status: status.as_u16(),
                url,
            });
        }
        let reply: PushReply = response.json().await?;
        Ok(reply.name)
    }
}

/// The same tree held in memory. Can be switched offline to simulate an
/// unreachable backend.
#[derive(Debug, Default)]
pub struct MemoryRemote {
    root: Mutex<Value>,
    offline: Mutex<bool>,
    pushed: Mutex<u64>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_offline(&self, offline: bool) {
        *self.offline.lock() = offline;
    }

    /// Copy of the whole tree.
    pub fn dump(&self) -> Value {
        self.root.lock().clone()
    }

    fn check_online(&self) -> Result<(), SyncError> {
        if *self.offline.lock() {
            Err(SyncError::Offline)
        } else {
            Ok(())
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// The child `key` of `node`, turning `node` into an object first if needed.
fn child_mut<'a>(node: &'a mut Value, key: &str) -> &'a mut Value {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    match node {
        Value::Object(map) => map.entry(key).or_insert(Value::Null),
        other => other,
    }
}

impl RemoteStore for MemoryRemote {
    async fn get(&self, path: &str) -> Result<Option<Value>, SyncError> {
        self.check_online()?;
        let root = self.root.lock();
        let mut node = &*root;
        for key in segments(path) {
            match node.get(key) {
                Some(child) => node = child,
                None => return Ok(None),
            }
        }
        Ok((!node.is_null()).then(|| node.clone()))
    }

    async fn patch(&self, path: &str, value: Value) -> Result<(), SyncError> {
        self.check_online()?;
        let mut root = self.root.lock();
        let mut node = &mut *root;
        for key in segments(path) {
            node = child_mut(node, key);
        }
        match value {
            Value::Object(children) => {
                if !node.is_object() {
                    *node = Value::Object(Map::new());
                }
                if let Value::Object(map) = node {
                    map.extend(children);
                }
            }
            other => *node = other,
        }
        Ok(())
    }

    async fn push(&self, path: &str, value: Value) -> Result<String, SyncError> {
        self.check_online()?;
        let key = {
            let mut pushed = self.pushed.lock();
            *pushed += 1;
            format!("-m{:012}", *pushed)
        };
        let mut root = self.root.lock();
        let mut node = &mut *root;
        for segment in segments(path) {
            node = child_mut(node, segment);
        }
        *child_mut(node, &key) = value;
        Ok(key)
    }
}

/// Player, chat and pilot records for one configured universe.
#[derive(Debug)]
pub struct BackendSync<S> {
    remote: S,
    settings: MultiplayerSettings,
}

impl<S: RemoteStore> BackendSync<S> {
    pub fn new(remote: S, settings: MultiplayerSettings) -> Self {
        Self { remote, settings }
    }

    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    pub fn settings(&self) -> &MultiplayerSettings {
        &self.settings
    }

    pub fn remote(&self) -> &S {
        &self.remote
    }

    fn universe_path(&self, node: &str) -> String {
        format!("universes/{}/{}", self.settings.universe_id, node)
    }

    fn players_path(&self) -> String {
        self.universe_path("players")
    }

    /// Upload a pilot's snapshot. No-op while multiplayer is disabled.
    pub async fn save_player(&self, callsign: &str, data: &SaveData) -> Result<(), SyncError> {
        if !self.settings.enabled {
            return Ok(());
        }
        let path = format!("{}/{}", self.players_path(), callsign);
        self.remote.patch(&path, serde_json::to_value(data)?).await?;
        log::info!("Synced {} to universe {}", callsign, self.settings.universe_id);
        Ok(())
    }

    pub async fn load_player(&self, callsign: &str) -> Result<Option<SaveData>, SyncError> {
        if !self.settings.enabled {
            return Ok(None);
        }
        let path = format!("{}/{}", self.players_path(), callsign);
        match self.remote.get(&path).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Every pilot in the universe, by callsign.
    pub async fn all_players(&self) -> Result<Option<BTreeMap<String, SaveData>>, SyncError> {
        if !self.settings.enabled {
            return Ok(None);
        }
        match self.remote.get(&self.players_path()).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Post to the sector chat. Returns the message's key, or `None` while
    /// multiplayer is disabled.
    pub async fn post_message(&self, message: &ChatMessage) -> Result<Option<String>, SyncError> {
        if !self.settings.enabled {
            return Ok(None);
        }
        let key = self
            .remote
            .push(&self.universe_path("chat"), serde_json::to_value(message)?)
            .await?;
        log::debug!("Posted chat message {} as {}", key, message.sender);
        Ok(Some(key))
    }

    /// Every chat message in the universe, oldest first. Feed the result to
    /// a [`ChatLog`](crate::chat::ChatLog) to dedupe and trim it.
    pub async fn messages(&self) -> Result<Vec<ChatMessage>, SyncError> {
        if !self.settings.enabled {
            return Ok(Vec::new());
        }
        let Some(value) = self.remote.get(&self.universe_path("chat")).await? else {
            return Ok(Vec::new());
        };
        let by_key: BTreeMap<String, ChatMessage> = serde_json::from_value(value)?;
        let mut messages: Vec<ChatMessage> = by_key.into_values().collect();
        messages.sort_by(|a, b| (a.timestamp, &a.sender).cmp(&(b.timestamp, &b.sender)));
        Ok(messages)
    }

    /// Publish this pilot's directory entry. No-op while multiplayer is
    /// disabled.
    pub async fn update_profile(&self, profile: &PilotProfile) -> Result<(), SyncError> {
        if !self.settings.enabled {
            return Ok(());
        }
        let path = format!("{}/{}", self.universe_path("pilots"), profile.callsign);
        self.remote.patch(&path, serde_json::to_value(profile)?).await
    }

    /// The pilot directory, by callsign.
    pub async fn pilots(&self) -> Result<Vec<PilotProfile>, SyncError> {
        if !self.settings.enabled {
            return Ok(Vec::new());
        }
        match self.remote.get(&self.universe_path("pilots")).await? {
            Some(value) => {
                let by_callsign: BTreeMap<String, PilotProfile> = serde_json::from_value(value)?;
                Ok(by_callsign.into_values().collect())
            }
            None => Ok(Vec::new()),
        }
    }

    /// The universe directory. Available whether or not multiplayer is on,
    /// so a pilot can pick a universe before joining.
    pub async fn list_universes(&self) -> Result<BTreeMap<String, UniverseMeta>, SyncError> {
        match self.remote.get("universe_list").await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(BTreeMap::new()),
        }
    }

    pub async fn register_universe(&self, id: &str, name: &str, creator: &str) -> Result<(), SyncError> {
        let meta = UniverseMeta {
            name: Some(name.to_string()),
            creator: Some(creator.to_string()),
            created_at: OffsetDateTime::now_utc().unix_timestamp(),
        };
        let mut entry = Map::new();
        entry.insert(id.to_string(), serde_json::to_value(meta)?);
        self.remote.patch("universe_list", Value::Object(entry)).await?;
        log::info!("Registered universe {} ({})", id, name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::{ChatLog, MAX_CHAT_MESSAGES};
    use procgen::SystemId;
    use serde_json::json;
    use time::Duration;

    fn settings(enabled: bool) -> MultiplayerSettings {
        MultiplayerSettings {
            enabled,
            universe_id: "alpha".into(),
            ..MultiplayerSettings::default()
        }
    }

    fn snapshot(credits: i64) -> SaveData {
        SaveData {
            credits,
            current_system_id: SystemId(3),
            ..Default::default()
        }
    }

    #[test]
    fn http_node_urls() {
        let store = HttpStore::new("https://example.test/");
        assert_eq!(
            store.node_url("universes/alpha/players/Ace"),
            "https://example.test/universes/alpha/players/Ace.json"
        );
        assert_eq!(store.node_url("/universe_list"), "https://example.test/universe_list.json");
    }

    #[tokio::test]
    async fn memory_patch_merges_children() {
        let remote = MemoryRemote::new();
        remote.patch("a/b", json!({"x": 1, "y": 2})).await.unwrap();
        remote.patch("a/b", json!({"y": 3})).await.unwrap();
        assert_eq!(remote.get("a/b").await.unwrap(), Some(json!({"x": 1, "y": 3})));
        assert_eq!(remote.get("a/missing").await.unwrap(), None);
        assert_eq!(remote.get("a/b/x").await.unwrap(), Some(json!(1)));
    }

    #[tokio::test]
    async fn player_round_trip() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(true));
        sync.save_player("Ace", &snapshot(500)).await.unwrap();
        sync.save_player("Nova", &snapshot(900)).await.unwrap();

        assert_eq!(sync.load_player("Ace").await.unwrap(), Some(snapshot(500)));
        assert_eq!(sync.load_player("Ghost").await.unwrap(), None);

        let all = sync.all_players().await.unwrap().unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all["Nova"].credits, 900);

        let tree = sync.remote().dump();
        assert_eq!(tree["universes"]["alpha"]["players"]["Ace"]["Credits"], 500);
    }

    #[tokio::test]
    async fn disabled_sync_reads_nothing_and_writes_nothing() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(false));
        sync.save_player("Ace", &snapshot(500)).await.unwrap();
        assert!(sync.remote().dump().is_null());
        assert_eq!(sync.load_player("Ace").await.unwrap(), None);
        assert_eq!(sync.all_players().await.unwrap(), None);
    }

    #[tokio::test]
    async fn transport_failures_propagate() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(true));
        sync.remote().set_offline(true);
        assert!(matches!(
            sync.save_player("Ace", &snapshot(1)).await,
            Err(SyncError::Offline)
        ));
        assert!(matches!(sync.load_player("Ace").await, Err(SyncError::Offline)));

        sync.remote().set_offline(false);
        assert_eq!(sync.load_player("Ace").await.unwrap(), None);
    }

    #[tokio::test]
    async fn universe_directory() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(false));
        assert!(sync.list_universes().await.unwrap().is_empty());

        sync.register_universe("alpha", "Alpha Sector", "Ace").await.unwrap();
        sync.register_universe("beta", "Beta Reach", "Nova").await.unwrap();

        let list = sync.list_universes().await.unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list["alpha"].name.as_deref(), Some("Alpha Sector"));
        assert_eq!(list["beta"].creator.as_deref(), Some("Nova"));
        assert!(list["alpha"].created_at > 0);
        assert!(sync.remote().dump()["universe_list"]["alpha"].get("CreatedAt").is_some());
    }

    #[tokio::test]
    async fn memory_push_appends_in_order() {
        let remote = MemoryRemote::new();
        let first = remote.push("log", json!("a")).await.unwrap();
        let second = remote.push("log", json!("b")).await.unwrap();
        assert!(first < second);
        let node = remote.get("log").await.unwrap().unwrap();
        assert_eq!(node[&first], "a");
        assert_eq!(node[&second], "b");
        assert_eq!(node.as_object().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn chat_posts_round_trip_into_log() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(true));
        let now = OffsetDateTime::now_utc();
        let later = ChatMessage::new("Nova", "jumping to Vega", SystemId(3), now + Duration::seconds(2));
        let earlier = ChatMessage::new("Ace", "o7", SystemId(0), now);

        assert!(sync.post_message(&later).await.unwrap().is_some());
        assert!(sync.post_message(&earlier).await.unwrap().is_some());
        // Reposting the same message creates a second node remotely.
        sync.post_message(&earlier).await.unwrap();

        let fetched = sync.messages().await.unwrap();
        assert_eq!(fetched.len(), 3);
        assert_eq!(fetched[0].sender, "Ace");
        assert_eq!(fetched[2], later);

        let mut log = ChatLog::new();
        assert_eq!(log.extend(fetched.clone()), 2);
        assert_eq!(log.extend(fetched), 0);
        assert_eq!(log.messages().back(), Some(&later));

        let chat = &sync.remote().dump()["universes"]["alpha"]["chat"];
        assert_eq!(chat.as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn chat_history_is_capped_in_log() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(true));
        let start = OffsetDateTime::from_unix_timestamp(1_700_000_000).unwrap();
        for i in 0..(MAX_CHAT_MESSAGES as i64 + 5) {
            let m = ChatMessage::new("Ace", format!("#{}", i), SystemId(0), start + Duration::seconds(i));
            sync.post_message(&m).await.unwrap();
        }
        let mut log = ChatLog::new();
        log.extend(sync.messages().await.unwrap());
        assert_eq!(log.len(), MAX_CHAT_MESSAGES);
        assert_eq!(log.messages()[0].text, "#5");
    }

    #[tokio::test]
    async fn pilot_directory() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(true));
        let now = OffsetDateTime::now_utc();
        let active = PilotProfile {
            callsign: "Nova".into(),
            ship_class_id: "viper".into(),
            current_system_id: SystemId(2),
            last_seen: now,
            is_supporter: true,
        };
        let idle = PilotProfile {
            callsign: "Ace".into(),
            last_seen: now - Duration::minutes(30),
            ..PilotProfile::default()
        };
        sync.update_profile(&active).await.unwrap();
        sync.update_profile(&idle).await.unwrap();

        let pilots = sync.pilots().await.unwrap();
        let callsigns: Vec<_> = pilots.iter().map(|p| p.callsign.as_str()).collect();
        assert_eq!(callsigns, ["Ace", "Nova"]);
        assert!(!pilots[0].is_active_at(now));
        assert!(pilots[1].is_active_at(now));
        assert_eq!(pilots[1].current_system_id, SystemId(2));

        let moved = PilotProfile {
            current_system_id: SystemId(5),
            ..active
        };
        sync.update_profile(&moved).await.unwrap();
        let pilots = sync.pilots().await.unwrap();
        assert_eq!(pilots.len(), 2);
        assert_eq!(pilots[1].current_system_id, SystemId(5));
    }

    #[tokio::test]
    async fn disabled_sync_skips_chat_and_pilots() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(false));
        let message = ChatMessage::new("Ace", "anyone?", SystemId(0), OffsetDateTime::now_utc());
        assert_eq!(sync.post_message(&message).await.unwrap(), None);
        sync.update_profile(&PilotProfile::default()).await.unwrap();
        assert!(sync.remote().dump().is_null());
        assert!(sync.messages().await.unwrap().is_empty());
        assert!(sync.pilots().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn chat_failures_propagate() {
        let sync = BackendSync::new(MemoryRemote::new(), settings(true));
        sync.remote().set_offline(true);
        let message = ChatMessage::new("Ace", "hello?", SystemId(0), OffsetDateTime::now_utc());
        assert!(matches!(sync.post_message(&message).await, Err(SyncError::Offline)));
        assert!(matches!(sync.messages().await, Err(SyncError::Offline)));
        assert!(matches!(sync.pilots().await, Err(SyncError::Offline)));
    }
}
