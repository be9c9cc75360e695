//! Pilot directory entries: who is flying in a universe and where.

use procgen::SystemId;
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::player::PlayerState;
use crate::save::{lenient_system_id, UNKNOWN_SYSTEM};
use crate::ship_class::STARTER_SHIP_ID;

/// A pilot counts as active this long after they were last seen.
pub const ACTIVE_WINDOW: Duration = Duration::minutes(5);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PilotProfile {
    pub callsign: String,
    pub ship_class_id: String,
    #[serde(deserialize_with = "lenient_system_id")]
    pub current_system_id: SystemId,
    #[serde(with = "time::serde::rfc3339")]
    pub last_seen: OffsetDateTime,
    pub is_supporter: bool,
}

impl Default for PilotProfile {
    fn default() -> Self {
        Self {
            callsign: String::new(),
            ship_class_id: STARTER_SHIP_ID.to_string(),
            current_system_id: UNKNOWN_SYSTEM,
            last_seen: OffsetDateTime::UNIX_EPOCH,
            is_supporter: false,
        }
    }
}

impl PilotProfile {
    /// Directory entry for `player`, seen at `now`.
    pub fn from_player(callsign: impl Into<String>, player: &PlayerState, now: OffsetDateTime) -> Self {
        Self {
            callsign: callsign.into(),
            ship_class_id: player.ship().id.to_string(),
            current_system_id: player.current_system(),
            last_seen: now,
            is_supporter: player.is_supporter(),
        }
    }

    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        now - self.last_seen < ACTIVE_WINDOW
    }

    pub fn is_active(&self) -> bool {
        self.is_active_at(OffsetDateTime::now_utc())
    }
}
