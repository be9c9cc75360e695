//! Persistent snapshot of a pilot, shared by local saves and the backend.
//!
//! Field names are PascalCase on the wire so saves written by earlier builds
//! keep loading; every field defaults when absent.

use procgen::SystemId;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use time::OffsetDateTime;

use crate::ship_class::STARTER_SHIP_ID;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct SaveData {
    pub credits: i64,
    pub fuel: u32,
    pub hull: u32,
    pub cargo: BTreeMap<String, u32>,
    #[serde(deserialize_with = "lenient_system_id")]
    pub current_system_id: SystemId,
    pub ship_class_id: String,
    pub position_x: f32,
    pub position_y: f32,
    pub position_z: f32,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    pub is_supporter: bool,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            credits: 0,
            fuel: 0,
            hull: 0,
            cargo: BTreeMap::new(),
            current_system_id: SystemId(0),
            ship_class_id: STARTER_SHIP_ID.to_string(),
            position_x: 0.0,
            position_y: 0.0,
            position_z: 0.0,
            timestamp: OffsetDateTime::UNIX_EPOCH,
            is_supporter: false,
        }
    }
}

/// Older saves wrote the system id as a string. Numeric strings and the
/// `SYS-007` display form parse; anything else becomes an id no galaxy
/// contains, so restoring falls back to the start system.
pub(crate) fn lenient_system_id<'de, D>(deserializer: D) -> Result<SystemId, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Id(u32),
        Text(String),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Id(id) => SystemId(id),
        Raw::Text(text) => {
            let digits = text.strip_prefix("SYS-").unwrap_or(&text);
            digits.parse().map(SystemId).unwrap_or(UNKNOWN_SYSTEM)
        }
    })
}

/// Stand-in for a system id that could not be read.
pub const UNKNOWN_SYSTEM: SystemId = SystemId(u32::MAX);

impl SaveData {
    pub fn position(&self) -> glam::Vec3 {
        glam::Vec3::new(self.position_x, self.position_y, self.position_z)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn wire_names_are_pascal_case() {
        let mut data = SaveData {
            credits: 1500,
            current_system_id: SystemId(7),
            timestamp: datetime!(2024-03-01 12:00 UTC),
            ..Default::default()
        };
        data.cargo.insert("Gold".into(), 3);

        let value = serde_json::to_value(&data).unwrap();
        assert_eq!(value["Credits"], 1500);
        assert_eq!(value["CurrentSystemId"], 7);
        assert_eq!(value["Cargo"]["Gold"], 3);
        assert_eq!(value["ShipClassId"], "sidewinder");
        assert_eq!(value["IsSupporter"], false);
        assert_eq!(value["Timestamp"], "2024-03-01T12:00:00Z");
        assert!(value.get("PositionZ").is_some());
    }

    #[test]
    fn legacy_save_without_ship_or_timestamp_loads() {
        let json = r#"{"Credits":900,"Fuel":12,"Hull":80,"Cargo":{"Water":4},"CurrentSystemId":3}"#;
        let data = SaveData::from_json(json).unwrap();
        assert_eq!(data.credits, 900);
        assert_eq!(data.cargo["Water"], 4);
        assert_eq!(data.current_system_id, SystemId(3));
        assert_eq!(data.ship_class_id, STARTER_SHIP_ID);
        assert_eq!(data.timestamp, OffsetDateTime::UNIX_EPOCH);
    }

    #[test]
    fn string_system_ids_are_tolerated() {
        let data = SaveData::from_json(r#"{"CurrentSystemId":"12"}"#).unwrap();
        assert_eq!(data.current_system_id, SystemId(12));
        let data = SaveData::from_json(r#"{"CurrentSystemId":"SYS-004"}"#).unwrap();
        assert_eq!(data.current_system_id, SystemId(4));
        let data =
            SaveData::from_json(r#"{"CurrentSystemId":"3f2a9c1e-77b0-4c1d-9a8e-5b6f0d2e1c44"}"#).unwrap();
        assert_eq!(data.current_system_id, UNKNOWN_SYSTEM);
    }

    #[test]
    fn json_round_trip() {
        let data = SaveData {
            credits: -20,
            fuel: 5,
            hull: 60,
            ship_class_id: "viper".into(),
            position_x: 1.5,
            position_y: -2.0,
            position_z: 300.25,
            timestamp: datetime!(2025-11-30 08:15:42 UTC),
            is_supporter: true,
            ..Default::default()
        };
        let back = SaveData::from_json(&data.to_json().unwrap()).unwrap();
        assert_eq!(back, data);
        assert_eq!(back.position(), glam::Vec3::new(1.5, -2.0, 300.25));
    }
}
