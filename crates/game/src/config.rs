//! Game configuration (galaxy, economy, saves, multiplayer). Loaded from config.ron at startup.

use procgen::GalaxyConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::player::STARTING_CREDITS;

/// Persistent game settings. Loaded from `config.ron` in the current directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Galaxy generation parameters.
    #[serde(default)]
    pub galaxy: GalaxyConfig,
    /// Credits a new pilot starts with.
    #[serde(default = "default_starting_credits")]
    pub starting_credits: i64,
    /// Directory holding local save files.
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,
    #[serde(default)]
    pub multiplayer: MultiplayerSettings,
}

/// Shared-universe backend settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MultiplayerSettings {
    /// Off by default: everything stays local.
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_universe_id")]
    pub universe_id: String,
    #[serde(default = "default_callsign")]
    pub callsign: String,
    /// Root URL of the realtime-database REST endpoint.
    #[serde(default)]
    pub backend_url: String,
}

fn default_starting_credits() -> i64 {
    STARTING_CREDITS
}
fn default_save_dir() -> PathBuf {
    PathBuf::from("saves")
}
fn default_universe_id() -> String {
    "offline".to_string()
}
fn default_callsign() -> String {
    "Pilot".to_string()
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            galaxy: GalaxyConfig::default(),
            starting_credits: default_starting_credits(),
            save_dir: default_save_dir(),
            multiplayer: MultiplayerSettings::default(),
        }
    }
}

impl Default for MultiplayerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            universe_id: default_universe_id(),
            callsign: default_callsign(),
            backend_url: String::new(),
        }
    }
}

impl GameConfig {
    /// Load config from `config.ron`. If the file is missing or invalid, returns default config.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    /// Save current config to `config.ron`. Logs on error.
    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(data) = std::fs::read_to_string(path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    pub fn save_to(&self, path: &Path) {
        match ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            Ok(s) => {
                if let Err(e) = std::fs::write(path, s) {
                    log::warn!("Could not write config to {:?}: {}", path, e);
                }
            }
            Err(e) => log::warn!("Could not serialize config: {}", e),
        }
    }
}

fn config_path() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")).join("config.ron")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = GameConfig::default();
        assert_eq!(c.galaxy.seed, 1337);
        assert_eq!(c.galaxy.system_count, 50);
        assert_eq!(c.starting_credits, 50_000);
        assert_eq!(c.save_dir, PathBuf::from("saves"));
        assert!(!c.multiplayer.enabled);
        assert_eq!(c.multiplayer.callsign, "Pilot");
    }

    #[test]
    fn partial_file_fills_defaults() {
        let c: GameConfig = ron::from_str("(galaxy: (seed: 42), multiplayer: (enabled: true))").unwrap();
        assert_eq!(c.galaxy.seed, 42);
        assert_eq!(c.galaxy.shortcut_count, 20);
        assert!(c.multiplayer.enabled);
        assert_eq!(c.multiplayer.universe_id, "offline");
        assert_eq!(c.starting_credits, 50_000);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        let mut c = GameConfig::default();
        c.galaxy.seed = 9;
        c.multiplayer.callsign = "Maverick".into();
        c.save_to(&path);
        assert_eq!(GameConfig::load_from(&path), c);
    }

    #[test]
    fn missing_or_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.ron");
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());
        std::fs::write(&path, "not ron at all {").unwrap();
        assert_eq!(GameConfig::load_from(&path), GameConfig::default());
    }
}
