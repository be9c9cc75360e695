//! Local saves: a manifest of save names plus one snapshot per name, kept in
//! a string key/value store.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::save::SaveData;

const MANIFEST_KEY: &str = "Starlane_SaveManifest";
const CALLSIGN_KEY: &str = "Starlane_ActiveCallsign";

fn save_key(name: &str) -> String {
    format!("Starlane_Save_{}", name)
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O: {0}")]
    Io(#[from] io::Error),
    #[error("corrupt save data: {0}")]
    Json(#[from] serde_json::Error),
}

/// Minimal string key/value storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// One `.json` file per key inside a directory.
#[derive(Debug, Clone)]
pub struct DirStore {
    root: PathBuf,
}

impl DirStore {
    /// The directory is created on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.root.join(format!("{}.json", file))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.root)?;
        std::fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        match std::fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// In-memory store for tests and throwaway sessions.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Named save slots over a [`KeyValueStore`].
#[derive(Debug, Clone)]
pub struct SaveStore<S> {
    store: S,
}

impl<S: KeyValueStore> SaveStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Save names in the order they were first written.
    pub fn list_saves(&self) -> Result<Vec<String>, StorageError> {
        match self.store.get(MANIFEST_KEY)? {
            Some(json) if !json.trim().is_empty() => Ok(serde_json::from_str(&json)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Write `data` under `name`, adding the name to the manifest if new.
    pub fn save_game(&mut self, name: &str, data: &SaveData) -> Result<(), StorageError> {
        let mut saves = self.list_saves()?;
        if !saves.iter().any(|s| s == name) {
            saves.push(name.to_string());
            self.store.set(MANIFEST_KEY, &serde_json::to_string(&saves)?)?;
        }
        self.store.set(&save_key(name), &data.to_json()?)?;
        log::info!("Saved game {:?}", name);
        Ok(())
    }

    /// `None` when no save exists under `name`.
    pub fn load_game(&self, name: &str) -> Result<Option<SaveData>, StorageError> {
        match self.store.get(&save_key(name))? {
            Some(json) if !json.trim().is_empty() => Ok(Some(SaveData::from_json(&json)?)),
            _ => Ok(None),
        }
    }

    pub fn delete_game(&mut self, name: &str) -> Result<(), StorageError> {
        self.store.remove(&save_key(name))?;
        let mut saves = self.list_saves()?;
        let before = saves.len();
        saves.retain(|s| s != name);
        if saves.len() != before {
            self.store.set(MANIFEST_KEY, &serde_json::to_string(&saves)?)?;
        }
        log::debug!("Deleted save {:?}", name);
        Ok(())
    }

    /// The last callsign the pilot flew under.
    pub fn callsign(&self) -> Result<Option<String>, StorageError> {
        self.store.get(CALLSIGN_KEY)
    }

    pub fn set_callsign(&mut self, callsign: &str) -> Result<(), StorageError> {
        self.store.set(CALLSIGN_KEY, callsign)
    }
}
