//! Key-value save storage and the persisted run document.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use rampart_core::constants::{CASTLE_MAX_HP, STARTING_GOLD};
use rampart_core::enums::{SkillId, Stat};

use crate::combatant::StatBlock;

#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("save storage I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize save data: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// String key-value storage, one JSON document per key.
pub trait SaveStore {
    /// Stored document, or `None` when absent or unreadable.
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError>;
    /// Removing a missing key is not an error.
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

/// In-process store. Default for tests and embedded hosts.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SaveStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store backed by a directory, one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl SaveStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        let path = self.path_for(key);
        match fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) if e.kind() == io::ErrorKind::NotFound => None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to read save file");
                None
            }
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(&path)?;
        }
        Ok(())
    }
}

/// Read and parse a document. Missing and malformed documents both come back
/// as `None`; the malformed case is logged.
pub fn load_json<T: DeserializeOwned>(store: &dyn SaveStore, key: &str) -> Option<T> {
    let json = store.get(key)?;
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            warn!(key, error = %e, "discarding corrupt save document");
            None
        }
    }
}

pub fn store_json<T: Serialize>(
    store: &mut dyn SaveStore,
    key: &str,
    value: &T,
) -> Result<(), PersistenceError> {
    let json = serde_json::to_string_pretty(value)?;
    store.set(key, &json)?;
    debug!(key, bytes = json.len(), "save written");
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CastleSave {
    pub hp: f32,
    pub max_hp: f32,
}

impl Default for CastleSave {
    fn default() -> Self {
        Self {
            hp: CASTLE_MAX_HP,
            max_hp: CASTLE_MAX_HP,
        }
    }
}

/// The main run document. Every missing field falls back to its starting value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SaveData {
    pub gold: i64,
    /// Last wave reached. A resumed run starts between waves.
    pub wave: u32,
    pub kills: u32,
    pub gems: u32,
    pub castle: CastleSave,
    /// Purchased stats only; skill and meta bonuses are derived on load.
    pub hero: StatBlock,
    pub upgrade_levels: BTreeMap<Stat, u32>,
    pub skill_levels: BTreeMap<SkillId, u32>,
}

impl Default for SaveData {
    fn default() -> Self {
        Self {
            gold: STARTING_GOLD,
            wave: 0,
            kills: 0,
            gems: 0,
            castle: CastleSave::default(),
            hero: StatBlock::default(),
            upgrade_levels: BTreeMap::new(),
            skill_levels: BTreeMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rampart_core::constants::BASE_HERO_SPEED;

    #[test]
    fn test_missing_fields_default() {
        let data: SaveData =
            serde_json::from_str(r#"{"gold":250,"hero":{"damage":30},"castle":{"hp":40}}"#).unwrap();
        assert_eq!(data.gold, 250);
        assert_eq!(data.wave, 0);
        assert_eq!(data.hero.damage, 30.0);
        assert_eq!(data.hero.speed, BASE_HERO_SPEED);
        assert_eq!(data.castle.hp, 40.0);
        assert_eq!(data.castle.max_hp, CASTLE_MAX_HP);
    }

    #[test]
    fn test_document_uses_camel_case() {
        let mut data = SaveData::default();
        data.upgrade_levels.insert(Stat::FireRate, 2);
        data.skill_levels.insert(SkillId::RapidFire, 1);
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["upgradeLevels"]["fireRate"], 2);
        assert_eq!(json["skillLevels"]["rapidFire"], 1);
        assert!(json["castle"]["maxHp"].is_number());
        assert!(json["hero"]["fireRate"].is_number());
    }

    #[test]
    fn test_malformed_json_is_no_save() {
        let mut store = MemoryStore::new();
        store.set("k", "{not json").unwrap();
        assert!(load_json::<SaveData>(&store, "k").is_none());
        assert!(load_json::<SaveData>(&store, "absent").is_none());
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let mut data = SaveData::default();
        data.gold = 77;
        data.wave = 6;
        store_json(&mut store, "run", &data).unwrap();
        assert_eq!(load_json::<SaveData>(&store, "run"), Some(data));
        store.remove("run").unwrap();
        assert!(store.get("run").is_none());
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = std::env::temp_dir().join("rampart_test_file_store");
        let _ = fs::remove_dir_all(&dir);

        let mut store = FileStore::new(&dir);
        assert!(store.get("run").is_none());
        store.set("run", r#"{"gold":5}"#).unwrap();
        assert!(dir.join("run.json").exists());
        let data: SaveData = load_json(&store, "run").unwrap();
        assert_eq!(data.gold, 5);

        store.remove("run").unwrap();
        store.remove("run").unwrap();
        assert!(store.get("run").is_none());

        let _ = fs::remove_dir_all(&dir);
    }
}
