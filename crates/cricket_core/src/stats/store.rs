use std::collections::HashMap;
use std::fs::{rename, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use super::career::CareerRecord;
use crate::error::StoreError;

/// Upsert-by-player-id storage for career records.
pub trait StatsStore {
    fn load(&self, player_id: &str) -> Result<Option<CareerRecord>, StoreError>;
    fn save(&mut self, record: &CareerRecord) -> Result<(), StoreError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStatsStore {
    records: HashMap<String, CareerRecord>,
}

impl MemoryStatsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, player_id: &str) -> Option<&CareerRecord> {
        self.records.get(player_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StatsStore for MemoryStatsStore {
    fn load(&self, player_id: &str) -> Result<Option<CareerRecord>, StoreError> {
        Ok(self.records.get(player_id).cloned())
    }

    fn save(&mut self, record: &CareerRecord) -> Result<(), StoreError> {
        self.records.insert(record.player_id.clone(), record.clone());
        Ok(())
    }
}

/// One pretty-printed JSON file per player under `dir`.
#[derive(Debug, Clone)]
pub struct JsonFileStatsStore {
    dir: PathBuf,
}

impl JsonFileStatsStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, player_id: &str) -> PathBuf {
        self.dir.join(format!("{}.json", file_stem(player_id)))
    }
}

/// Reversible file stem for a player id: ASCII letters, digits and `-` are
/// kept, every other byte becomes `_` plus two hex digits.
fn file_stem(player_id: &str) -> String {
    let mut stem = String::with_capacity(player_id.len());
    for byte in player_id.bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("_{byte:02x}"));
        }
    }
    stem
}

impl StatsStore for JsonFileStatsStore {
    fn load(&self, player_id: &str) -> Result<Option<CareerRecord>, StoreError> {
        let path = self.path_for(player_id);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&raw)?))
    }

    fn save(&mut self, record: &CareerRecord) -> Result<(), StoreError> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&record.player_id);
        let data = serde_json::to_vec_pretty(record)?;

        // Write to a temp file, then rename over the target
        let temp_path = path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.sync_all()?;
        }
        rename(&temp_path, &path)?;

        log::debug!("Saved {} bytes to {:?}", data.len(), path);
        Ok(())
    }
}
