use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};
use sled::{Db, Tree};
use uuid::Uuid;

use crate::models::{ObservationRecord, ShiftChangeRecord};

const SHIFT_CHANGES_TREE: &[u8] = b"shift_changes";
const OBSERVATIONS_TREE: &[u8] = b"observations";

fn encode_record_key(id: &Uuid) -> [u8; 16] {
    *id.as_bytes()
}

fn decode_record_key(bytes: &[u8]) -> Option<Uuid> {
    Uuid::from_slice(bytes).ok()
}

fn open_db(path: &Path) -> Result<Db> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create records db dir {:?}", parent))?;
    }
    sled::open(path).with_context(|| format!("failed to open records db at {:?}", path))
}

fn put<T: Serialize>(tree: &Tree, id: &Uuid, record: &T) -> Result<()> {
    let value = serde_json::to_vec(record)
        .with_context(|| format!("failed to serialize record {}", id))?;
    tree.insert(encode_record_key(id), value)
        .with_context(|| format!("failed to persist record {}", id))?;
    tree.flush()
        .with_context(|| format!("failed to flush record {}", id))?;
    Ok(())
}

fn get<T: DeserializeOwned>(tree: &Tree, id: &Uuid) -> Result<Option<T>> {
    match tree.get(encode_record_key(id)) {
        Ok(Some(value)) => {
            let record = serde_json::from_slice(&value)
                .with_context(|| format!("failed to deserialize record {}", id))?;
            Ok(Some(record))
        }
        Ok(None) => Ok(None),
        Err(err) => Err(err).with_context(|| format!("failed to read record {}", id)),
    }
}

fn remove(tree: &Tree, id: &Uuid) -> Result<bool> {
    let previous = tree
        .remove(encode_record_key(id))
        .with_context(|| format!("failed to delete record {}", id))?;
    tree.flush()
        .with_context(|| format!("failed to flush tree while deleting record {}", id))?;
    Ok(previous.is_some())
}

fn all<T: DeserializeOwned>(tree: &Tree) -> Result<Vec<T>> {
    let mut records = Vec::new();
    for result in tree.iter() {
        let (key, value) = result.with_context(|| "failed to iterate records")?;
        let Some(id) = decode_record_key(key.as_ref()) else {
            tracing::warn!(key_len = key.len(), "skipping record with malformed key");
            continue;
        };
        let record = serde_json::from_slice(&value)
            .with_context(|| format!("failed to deserialize record {}", id))?;
        records.push(record);
    }
    Ok(records)
}

/// Local persistence for shift-change checklists and safety observations,
/// one sled tree per record kind.
pub struct RecordStore {
    db: Db,
    shift_changes: Tree,
    observations: Tree,
}

impl RecordStore {
    pub fn open(path: &Path) -> Result<Self> {
        let db = open_db(path)?;
        let shift_changes = db
            .open_tree(SHIFT_CHANGES_TREE)
            .context("failed to open shift change tree")?;
        let observations = db
            .open_tree(OBSERVATIONS_TREE)
            .context("failed to open observation tree")?;
        Ok(Self {
            db,
            shift_changes,
            observations,
        })
    }

    pub fn save_shift_change(&self, record: &ShiftChangeRecord) -> Result<()> {
        put(&self.shift_changes, &record.id, record)
    }

    pub fn shift_change(&self, id: &Uuid) -> Result<Option<ShiftChangeRecord>> {
        get(&self.shift_changes, id)
    }

    pub fn remove_shift_change(&self, id: &Uuid) -> Result<bool> {
        remove(&self.shift_changes, id)
    }

    /// Newest first.
    pub fn shift_changes(&self) -> Result<Vec<ShiftChangeRecord>> {
        let mut records: Vec<ShiftChangeRecord> = all(&self.shift_changes)?;
        records.sort_by(|a, b| b.recorded_at.cmp(&a.recorded_at));
        Ok(records)
    }

    pub fn save_observation(&self, record: &ObservationRecord) -> Result<()> {
        put(&self.observations, &record.id, record)
    }

    pub fn observation(&self, id: &Uuid) -> Result<Option<ObservationRecord>> {
        get(&self.observations, id)
    }

    /// Oldest first.
    pub fn observations(&self) -> Result<Vec<ObservationRecord>> {
        let mut records: Vec<ObservationRecord> = all(&self.observations)?;
        records.sort_by_key(|record| record.observed_at);
        Ok(records)
    }

    pub fn flush(&self) -> Result<()> {
        self.db.flush().context("failed to flush records db")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::models::{ChecklistItem, ChecklistSection, SelectionEntry};

    fn shift_change(vehicle: &str, minutes: i64) -> ShiftChangeRecord {
        ShiftChangeRecord {
            id: Uuid::new_v4(),
            vehicle: vehicle.to_string(),
            driver_out: Some("Ana".to_string()),
            driver_in: None,
            recorded_at: Utc.with_ymd_and_hms(2024, 5, 2, 6, 0, 0).unwrap()
                + Duration::minutes(minutes),
            notes: None,
            checklist: vec![ChecklistSection {
                title: "Motor".to_string(),
                items: vec![ChecklistItem::legacy(0, "Aceite", "Bueno")],
            }],
        }
    }

    #[test]
    fn shift_changes_round_trip_newest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(&dir.path().join("records.db")).unwrap();
        let older = shift_change("CAM-01", 0);
        let newer = shift_change("CAM-02", 30);
        store.save_shift_change(&older).unwrap();
        store.save_shift_change(&newer).unwrap();

        assert_eq!(store.shift_change(&older.id).unwrap(), Some(older.clone()));
        let listed = store.shift_changes().unwrap();
        assert_eq!(listed, vec![newer.clone(), older.clone()]);

        assert!(store.remove_shift_change(&older.id).unwrap());
        assert!(!store.remove_shift_change(&older.id).unwrap());
        assert_eq!(store.shift_change(&older.id).unwrap(), None);
    }

    #[test]
    fn observations_are_listed_oldest_first() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::open(&dir.path().join("records.db")).unwrap();
        let base = Utc.with_ymd_and_hms(2024, 5, 2, 6, 0, 0).unwrap();
        for offset in [2, 0, 1] {
            store
                .save_observation(&ObservationRecord {
                    id: Uuid::new_v4(),
                    observed_at: base + Duration::days(offset),
                    area: "Patio".to_string(),
                    observer: None,
                    entries: vec![SelectionEntry {
                        category: "epp".to_string(),
                        option: "No se usan".to_string(),
                        selected: true,
                    }],
                })
                .unwrap();
        }
        let days: Vec<i64> = store
            .observations()
            .unwrap()
            .iter()
            .map(|record| (record.observed_at - base).num_days())
            .collect();
        assert_eq!(days, vec![0, 1, 2]);
    }

    #[test]
    fn reopening_keeps_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.db");
        let record = shift_change("CAM-03", 0);
        {
            let store = RecordStore::open(&path).unwrap();
            store.save_shift_change(&record).unwrap();
            store.flush().unwrap();
        }
        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.shift_change(&record.id).unwrap(), Some(record));
    }
}
