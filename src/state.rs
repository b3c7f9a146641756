use std::{collections::HashMap, fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use crate::{models::ObservationRecord, observation::ObservationSelection, storage::RecordStore};

/// An observation form that has been opened but not yet submitted.
/// Drafts opened from a stored record carry its id and timestamp so the
/// submit replaces that record.
#[derive(Debug, Clone)]
pub struct Draft {
    pub record_id: Option<Uuid>,
    pub observed_at: Option<DateTime<Utc>>,
    pub area: String,
    pub observer: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub selection: ObservationSelection,
}

#[derive(Default)]
pub struct DraftStore {
    inner: Mutex<HashMap<Uuid, Draft>>,
}

impl DraftStore {
    pub fn open(&self, area: String, observer: Option<String>) -> Uuid {
        self.insert(Draft {
            record_id: None,
            observed_at: None,
            area,
            observer,
            opened_at: Utc::now(),
            selection: ObservationSelection::new(),
        })
    }

    /// Opens a draft pre-filled with a stored observation's selections.
    pub fn reopen(&self, record: &ObservationRecord) -> Uuid {
        self.insert(Draft {
            record_id: Some(record.id),
            observed_at: Some(record.observed_at),
            area: record.area.clone(),
            observer: record.observer.clone(),
            opened_at: Utc::now(),
            selection: ObservationSelection::from_entries(&record.entries),
        })
    }

    fn insert(&self, draft: Draft) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().insert(id, draft);
        id
    }

    /// Toggles an option on a draft; `None` when the draft does not exist.
    pub fn toggle(&self, id: &Uuid, category: &str, option: &str) -> Option<bool> {
        let mut guard = self.inner.lock();
        let draft = guard.get_mut(id)?;
        Some(draft.selection.toggle(category, option))
    }

    pub fn get(&self, id: &Uuid) -> Option<Draft> {
        self.inner.lock().get(id).cloned()
    }

    pub fn take(&self, id: &Uuid) -> Option<Draft> {
        self.inner.lock().remove(id)
    }

    /// Puts a draft back, e.g. after a failed submit.
    pub fn restore(&self, id: Uuid, draft: Draft) {
        self.inner.lock().insert(id, draft);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

pub struct AppState {
    pub records: RecordStore,
    pub drafts: DraftStore,
}

impl AppState {
    pub fn new(data_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&data_dir)
            .with_context(|| format!("failed to create app data dir {:?}", data_dir))?;
        let records = RecordStore::open(&data_dir.join("records.db"))?;
        tracing::info!(data_dir = %data_dir.display(), "opened record store");
        Ok(Self {
            records,
            drafts: DraftStore::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draft_lifecycle() {
        let drafts = DraftStore::default();
        let id = drafts.open("Taller".to_string(), None);
        assert_eq!(drafts.toggle(&id, "epp", "No se usan"), Some(true));
        assert_eq!(drafts.get(&id).unwrap().selection.selected_count(), 1);

        let draft = drafts.take(&id).unwrap();
        assert!(drafts.is_empty());
        drafts.restore(id, draft);
        assert_eq!(drafts.len(), 1);
    }

    #[test]
    fn reopened_draft_carries_the_record() {
        let drafts = DraftStore::default();
        let record = ObservationRecord {
            id: Uuid::new_v4(),
            observed_at: Utc::now(),
            area: "Patio".to_string(),
            observer: Some("Luis".to_string()),
            entries: vec![crate::models::SelectionEntry {
                category: "epp".to_string(),
                option: "No se usan".to_string(),
                selected: true,
            }],
        };
        let id = drafts.reopen(&record);
        let draft = drafts.get(&id).unwrap();
        assert_eq!(draft.record_id, Some(record.id));
        assert_eq!(draft.observed_at, Some(record.observed_at));
        assert_eq!(draft.selection.flatten(), record.entries);
    }

    #[test]
    fn toggling_unknown_draft_is_none() {
        let drafts = DraftStore::default();
        assert_eq!(drafts.toggle(&Uuid::new_v4(), "epp", "x"), None);
    }
}
