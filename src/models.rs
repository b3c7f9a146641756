use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::status::StatusClass;

/// Status shown for items whose source carried none.
pub const UNSPECIFIED_STATUS: &str = "—";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistItem {
    pub id: String,
    pub label: String,
    pub status: String,
}

impl ChecklistItem {
    pub fn legacy(index: usize, label: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            id: legacy_id(index),
            label: label.into(),
            status: status.into(),
        }
    }
}

pub fn legacy_id(index: usize) -> String {
    format!("legacy-{index}")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistSection {
    pub title: String,
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChecklistSummary {
    pub total: usize,
    pub ok: usize,
    pub attention: usize,
    pub fail: usize,
    pub unspecified: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftChangeRecord {
    pub id: Uuid,
    pub vehicle: String,
    pub driver_out: Option<String>,
    pub driver_in: Option<String>,
    pub recorded_at: DateTime<Utc>,
    pub notes: Option<String>,
    pub checklist: Vec<ChecklistSection>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ShiftChangeSummary {
    pub id: Uuid,
    pub vehicle: String,
    pub recorded_at: DateTime<Utc>,
    pub summary: ChecklistSummary,
    pub worst: StatusClass,
}

/// One checked box of an observation form, as persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionEntry {
    pub category: String,
    pub option: String,
    #[serde(default = "selected_default")]
    pub selected: bool,
}

fn selected_default() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ObservationRecord {
    pub id: Uuid,
    pub observed_at: DateTime<Utc>,
    pub area: String,
    pub observer: Option<String>,
    pub entries: Vec<SelectionEntry>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatsEntry {
    pub category: String,
    pub option: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OptionCount {
    pub option: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStats {
    pub category: String,
    pub total: usize,
    pub options: Vec<OptionCount>,
    pub bar_width: f64,
}

/// Inclusive calendar-date window; an open bound accepts everything on
/// that side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn contains(&self, at: &DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.from.map_or(true, |from| day >= from) && self.to.map_or(true, |to| day <= to)
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ObservationStats {
    pub range: DateRange,
    pub records: usize,
    pub categories: Vec<CategoryStats>,
}
