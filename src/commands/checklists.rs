use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    checklist::normalize_checklist,
    error::AppError,
    models::{ChecklistSection, ShiftChangeRecord, ShiftChangeSummary},
    state::AppState,
    status::{summarize_checklist, worst_status},
};

use super::utils::{clean_optional, require_text};

#[derive(Debug, Deserialize)]
pub struct NormalizeChecklistPayload {
    #[serde(default)]
    pub raw: Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveShiftChangePayload {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub vehicle: String,
    #[serde(default)]
    pub driver_out: Option<String>,
    #[serde(default)]
    pub driver_in: Option<String>,
    #[serde(default)]
    pub recorded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub checklist: Value,
}

#[derive(Debug, Deserialize)]
pub struct ShiftChangeIdPayload {
    pub id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListShiftChangesPayload {
    #[serde(default)]
    pub vehicle: Option<String>,
}

/// Folds a stored checklist of any legacy layout into canonical sections.
pub fn normalize_checklist_command(
    payload: NormalizeChecklistPayload,
) -> Result<Vec<ChecklistSection>, String> {
    Ok(normalize_checklist(&payload.raw))
}

/// Creates or replaces a shift-change record; the checklist is stored
/// canonical.
pub fn save_shift_change(
    state: &AppState,
    payload: SaveShiftChangePayload,
) -> Result<ShiftChangeRecord, String> {
    let vehicle = require_text(&payload.vehicle, "Vehicle is required.")?;
    let checklist = normalize_checklist(&payload.checklist);
    let record = ShiftChangeRecord {
        id: payload.id.unwrap_or_else(Uuid::new_v4),
        vehicle,
        driver_out: clean_optional(payload.driver_out),
        driver_in: clean_optional(payload.driver_in),
        recorded_at: payload.recorded_at.unwrap_or_else(Utc::now),
        notes: clean_optional(payload.notes),
        checklist,
    };
    state
        .records
        .save_shift_change(&record)
        .map_err(AppError::from)?;
    tracing::info!(
        id = %record.id,
        vehicle = %record.vehicle,
        sections = record.checklist.len(),
        "saved shift change"
    );
    Ok(record)
}

pub fn load_shift_change(
    state: &AppState,
    payload: ShiftChangeIdPayload,
) -> Result<ShiftChangeRecord, String> {
    let record = state
        .records
        .shift_change(&payload.id)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::message("Shift change not found."))?;
    Ok(record)
}

/// Lists shift changes newest first, optionally for a single vehicle.
pub fn list_shift_changes(
    state: &AppState,
    payload: ListShiftChangesPayload,
) -> Result<Vec<ShiftChangeSummary>, String> {
    let vehicle = clean_optional(payload.vehicle).map(|text| text.to_lowercase());
    let records = state.records.shift_changes().map_err(AppError::from)?;
    let summaries = records
        .into_iter()
        .filter(|record| {
            vehicle
                .as_ref()
                .map_or(true, |wanted| record.vehicle.to_lowercase() == *wanted)
        })
        .map(|record| ShiftChangeSummary {
            summary: summarize_checklist(&record.checklist),
            worst: worst_status(&record.checklist),
            id: record.id,
            vehicle: record.vehicle,
            recorded_at: record.recorded_at,
        })
        .collect();
    Ok(summaries)
}

pub fn delete_shift_change(state: &AppState, payload: ShiftChangeIdPayload) -> Result<(), String> {
    let removed = state
        .records
        .remove_shift_change(&payload.id)
        .map_err(AppError::from)?;
    if !removed {
        return Err(AppError::message("Shift change not found.").into());
    }
    tracing::info!(id = %payload.id, "deleted shift change");
    Ok(())
}
