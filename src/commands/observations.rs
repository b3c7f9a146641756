use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::AppError,
    models::{ObservationRecord, ObservationStats, SelectionEntry},
    observation::observation_stats as compute_stats,
    state::AppState,
};

use super::utils::{clean_optional, date_range, require_text};

#[derive(Debug, Deserialize)]
pub struct OpenObservationPayload {
    pub area: String,
    #[serde(default)]
    pub observer: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOptionPayload {
    pub draft_id: Uuid,
    pub category: String,
    pub option: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftIdPayload {
    pub draft_id: Uuid,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitObservationPayload {
    pub draft_id: Uuid,
    #[serde(default)]
    pub observed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct ObservationIdPayload {
    pub id: Uuid,
}

/// Current state of an open observation form.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObservationDraftView {
    pub draft_id: Uuid,
    pub record_id: Option<Uuid>,
    pub area: String,
    pub observer: Option<String>,
    pub opened_at: DateTime<Utc>,
    pub selected_count: usize,
    pub entries: Vec<SelectionEntry>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DateRangePayload {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Starts an empty observation form and returns its draft id.
pub fn open_observation(state: &AppState, payload: OpenObservationPayload) -> Result<Uuid, String> {
    let area = require_text(&payload.area, "Area is required.")?;
    let id = state.drafts.open(area, clean_optional(payload.observer));
    tracing::debug!(
        draft = %id,
        open_drafts = state.drafts.len(),
        "opened observation draft"
    );
    Ok(id)
}

/// Opens a draft pre-filled from a stored observation; submitting it
/// replaces that record.
pub fn edit_observation(state: &AppState, payload: ObservationIdPayload) -> Result<Uuid, String> {
    let record = state
        .records
        .observation(&payload.id)
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::message("Observation not found."))?;
    let id = state.drafts.reopen(&record);
    tracing::debug!(draft = %id, record = %record.id, "reopened observation");
    Ok(id)
}

pub fn load_observation_draft(
    state: &AppState,
    payload: DraftIdPayload,
) -> Result<ObservationDraftView, String> {
    let draft = state
        .drafts
        .get(&payload.draft_id)
        .ok_or_else(|| AppError::message("Observation draft not found."))?;
    Ok(ObservationDraftView {
        draft_id: payload.draft_id,
        record_id: draft.record_id,
        selected_count: draft.selection.selected_count(),
        entries: draft.selection.flatten(),
        area: draft.area,
        observer: draft.observer,
        opened_at: draft.opened_at,
    })
}

/// Flips one checkbox on a draft and reports its new state.
pub fn toggle_observation_option(
    state: &AppState,
    payload: ToggleOptionPayload,
) -> Result<bool, String> {
    let category = require_text(&payload.category, "Category is required.")?;
    let option = require_text(&payload.option, "Option is required.")?;
    state
        .drafts
        .toggle(&payload.draft_id, &category, &option)
        .ok_or_else(|| AppError::message("Observation draft not found.").into())
}

pub fn discard_observation(state: &AppState, payload: DraftIdPayload) -> Result<(), String> {
    state
        .drafts
        .take(&payload.draft_id)
        .map(|_| ())
        .ok_or_else(|| AppError::message("Observation draft not found.").into())
}

/// Flattens a draft's selection and persists it. The draft is kept when
/// nothing is selected or the write fails.
pub fn submit_observation(
    state: &AppState,
    payload: SubmitObservationPayload,
) -> Result<ObservationRecord, String> {
    let draft = state
        .drafts
        .take(&payload.draft_id)
        .ok_or_else(|| AppError::message("Observation draft not found."))?;
    if draft.selection.is_empty() {
        state.drafts.restore(payload.draft_id, draft);
        return Err(AppError::message("Select at least one observation before submitting.").into());
    }

    let record = ObservationRecord {
        id: draft.record_id.unwrap_or_else(Uuid::new_v4),
        observed_at: payload
            .observed_at
            .or(draft.observed_at)
            .unwrap_or_else(Utc::now),
        area: draft.area.clone(),
        observer: draft.observer.clone(),
        entries: draft.selection.flatten(),
    };
    if let Err(err) = state.records.save_observation(&record) {
        state.drafts.restore(payload.draft_id, draft);
        return Err(AppError::from(err).into());
    }
    tracing::info!(
        id = %record.id,
        area = %record.area,
        entries = record.entries.len(),
        "submitted observation"
    );
    Ok(record)
}

pub fn list_observations(
    state: &AppState,
    payload: DateRangePayload,
) -> Result<Vec<ObservationRecord>, String> {
    let range = date_range(payload.from, payload.to)?;
    let records = state.records.observations().map_err(AppError::from)?;
    Ok(records
        .into_iter()
        .filter(|record| range.contains(&record.observed_at))
        .collect())
}

/// Per-category tallies of everything observed inside the range.
pub fn observation_stats(
    state: &AppState,
    payload: DateRangePayload,
) -> Result<ObservationStats, String> {
    let range = date_range(payload.from, payload.to)?;
    let records = state.records.observations().map_err(AppError::from)?;
    Ok(compute_stats(&records, range))
}
