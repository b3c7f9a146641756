mod checklists;
mod export;
mod observations;
mod utils;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{error::AppError, state::AppState};

pub use checklists::{
    delete_shift_change, list_shift_changes, load_shift_change, normalize_checklist_command,
    save_shift_change, ListShiftChangesPayload, NormalizeChecklistPayload, SaveShiftChangePayload,
    ShiftChangeIdPayload,
};
pub use export::{export_observation_stats, write_stats_csv, ExportStatsPayload};
pub use observations::{
    discard_observation, edit_observation, list_observations, load_observation_draft,
    observation_stats, open_observation, submit_observation, toggle_observation_option,
    DateRangePayload, DraftIdPayload, ObservationDraftView, ObservationIdPayload,
    OpenObservationPayload, SubmitObservationPayload, ToggleOptionPayload,
};
pub use utils::date_range;

fn call<P, R>(payload: Value, handler: impl FnOnce(P) -> Result<R, String>) -> Result<Value, String>
where
    P: DeserializeOwned,
    R: Serialize,
{
    // a missing payload means "all defaults"
    let payload = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other,
    };
    let payload: P = serde_json::from_value(payload)
        .map_err(|err| AppError::message(format!("Invalid payload: {err}")))?;
    let result = handler(payload)?;
    serde_json::to_value(result).map_err(|err| AppError::Other(err.into()).into())
}

/// Routes a named command with a JSON payload to its handler.
pub fn dispatch(state: &AppState, command: &str, payload: Value) -> Result<Value, String> {
    tracing::debug!(command, "dispatching command");
    match command {
        "normalize_checklist" => call(payload, normalize_checklist_command),
        "save_shift_change" => call(payload, |p| save_shift_change(state, p)),
        "load_shift_change" => call(payload, |p| load_shift_change(state, p)),
        "list_shift_changes" => call(payload, |p| list_shift_changes(state, p)),
        "delete_shift_change" => call(payload, |p| delete_shift_change(state, p)),
        "open_observation" => call(payload, |p| open_observation(state, p)),
        "edit_observation" => call(payload, |p| edit_observation(state, p)),
        "load_observation_draft" => call(payload, |p| load_observation_draft(state, p)),
        "toggle_observation_option" => call(payload, |p| toggle_observation_option(state, p)),
        "discard_observation" => call(payload, |p| discard_observation(state, p)),
        "submit_observation" => call(payload, |p| submit_observation(state, p)),
        "list_observations" => call(payload, |p| list_observations(state, p)),
        "observation_stats" => call(payload, |p| observation_stats(state, p)),
        "export_observation_stats" => call(payload, |p| export_observation_stats(state, p)),
        other => Err(AppError::message(format!("Unknown command: {other}")).into()),
    }
}
