use std::{fs, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::WriterBuilder;
use serde::Deserialize;

use crate::{
    error::AppError, models::ObservationStats, observation::observation_stats as compute_stats,
    state::AppState,
};

use super::utils::date_range;

#[derive(Debug, Deserialize)]
pub struct ExportStatsPayload {
    #[serde(default)]
    pub from: Option<NaiveDate>,
    #[serde(default)]
    pub to: Option<NaiveDate>,
    pub destination: String,
}

/// Writes one `category,option,count` row per tallied pair.
pub fn write_stats_csv(stats: &ObservationStats, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create export dir {:?}", parent))?;
    }
    let mut writer = WriterBuilder::new()
        .has_headers(true)
        .from_path(path)
        .with_context(|| format!("failed to create stats CSV {:?}", path))?;
    writer
        .write_record(["category", "option", "count"])
        .context("failed to write stats CSV header")?;
    for category in &stats.categories {
        for option in &category.options {
            writer
                .write_record([
                    category.category.as_str(),
                    option.option.as_str(),
                    option.count.to_string().as_str(),
                ])
                .context("failed to write stats CSV row")?;
        }
    }
    writer.flush().context("failed to flush stats CSV writer")
}

/// Exports observation statistics for the range to a CSV file.
pub fn export_observation_stats(
    state: &AppState,
    payload: ExportStatsPayload,
) -> Result<(), String> {
    let destination = PathBuf::from(payload.destination.trim());
    if destination.as_os_str().is_empty() {
        return Err(AppError::message("Destination is required.").into());
    }
    let range = date_range(payload.from, payload.to)?;
    let records = state.records.observations().map_err(AppError::from)?;
    let stats = compute_stats(&records, range);
    write_stats_csv(&stats, &destination).map_err(AppError::from)?;
    tracing::info!(destination = %destination.display(), "exported observation stats");
    Ok(())
}
