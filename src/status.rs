use serde::{Deserialize, Serialize};

use crate::models::{ChecklistSection, ChecklistSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusClass {
    Ok,
    Attention,
    Fail,
    Unspecified,
}

/// Buckets the free-text status an inspector wrote against an item.
/// Unknown spellings are unspecified rather than guessed.
pub fn classify_status(status: &str) -> StatusClass {
    let trimmed = status.trim();
    if trimmed.is_empty() {
        return StatusClass::Unspecified;
    }
    match trimmed.to_lowercase().as_str() {
        "ok" | "bueno" | "bien" | "si" | "sí" | "cumple" | "✓" | "✔" => StatusClass::Ok,
        "regular" | "revisar" | "pendiente" | "?" => StatusClass::Attention,
        "malo" | "mal" | "no" | "no cumple" | "falla" | "✗" | "x" => StatusClass::Fail,
        _ => StatusClass::Unspecified,
    }
}

pub fn severity_rank(class: StatusClass) -> u8 {
    match class {
        StatusClass::Fail => 3,
        StatusClass::Attention => 2,
        StatusClass::Ok => 1,
        StatusClass::Unspecified => 0,
    }
}

pub fn summarize_checklist(sections: &[ChecklistSection]) -> ChecklistSummary {
    let mut summary = ChecklistSummary::default();
    for item in sections.iter().flat_map(|section| &section.items) {
        summary.total += 1;
        match classify_status(&item.status) {
            StatusClass::Ok => summary.ok += 1,
            StatusClass::Attention => summary.attention += 1,
            StatusClass::Fail => summary.fail += 1,
            StatusClass::Unspecified => summary.unspecified += 1,
        }
    }
    summary
}

/// Highest severity found anywhere in the checklist.
pub fn worst_status(sections: &[ChecklistSection]) -> StatusClass {
    sections
        .iter()
        .flat_map(|section| &section.items)
        .map(|item| classify_status(&item.status))
        .max_by_key(|class| severity_rank(*class))
        .unwrap_or(StatusClass::Unspecified)
}
