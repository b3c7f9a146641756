//! Tolerant normalization of stored checklists.
//!
//! Shift-change checklists were persisted under several layouts over time:
//! arrays of sections, maps of section name to items, bare strings, and any
//! of those wrapped once more in a JSON string. Every layout is folded into
//! the canonical `Vec<ChecklistSection>` here. Nothing in this module fails;
//! input that cannot be interpreted is dropped and the absence is the signal.

use serde_json::{Map, Value};

use crate::{
    aliases::{
        first_text, ITEM_ID_ALIASES, ITEM_LABEL_ALIASES, ITEM_STATUS_ALIASES,
        SECTION_ITEMS_ALIASES, SECTION_TITLE_ALIASES,
    },
    models::{legacy_id, ChecklistItem, ChecklistSection, UNSPECIFIED_STATUS},
    raw::{unwrap_encoded, RawChecklistValue},
    value_utils::{is_blank, value_to_text},
};

/// Title given to sections synthesized from flat `key: value` entries.
pub const FLAT_SECTION_TITLE: &str = "Checklist";

/// Normalizes a single item. `index` is the item's position in its source
/// list and seeds the synthetic id when the source has none.
pub fn normalize_item(raw: &Value, index: usize) -> Option<ChecklistItem> {
    let unwrapped = unwrap_encoded(raw);
    match RawChecklistValue::classify(&unwrapped) {
        RawChecklistValue::Null => None,
        RawChecklistValue::String(label) => Some(ChecklistItem::legacy(
            index,
            non_blank(label).unwrap_or_default(),
            UNSPECIFIED_STATUS,
        )),
        RawChecklistValue::Mapping(object) => Some(item_from_object(object, index)),
        RawChecklistValue::Sequence(_) | RawChecklistValue::Scalar(_) => None,
    }
}

/// Blank text reads back as "missing" through the alias lookups, so it is
/// never emitted.
fn non_blank(text: &str) -> Option<&str> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

fn position_title(index: usize) -> String {
    format!("Sección {}", index + 1)
}

fn key_title(key: &str, position: usize) -> String {
    non_blank(key).map_or_else(|| position_title(position), str::to_string)
}

fn item_from_object(object: &Map<String, Value>, index: usize) -> ChecklistItem {
    ChecklistItem {
        id: first_text(object, ITEM_ID_ALIASES).unwrap_or_else(|| legacy_id(index)),
        label: first_text(object, ITEM_LABEL_ALIASES).unwrap_or_default(),
        status: first_text(object, ITEM_STATUS_ALIASES)
            .unwrap_or_else(|| UNSPECIFIED_STATUS.to_string()),
    }
}

fn normalize_items(raw_items: &[Value]) -> Vec<ChecklistItem> {
    raw_items
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| normalize_item(raw, index))
        .collect()
}

/// Item list of a section object: the first aliased field holding a list,
/// after unwrapping string encoding.
fn section_items(object: &Map<String, Value>) -> Vec<ChecklistItem> {
    for alias in SECTION_ITEMS_ALIASES {
        let Some(value) = object.get(*alias) else {
            continue;
        };
        if let Value::Array(raw_items) = unwrap_encoded(value).as_ref() {
            return normalize_items(raw_items);
        }
    }
    Vec::new()
}

fn section_from_object(object: &Map<String, Value>, fallback_title: String) -> ChecklistSection {
    ChecklistSection {
        title: first_text(object, SECTION_TITLE_ALIASES).unwrap_or(fallback_title),
        items: section_items(object),
    }
}

/// Normalizes a sections value that has already been unwrapped once.
pub fn normalize_sections(raw: &Value) -> Vec<ChecklistSection> {
    let sections = match RawChecklistValue::classify(raw) {
        RawChecklistValue::Sequence(raw_sections) => sections_from_sequence(raw_sections),
        RawChecklistValue::Mapping(map) => sections_from_mapping(map),
        RawChecklistValue::String(_) | RawChecklistValue::Scalar(_) | RawChecklistValue::Null => {
            Vec::new()
        }
    };
    let before = sections.len();
    let kept: Vec<ChecklistSection> = sections
        .into_iter()
        .filter(|section| !section.items.is_empty())
        .collect();
    if kept.len() < before {
        tracing::debug!(dropped = before - kept.len(), "dropped empty checklist sections");
    }
    kept
}

/// Entry point for values read straight from storage: unwraps one level of
/// JSON-string encoding, then normalizes.
pub fn normalize_checklist(raw: &Value) -> Vec<ChecklistSection> {
    normalize_sections(&unwrap_encoded(raw))
}

fn sections_from_sequence(raw_sections: &[Value]) -> Vec<ChecklistSection> {
    raw_sections
        .iter()
        .enumerate()
        .filter_map(|(index, raw)| match unwrap_encoded(raw).as_ref() {
            Value::Object(object) => Some(section_from_object(object, position_title(index))),
            _ => None,
        })
        .collect()
}

fn sections_from_mapping(map: &Map<String, Value>) -> Vec<ChecklistSection> {
    let mut sections = Vec::new();
    for (position, (key, value)) in map.iter().enumerate() {
        if is_blank(value) {
            continue;
        }
        let unwrapped = unwrap_encoded(value);
        let section = match RawChecklistValue::classify(&unwrapped) {
            RawChecklistValue::Sequence(raw_items) => ChecklistSection {
                title: key_title(key, position),
                items: normalize_items(raw_items),
            },
            RawChecklistValue::Mapping(object) => {
                section_from_object(object, key_title(key, position))
            }
            RawChecklistValue::String(_) | RawChecklistValue::Scalar(_) => {
                let Some(status) = value_to_text(&unwrapped) else {
                    continue;
                };
                ChecklistSection {
                    title: FLAT_SECTION_TITLE.to_string(),
                    items: vec![ChecklistItem::legacy(
                        position,
                        non_blank(key).unwrap_or_default(),
                        status,
                    )],
                }
            }
            RawChecklistValue::Null => continue,
        };
        sections.push(section);
    }
    sections
}
