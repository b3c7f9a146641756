//! Field-name aliases accepted for checklist records.
//!
//! Checklists were stored under several schema revisions, each spelling the
//! same field differently. Lookups walk an alias list in order and take the
//! first field that carries a usable value, so earlier entries win.

use serde_json::{Map, Value};

use crate::value_utils::{is_blank, value_to_text};

pub const ITEM_LABEL_ALIASES: &[&str] = &["item", "nombre", "descripcion", "label", "name", "texto"];
pub const ITEM_STATUS_ALIASES: &[&str] = &["estado", "status", "valor", "value", "respuesta"];
pub const ITEM_ID_ALIASES: &[&str] = &["id", "codigo"];
pub const SECTION_TITLE_ALIASES: &[&str] =
    &["titulo", "title", "seccion", "nombre", "name", "categoria"];
pub const SECTION_ITEMS_ALIASES: &[&str] =
    &["items", "checklist", "elementos", "preguntas", "campos"];

/// First aliased field whose value is present and not blank.
pub fn first_value<'a>(object: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| object.get(*alias))
        .find(|value| !matches!(value, Value::Null) && !is_blank_text(value))
}

/// Same lookup as [`first_value`], rendered as text.
pub fn first_text(object: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    first_value(object, aliases).and_then(value_to_text)
}

fn is_blank_text(value: &Value) -> bool {
    matches!(value, Value::String(_)) && is_blank(value)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!("test fixture must be an object"),
        }
    }

    #[test]
    fn earlier_alias_wins() {
        let map = object(json!({"descripcion": "ignored", "nombre": "Luces"}));
        assert_eq!(first_text(&map, ITEM_LABEL_ALIASES).as_deref(), Some("Luces"));
    }

    #[test]
    fn null_and_blank_strings_fall_through() {
        let map = object(json!({"item": null, "nombre": "  ", "label": "Frenos"}));
        assert_eq!(first_text(&map, ITEM_LABEL_ALIASES).as_deref(), Some("Frenos"));
    }

    #[test]
    fn numbers_render_as_text() {
        let map = object(json!({"id": 42}));
        assert_eq!(first_text(&map, ITEM_ID_ALIASES).as_deref(), Some("42"));
    }

    #[test]
    fn canonical_field_names_are_accepted() {
        assert!(ITEM_LABEL_ALIASES.contains(&"label"));
        assert!(ITEM_STATUS_ALIASES.contains(&"status"));
        assert!(ITEM_ID_ALIASES.contains(&"id"));
        assert!(SECTION_TITLE_ALIASES.contains(&"title"));
        assert!(SECTION_ITEMS_ALIASES.contains(&"items"));
    }

    #[test]
    fn missing_fields_yield_none() {
        let map = object(json!({"other": "x"}));
        assert_eq!(first_value(&map, SECTION_TITLE_ALIASES), None);
    }
}
