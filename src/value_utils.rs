use serde_json::Value;

/// Renders a JSON value as display text. Strings are returned verbatim,
/// scalars with their JSON spelling, containers as compact JSON.
pub fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(boolean) => Some(boolean.to_string()),
        Value::Array(_) | Value::Object(_) => serde_json::to_string(value).ok(),
    }
}

/// True for values a form would leave behind when a field was never filled.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(text) => text.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Number(_) | Value::Bool(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn scalars_render_with_json_spelling() {
        assert_eq!(value_to_text(&json!(12)), Some("12".to_string()));
        assert_eq!(value_to_text(&json!(false)), Some("false".to_string()));
        assert_eq!(value_to_text(&json!("Malo")), Some("Malo".to_string()));
        assert_eq!(value_to_text(&Value::Null), None);
    }

    #[test]
    fn containers_render_as_compact_json() {
        assert_eq!(
            value_to_text(&json!({"a": [1, 2]})),
            Some(r#"{"a":[1,2]}"#.to_string())
        );
    }

    #[test]
    fn blank_detection() {
        assert!(is_blank(&json!(null)));
        assert!(is_blank(&json!("   ")));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(!is_blank(&json!(0)));
        assert!(!is_blank(&json!(false)));
        assert!(!is_blank(&json!("x")));
    }
}
