//! Check tool call arguments against the tool's parameter schema.
//!
//! Only the subset of JSON Schema that [`ParameterBuilder`](super::types::ParameterBuilder)
//! emits is understood: object type, `required`, property `type`, string
//! `enum`, and the item type of arrays.

use serde_json::Value;

use crate::error::AgentError;

/// Validate `args` against `schema`, reporting the first violation.
pub fn validate_arguments(args: &Value, schema: &Value) -> Result<(), AgentError> {
    if schema.get("type").and_then(Value::as_str) == Some("object") && !args.is_object() {
        return Err(invalid(format!(
            "expected object arguments, got {}",
            json_type_name(args)
        )));
    }

    let Some(obj) = args.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if obj.get(name).map_or(true, Value::is_null) {
                return Err(invalid(format!("missing required field '{name}'")));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (key, value) in obj {
        let Some(prop) = properties.get(key) else {
            continue;
        };
        // Optional fields sent as null are treated as absent.
        if value.is_null() {
            continue;
        }
        check_property(key, value, prop)?;
    }

    Ok(())
}

fn check_property(key: &str, value: &Value, prop: &Value) -> Result<(), AgentError> {
    if let Some(expected) = prop.get("type").and_then(Value::as_str) {
        if !value_matches_type(value, expected) {
            return Err(invalid(format!(
                "field '{key}' expected type '{expected}', got {}",
                json_type_name(value)
            )));
        }
    }

    if let (Some(allowed), Some(s)) = (prop.get("enum").and_then(Value::as_array), value.as_str()) {
        if !allowed.iter().any(|a| a.as_str() == Some(s)) {
            let options: Vec<&str> = allowed.iter().filter_map(Value::as_str).collect();
            return Err(invalid(format!(
                "field '{key}' must be one of [{}], got '{s}'",
                options.join(", ")
            )));
        }
    }

    if let (Some(item_type), Some(items)) = (
        prop.get("items")
            .and_then(|i| i.get("type"))
            .and_then(Value::as_str),
        value.as_array(),
    ) {
        if let Some(bad) = items.iter().find(|v| !value_matches_type(v, item_type)) {
            return Err(invalid(format!(
                "field '{key}' expected items of type '{item_type}', got {}",
                json_type_name(bad)
            )));
        }
    }

    Ok(())
}

fn invalid(message: String) -> AgentError {
    AgentError::InvalidArgument(message)
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn search_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string" },
                "include_domains": { "type": "array", "items": { "type": "string" } },
                "time_range": { "type": "string", "enum": ["day", "week", "month", "year"] },
            },
            "required": ["query"],
        })
    }

    fn message(err: AgentError) -> String {
        match err {
            AgentError::InvalidArgument(m) => m,
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_non_object_args() {
        let err = validate_arguments(&json!("rust"), &search_schema()).unwrap_err();
        assert!(message(err).contains("expected object"));
    }

    #[test]
    fn rejects_missing_or_null_required_field() {
        let err = validate_arguments(&json!({}), &search_schema()).unwrap_err();
        assert!(message(err).contains("missing required field 'query'"));
        let err = validate_arguments(&json!({"query": null}), &search_schema()).unwrap_err();
        assert!(message(err).contains("missing required field 'query'"));
    }

    #[test]
    fn rejects_wrong_type() {
        let err = validate_arguments(&json!({"query": 42}), &search_schema()).unwrap_err();
        let text = message(err);
        assert!(text.contains("field 'query'"));
        assert!(text.contains("expected type 'string'"));
    }

    #[test]
    fn rejects_value_outside_enum() {
        let args = json!({"query": "rust", "time_range": "hour"});
        let err = validate_arguments(&args, &search_schema()).unwrap_err();
        assert!(message(err).contains("must be one of [day, week, month, year]"));
    }

    #[test]
    fn rejects_bad_array_items() {
        let args = json!({"query": "rust", "include_domains": ["rust-lang.org", 7]});
        let err = validate_arguments(&args, &search_schema()).unwrap_err();
        assert!(message(err).contains("expected items of type 'string'"));
    }

    #[test]
    fn accepts_valid_args_with_nulls_and_extras() {
        let args = json!({
            "query": "rust",
            "time_range": null,
            "include_domains": ["rust-lang.org"],
            "extra": true,
        });
        assert!(validate_arguments(&args, &search_schema()).is_ok());
    }

    #[test]
    fn empty_schema_accepts_anything() {
        assert!(validate_arguments(&json!({"anything": 1}), &json!({})).is_ok());
    }
}
