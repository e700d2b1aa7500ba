//! Property value normalization
//!
//! Devices encode property values in wildly different shapes: a bare number,
//! a quoted number, `{"value": 21.5}`, a single-entry object, or plain text
//! with a JSON content type. Everything funnels through [`normalize`], which
//! produces one [`PropertyValue`] per payload so the rest of the crate never
//! branches on response shape.

use serde::Serialize;
use serde_json::Value;

use crate::{error::Error, thing::DataSchemaSubtype};

/// The declared type of a property, from the explicit `type` field only.
///
/// A property without a `type` field is [`Unknown`](Self::Unknown) and its
/// values are passed through without coercion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    Number,
    Integer,
    Boolean,
    String,
    Object,
    Array,
    #[default]
    Unknown,
}

impl DeclaredType {
    pub(crate) fn from_subtype(subtype: Option<&DataSchemaSubtype>) -> Self {
        match subtype {
            Some(DataSchemaSubtype::Number(_)) => Self::Number,
            Some(DataSchemaSubtype::Integer(_)) => Self::Integer,
            Some(DataSchemaSubtype::Boolean) => Self::Boolean,
            Some(DataSchemaSubtype::String(_)) => Self::String,
            Some(DataSchemaSubtype::Object(_)) => Self::Object,
            Some(DataSchemaSubtype::Array(_)) => Self::Array,
            Some(DataSchemaSubtype::Null) | None => Self::Unknown,
        }
    }

    /// Whether values of this type are single scalars.
    pub fn is_scalar(self) -> bool {
        !matches!(self, Self::Object | Self::Array)
    }
}

/// A normalized property value.
///
/// Composite payloads (objects, arrays) and unknown-typed passthrough values
/// are carried as [`Json`](Self::Json).
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Number(f64),
    Integer(i64),
    Bool(bool),
    Text(String),
    Json(Value),
}

/// Parses a response body into a [`PropertyValue`] according to the content
/// type and the property's declared type.
///
/// A payload that cannot be coerced to a declared scalar type yields
/// [`Error::InvalidValue`] instead of panicking; the caller records it on the
/// snapshot and keeps the previous value.
pub fn normalize(body: &[u8], content_type: &str, declared: DeclaredType) -> Result<PropertyValue, Error> {
    let mime = content_type.split(';').next().unwrap_or("").trim();
    let is_json = mime.ends_with("/json") || mime.ends_with("+json");

    if is_json {
        // Devices routinely mislabel plain-text bodies as JSON, so a parse
        // failure falls back to the text path rather than erroring outright.
        if let Ok(value) = serde_json::from_slice::<Value>(body) {
            return from_json(value, declared);
        }
    }

    from_text(String::from_utf8_lossy(body).trim(), declared)
}

fn from_json(value: Value, declared: DeclaredType) -> Result<PropertyValue, Error> {
    let value = unwrap_envelope(value, declared);

    match declared {
        DeclaredType::Number => number_from(&value)
            .map(PropertyValue::Number)
            .ok_or_else(|| not_coercible(&value, "number")),
        DeclaredType::Integer => number_from(&value)
            .filter(|n| n.is_finite())
            .map(|n| PropertyValue::Integer(n.trunc() as i64))
            .ok_or_else(|| not_coercible(&value, "integer")),
        DeclaredType::Boolean => bool_from(&value)
            .map(PropertyValue::Bool)
            .ok_or_else(|| not_coercible(&value, "boolean")),
        DeclaredType::String => match value {
            Value::String(s) => Ok(PropertyValue::Text(s)),
            Value::Bool(_) | Value::Number(_) => Ok(PropertyValue::Text(value.to_string())),
            Value::Null => Err(not_coercible(&value, "string")),
            composite => Ok(PropertyValue::Json(composite)),
        },
        DeclaredType::Object | DeclaredType::Array => Ok(PropertyValue::Json(value)),
        DeclaredType::Unknown => Ok(passthrough(value)),
    }
}

fn from_text(text: &str, declared: DeclaredType) -> Result<PropertyValue, Error> {
    match declared {
        DeclaredType::Number => text
            .parse::<f64>()
            .map(PropertyValue::Number)
            .map_err(|_| Error::InvalidValue(format!("\"{text}\" is not a number"))),
        DeclaredType::Integer => text
            .parse::<f64>()
            .map(|n| PropertyValue::Integer(n.trunc() as i64))
            .map_err(|_| Error::InvalidValue(format!("\"{text}\" is not an integer"))),
        DeclaredType::Boolean => match text {
            "true" => Ok(PropertyValue::Bool(true)),
            "false" => Ok(PropertyValue::Bool(false)),
            _ => Err(Error::InvalidValue(format!("\"{text}\" is not a boolean"))),
        },
        DeclaredType::String => Ok(PropertyValue::Text(text.to_string())),
        DeclaredType::Object | DeclaredType::Array => Err(Error::InvalidValue(format!(
            "expected a JSON body, got text \"{text}\""
        ))),
        DeclaredType::Unknown => Ok(text_to_number(text).unwrap_or_else(|| PropertyValue::Text(text.to_string()))),
    }
}

/// Strips the common value envelopes: `{"value": v}` and, for scalar-typed
/// properties, a single-entry object wrapping the actual value.
fn unwrap_envelope(value: Value, declared: DeclaredType) -> Value {
    if !declared.is_scalar() {
        return value;
    }

    match value {
        Value::Object(mut map) if map.contains_key("value") => {
            map.remove("value").unwrap_or(Value::Null)
        }
        Value::Object(map) if map.len() == 1 => map.into_iter().next().map(|(_, v)| v).unwrap_or(Value::Null),
        other => other,
    }
}

/// Best-effort text to number conversion: `"42"` becomes an integer,
/// `"21.5"` a number, anything else is left to the caller.
pub fn text_to_number(text: &str) -> Option<PropertyValue> {
    if text.contains(['.', 'e', 'E']) {
        text.parse::<f64>().ok().map(PropertyValue::Number)
    } else {
        text.parse::<i64>().ok().map(PropertyValue::Integer)
    }
}

fn number_from(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn bool_from(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

fn passthrough(value: Value) -> PropertyValue {
    match value {
        Value::Bool(b) => PropertyValue::Bool(b),
        Value::String(s) => PropertyValue::Text(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                PropertyValue::Integer(i)
            } else {
                n.as_f64().map(PropertyValue::Number).unwrap_or_else(|| PropertyValue::Json(Value::Number(n)))
            }
        }
        composite => PropertyValue::Json(composite),
    }
}

fn not_coercible(value: &Value, expected: &str) -> Error {
    Error::InvalidValue(format!("{value} cannot be read as {expected}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const JSON: &str = "application/json";

    fn normalize_json(value: Value, declared: DeclaredType) -> Result<PropertyValue, Error> {
        normalize(value.to_string().as_bytes(), JSON, declared)
    }

    #[test]
    fn bare_number_body() {
        assert_eq!(
            normalize_json(json!(21.5), DeclaredType::Number).unwrap(),
            PropertyValue::Number(21.5),
        );
    }

    #[test]
    fn value_envelope_unwrapped() {
        assert_eq!(
            normalize_json(json!({"value": 21.5}), DeclaredType::Number).unwrap(),
            PropertyValue::Number(21.5),
        );
    }

    #[test]
    fn single_entry_object_unwrapped() {
        assert_eq!(
            normalize_json(json!({"temperature": 18}), DeclaredType::Number).unwrap(),
            PropertyValue::Number(18.0),
        );
    }

    #[test]
    fn envelope_kept_for_object_properties() {
        assert_eq!(
            normalize_json(json!({"value": 1}), DeclaredType::Object).unwrap(),
            PropertyValue::Json(json!({"value": 1})),
        );
    }

    #[test]
    fn quoted_number_coerced() {
        assert_eq!(
            normalize_json(json!("21.5"), DeclaredType::Number).unwrap(),
            PropertyValue::Number(21.5),
        );
    }

    #[test]
    fn integer_via_float() {
        // "25.0" must become the integer 25, not an error
        assert_eq!(
            normalize_json(json!("25.0"), DeclaredType::Integer).unwrap(),
            PropertyValue::Integer(25),
        );
        assert_eq!(
            normalize_json(json!(25.7), DeclaredType::Integer).unwrap(),
            PropertyValue::Integer(25),
        );
    }

    #[test]
    fn non_numeric_payload_is_an_error_not_a_panic() {
        let err = normalize_json(json!("offline"), DeclaredType::Number).unwrap_err();
        assert!(matches!(err, Error::InvalidValue(_)));
    }

    #[test]
    fn text_body_with_json_content_type() {
        assert_eq!(
            normalize(b"42", JSON, DeclaredType::Number).unwrap(),
            PropertyValue::Number(42.0),
        );
        assert_eq!(
            normalize(b"not json at all", JSON, DeclaredType::String).unwrap(),
            PropertyValue::Text("not json at all".to_string()),
        );
    }

    #[test]
    fn plain_text_number_conversion() {
        assert_eq!(
            normalize(b"42", "text/plain", DeclaredType::Unknown).unwrap(),
            PropertyValue::Integer(42),
        );
        assert_eq!(
            normalize(b"21.5", "text/plain", DeclaredType::Unknown).unwrap(),
            PropertyValue::Number(21.5),
        );
        assert_eq!(
            normalize(b"on", "text/plain", DeclaredType::Unknown).unwrap(),
            PropertyValue::Text("on".to_string()),
        );
    }

    #[test]
    fn unknown_type_passes_composites_through() {
        let payload = json!({"lat": 1.0, "lon": 2.0, "alt": 3.0});
        assert_eq!(
            normalize_json(payload.clone(), DeclaredType::Unknown).unwrap(),
            PropertyValue::Json(payload),
        );
    }

    #[test]
    fn boolean_from_string() {
        assert_eq!(
            normalize_json(json!("true"), DeclaredType::Boolean).unwrap(),
            PropertyValue::Bool(true),
        );
        assert_eq!(
            normalize(b"false", "text/plain", DeclaredType::Boolean).unwrap(),
            PropertyValue::Bool(false),
        );
    }

    #[test]
    fn untagged_serialization() {
        assert_eq!(serde_json::to_value(PropertyValue::Number(1.5)).unwrap(), json!(1.5));
        assert_eq!(serde_json::to_value(PropertyValue::Integer(7)).unwrap(), json!(7));
        assert_eq!(
            serde_json::to_value(PropertyValue::Text("on".into())).unwrap(),
            json!("on"),
        );
    }
}
