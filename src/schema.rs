//! Input schema validation
//!
//! Action parameters are checked against the action's declared input
//! [`DataSchema`] before any request leaves the host. Validation is strict on
//! what the schema declares and permissive on what it doesn't: a schema
//! without a `type` accepts any JSON value, an object schema without a
//! `properties` map accepts any fields.

use serde_json::Value;

use crate::{
    error::Error,
    thing::{ArraySchema, DataSchema, DataSchemaSubtype, IntegerSchema, NumberSchema, ObjectSchema, StringSchema},
};

/// Validates `params` against `schema`, reporting the first violation as
/// [`Error::InvalidParameters`].
pub fn validate_params(schema: &DataSchema, params: &Value) -> Result<(), Error> {
    validate_at(schema, params, "parameters")
}

fn validate_at(schema: &DataSchema, value: &Value, path: &str) -> Result<(), Error> {
    if let Some(allowed) = &schema.enumeration {
        if !allowed.contains(value) {
            return Err(invalid(path, format!("{value} is not one of the allowed values")));
        }
    }

    match &schema.subtype {
        Some(DataSchemaSubtype::Number(number)) => validate_number(number, value, path),
        Some(DataSchemaSubtype::Integer(integer)) => validate_integer(integer, value, path),
        Some(DataSchemaSubtype::Boolean) => match value {
            Value::Bool(_) => Ok(()),
            _ => Err(invalid(path, format!("expected a boolean, got {value}"))),
        },
        Some(DataSchemaSubtype::String(string)) => validate_string(string, value, path),
        Some(DataSchemaSubtype::Object(object)) => validate_object(object, value, path),
        Some(DataSchemaSubtype::Array(array)) => validate_array(array, value, path),
        Some(DataSchemaSubtype::Null) => match value {
            Value::Null => Ok(()),
            _ => Err(invalid(path, format!("expected null, got {value}"))),
        },
        None => Ok(()),
    }
}

fn validate_number(schema: &NumberSchema, value: &Value, path: &str) -> Result<(), Error> {
    let Some(number) = value.as_f64() else {
        return Err(invalid(path, format!("expected a number, got {value}")));
    };

    if let Some(minimum) = &schema.minimum {
        if !minimum.allows(&number) {
            return Err(invalid(path, format!("{number} is below the minimum")));
        }
    }
    if let Some(maximum) = &schema.maximum {
        if !maximum.allows(&number) {
            return Err(invalid(path, format!("{number} is above the maximum")));
        }
    }

    Ok(())
}

fn validate_integer(schema: &IntegerSchema, value: &Value, path: &str) -> Result<(), Error> {
    // Accept 25.0 as the integer 25; reject 25.5.
    let integer = match value.as_i64() {
        Some(i) => i,
        None => match value.as_f64() {
            Some(f) if f.fract() == 0.0 => f as i64,
            _ => return Err(invalid(path, format!("expected an integer, got {value}"))),
        },
    };

    if let Some(minimum) = &schema.minimum {
        if !minimum.allows(&integer) {
            return Err(invalid(path, format!("{integer} is below the minimum")));
        }
    }
    if let Some(maximum) = &schema.maximum {
        if !maximum.allows(&integer) {
            return Err(invalid(path, format!("{integer} is above the maximum")));
        }
    }

    Ok(())
}

fn validate_string(schema: &StringSchema, value: &Value, path: &str) -> Result<(), Error> {
    let Some(text) = value.as_str() else {
        return Err(invalid(path, format!("expected a string, got {value}")));
    };

    let length = text.chars().count() as u32;
    if schema.min_length.is_some_and(|min| length < min) {
        return Err(invalid(path, "string is shorter than the minimum length".to_string()));
    }
    if schema.max_length.is_some_and(|max| length > max) {
        return Err(invalid(path, "string is longer than the maximum length".to_string()));
    }

    Ok(())
}

fn validate_object(schema: &ObjectSchema, value: &Value, path: &str) -> Result<(), Error> {
    let Some(map) = value.as_object() else {
        return Err(invalid(path, format!("expected an object, got {value}")));
    };

    for required in schema.required.iter().flatten() {
        if !map.contains_key(required) {
            return Err(invalid(path, format!("missing required field \"{required}\"")));
        }
    }

    if let Some(declared) = &schema.properties {
        for key in map.keys() {
            if !declared.contains_key(key) {
                return Err(invalid(path, format!("unexpected field \"{key}\"")));
            }
        }
        for (key, field_schema) in declared {
            if let Some(field) = map.get(key) {
                validate_at(field_schema, field, &format!("{path}.{key}"))?;
            }
        }
    }

    Ok(())
}

fn validate_array(schema: &ArraySchema, value: &Value, path: &str) -> Result<(), Error> {
    let Some(items) = value.as_array() else {
        return Err(invalid(path, format!("expected an array, got {value}")));
    };

    let count = items.len() as u32;
    if let Some(min) = schema.min_items {
        if count < min {
            return Err(invalid(path, format!("array has fewer than {min} items")));
        }
    }
    if let Some(max) = schema.max_items {
        if count > max {
            return Err(invalid(path, format!("array has more than {max} items")));
        }
    }

    match schema.items.as_deref() {
        // A single item schema applies to every element.
        Some([item_schema]) => {
            for (index, item) in items.iter().enumerate() {
                validate_at(item_schema, item, &format!("{path}[{index}]"))?;
            }
        }
        // Multiple schemas validate positionally.
        Some(schemas) => {
            for (index, (item_schema, item)) in schemas.iter().zip(items).enumerate() {
                validate_at(item_schema, item, &format!("{path}[{index}]"))?;
            }
        }
        None => {}
    }

    Ok(())
}

fn invalid(path: &str, message: String) -> Error {
    Error::InvalidParameters(format!("{path}: {message}"))
}
