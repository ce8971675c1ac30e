//! JSON constraint files.
//!
//! A constraint set is stored as an object keyed by column name, each value
//! an object keyed by constraint kind. Value sets are arrays and missing
//! bounds are `null`.

use crate::{Result, StoreError};
use datacheck_core::{
    ConstraintKind, ConstraintRecord, ConstraintSet, ConstraintValue, CoreError, Value,
};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Map, Value as JsonValue};
use std::io;

/// Serializes a constraint set as pretty-printed JSON with a 4-space indent.
pub fn to_json_string(constraints: &ConstraintSet) -> Result<String> {
    let mut buffer = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    constraints.serialize(&mut serializer)?;
    String::from_utf8(buffer)
        .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Parses a constraint set from JSON, keeping the column order of the input.
///
/// # Example
///
/// ```rust
/// use datacheck_core::{ConstraintKind, ConstraintValue};
/// use datacheck_store::from_json_str;
///
/// let json = r#"{"age": {"data_type": "int64", "max_value": null}}"#;
/// let constraints = from_json_str(json).unwrap();
///
/// let age = constraints.get("age").unwrap();
/// assert_eq!(age.get(ConstraintKind::MaxValue), Some(&ConstraintValue::Missing));
/// ```
pub fn from_json_str(content: &str) -> Result<ConstraintSet> {
    let root: JsonValue = serde_json::from_str(content)?;
    let JsonValue::Object(columns) = root else {
        return Err(shape_error("expected an object keyed by column name"));
    };

    let mut constraints = ConstraintSet::new();
    for (column, record) in columns {
        let JsonValue::Object(entries) = record else {
            return Err(shape_error(format!(
                "constraints for column '{column}' must be an object"
            )));
        };
        let record = parse_record(&column, entries)?;
        constraints.insert(column, record);
    }
    Ok(constraints)
}

fn parse_record(column: &str, entries: Map<String, JsonValue>) -> Result<ConstraintRecord> {
    let mut record = ConstraintRecord::new();
    for (name, value) in entries {
        let kind: ConstraintKind = name.parse()?;
        record.insert(kind, parse_constraint_value(column, kind, value)?);
    }
    Ok(record)
}

fn parse_constraint_value(
    column: &str,
    kind: ConstraintKind,
    value: JsonValue,
) -> Result<ConstraintValue> {
    let parsed = match value {
        JsonValue::Null => ConstraintValue::Missing,
        JsonValue::Bool(b) => ConstraintValue::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => ConstraintValue::Integer(i),
            None => ConstraintValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => ConstraintValue::Text(s),
        JsonValue::Array(items) => {
            let members = items
                .into_iter()
                .map(|item| parse_member(column, kind, item))
                .collect::<Result<Vec<_>>>()?;
            ConstraintValue::values(members)
        }
        other @ JsonValue::Object(_) => {
            return Err(CoreError::invalid_value(
                column,
                kind.as_str(),
                "a scalar or an array",
                other.to_string(),
            )
            .into());
        }
    };
    Ok(parsed)
}

fn parse_member(column: &str, kind: ConstraintKind, item: JsonValue) -> Result<Value> {
    let member = match item {
        JsonValue::Null => Value::Null,
        JsonValue::Bool(b) => Value::Bool(b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::Int(i),
            None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::Str(s),
        other => {
            return Err(CoreError::invalid_value(
                column,
                kind.as_str(),
                "scalar set members",
                other.to_string(),
            )
            .into());
        }
    };
    Ok(member)
}

fn shape_error(message: impl std::fmt::Display) -> StoreError {
    StoreError::Json(<serde_json::Error as serde::de::Error>::custom(message))
}
