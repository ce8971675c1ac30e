//! CSV constraint files.
//!
//! The table is transposed: the header holds an empty leading cell followed
//! by every constraint kind in use, and each row carries one column's
//! constraints. Absent and missing values are blank cells; blank cells are
//! dropped again on load.

use crate::set_literal::{decode_set_literal, encode_set_literal};
use crate::{Result, StoreError};
use datacheck_core::{
    ConstraintKind, ConstraintRecord, ConstraintSet, ConstraintValue, render_float,
};
use std::io;
use tracing::warn;

/// Serializes a constraint set as a transposed CSV table.
///
/// # Example
///
/// ```rust
/// use datacheck_core::{ConstraintKind, ConstraintRecord, ConstraintSet};
/// use datacheck_store::to_csv_string;
///
/// let mut constraints = ConstraintSet::new();
/// constraints.insert(
///     "age",
///     ConstraintRecord::new()
///         .with(ConstraintKind::DataType, "int64")
///         .with(ConstraintKind::Nullable, false),
/// );
///
/// assert_eq!(
///     to_csv_string(&constraints).unwrap(),
///     ",data_type,nullable\nage,int64,False\n"
/// );
/// ```
pub fn to_csv_string(constraints: &ConstraintSet) -> Result<String> {
    let kinds = constraints.kinds();
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec![String::new()];
    header.extend(kinds.iter().map(|kind| kind.as_str().to_string()));
    writer.write_record(&header)?;

    for (column, record) in constraints.iter() {
        let mut row = vec![column.to_string()];
        row.extend(
            kinds
                .iter()
                .map(|kind| record.get(*kind).map(encode_cell).unwrap_or_default()),
        );
        writer.write_record(&row)?;
    }

    let buffer = writer
        .into_inner()
        .map_err(|e| StoreError::Io(e.into_error()))?;
    String::from_utf8(buffer)
        .map_err(|e| StoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

fn encode_cell(value: &ConstraintValue) -> String {
    match value {
        ConstraintValue::Missing => String::new(),
        ConstraintValue::Float(f) if f.is_nan() => String::new(),
        ConstraintValue::Bool(true) => "True".to_string(),
        ConstraintValue::Bool(false) => "False".to_string(),
        ConstraintValue::Integer(i) => i.to_string(),
        ConstraintValue::Float(f) => render_float(*f),
        ConstraintValue::Text(s) => s.clone(),
        ConstraintValue::Values(values) => encode_set_literal(values),
    }
}

/// Parses a constraint set from a transposed CSV table.
///
/// Scalar cells are coerced in order: `True`/`False`, integer, float, and
/// text otherwise. `value_range` cells are decoded as set literals.
///
/// # Errors
///
/// Unknown kind names in the header fail with
/// `CoreError::UnknownConstraintKind`; rows without a column name fail with
/// `StoreError::MalformedRow`.
pub fn from_csv_str(content: &str) -> Result<ConstraintSet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(content.as_bytes());

    let kinds = reader
        .headers()?
        .iter()
        .skip(1)
        .map(str::parse)
        .collect::<datacheck_core::Result<Vec<ConstraintKind>>>()?;

    let mut constraints = ConstraintSet::new();
    for row in reader.records() {
        let row = row?;
        let line = row.position().map_or(0, |position| position.line());
        let mut cells = row.iter();
        let column = cells
            .next()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| StoreError::malformed_row(line, "missing column name"))?;

        let mut record = ConstraintRecord::new();
        for (kind, cell) in kinds.iter().zip(cells) {
            if cell.is_empty() {
                continue;
            }
            let value = match kind {
                ConstraintKind::ValueRange => ConstraintValue::Values(decode_set_literal(cell)?),
                _ => coerce_scalar(cell),
            };
            record.insert(*kind, value);
        }

        if !record.contains(ConstraintKind::DataType) {
            warn!(column, line, "Constraint row has no data_type");
        }
        constraints.insert(column, record);
    }
    Ok(constraints)
}

fn coerce_scalar(cell: &str) -> ConstraintValue {
    match cell {
        "True" => ConstraintValue::Bool(true),
        "False" => ConstraintValue::Bool(false),
        _ => match (cell.parse::<i64>(), cell.parse::<f64>()) {
            (Ok(i), _) => ConstraintValue::Integer(i),
            (_, Ok(f)) if f.is_nan() => ConstraintValue::Missing,
            (_, Ok(f)) => ConstraintValue::Float(f),
            _ => ConstraintValue::Text(cell.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacheck_core::{CoreError, Value};
    use pretty_assertions::assert_eq;

    fn sample() -> ConstraintSet {
        let mut constraints = ConstraintSet::new();
        constraints.insert(
            "zone",
            ConstraintRecord::new()
                .with(ConstraintKind::DataType, "category")
                .with(ConstraintKind::Nullable, true)
                .with(
                    ConstraintKind::ValueRange,
                    ConstraintValue::values(vec![Value::from("north"), Value::Null]),
                ),
        );
        constraints.insert(
            "age",
            ConstraintRecord::new()
                .with(ConstraintKind::DataType, "int64")
                .with(ConstraintKind::Nullable, false)
                .with(ConstraintKind::MinValue, 0i64)
                .with(ConstraintKind::MaxValue, 90.5),
        );
        constraints
    }

    #[test]
    fn test_transposed_layout() {
        let text = to_csv_string(&sample()).unwrap();
        assert_eq!(
            text,
            ",data_type,nullable,value_range,min_value,max_value\n\
             zone,category,True,\"{'north', nan}\",,\n\
             age,int64,False,,0,90.5\n"
        );
    }

    #[test]
    fn test_round_trip() {
        let original = sample();
        let loaded = from_csv_str(&to_csv_string(&original).unwrap()).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_missing_values_become_blank_and_are_dropped() {
        let mut constraints = ConstraintSet::new();
        constraints.insert(
            "score",
            ConstraintRecord::new()
                .with(ConstraintKind::DataType, "float64")
                .with(ConstraintKind::MinValue, ConstraintValue::Missing)
                .with(ConstraintKind::MaxValue, f64::NAN),
        );
        let text = to_csv_string(&constraints).unwrap();
        assert_eq!(text, ",data_type,min_value,max_value\nscore,float64,,\n");

        let loaded = from_csv_str(&text).unwrap();
        let score = loaded.get("score").unwrap();
        assert_eq!(score.len(), 1);
        assert!(!score.contains(ConstraintKind::MinValue));
    }

    #[test]
    fn test_scalar_coercion() {
        assert_eq!(coerce_scalar("True"), ConstraintValue::Bool(true));
        assert_eq!(coerce_scalar("12"), ConstraintValue::Integer(12));
        assert_eq!(coerce_scalar("1.0"), ConstraintValue::Float(1.0));
        assert_eq!(coerce_scalar("nan"), ConstraintValue::Missing);
        assert_eq!(coerce_scalar("2021-01-01"), ConstraintValue::Text("2021-01-01".into()));
        assert_eq!(coerce_scalar("true"), ConstraintValue::Text("true".into()));
    }

    #[test]
    fn test_large_whole_float_bound_stays_float() {
        let mut constraints = ConstraintSet::new();
        constraints.insert(
            "total",
            ConstraintRecord::new()
                .with(ConstraintKind::DataType, "float64")
                .with(ConstraintKind::MaxValue, 1e16),
        );

        let text = to_csv_string(&constraints).unwrap();
        assert_eq!(text, ",data_type,max_value\ntotal,float64,1e+16\n");
        assert_eq!(from_csv_str(&text).unwrap(), constraints);
    }

    #[test]
    fn test_unknown_kind_in_header() {
        let err = from_csv_str(",data_type,max_mean\nx,int64,3\n").unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::UnknownConstraintKind(name)) if name == "max_mean"
        ));
    }

    #[test]
    fn test_row_without_column_name() {
        let err = from_csv_str(",data_type\n,int64\n").unwrap_err();
        assert!(matches!(err, StoreError::MalformedRow { line: 2, .. }));
    }

    #[test]
    fn test_bad_set_literal() {
        let err = from_csv_str(",value_range\nx,\"['a']\"\n").unwrap_err();
        assert!(matches!(err, StoreError::SetLiteral { position: 0, .. }));
    }

    #[test]
    fn test_ragged_row_fails() {
        let err = from_csv_str(",data_type,nullable\nx,int64\n").unwrap_err();
        assert!(matches!(err, StoreError::Csv(_)));
    }
}
