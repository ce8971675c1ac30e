//! In-memory columnar dataset.
//!
//! `DataFrame` is deliberately small: it exposes the operations the profiler
//! and verifier need (missing masks, duplicate detection, rendered lengths,
//! distinct values, numeric and date extremes, row filtering and row-wise
//! concatenation) and nothing else.

use crate::{CoreError, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Declared element type of a column.
///
/// The names follow the conventions of dataframe engines (`int64`,
/// `datetime64[ns]`, ...) because constraint records store and compare them
/// as plain strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    /// 64-bit signed integers
    Int64,
    /// 64-bit floats
    Float64,
    /// Booleans
    Bool,
    /// Categorical values drawn from a finite domain
    Category,
    /// Free-form values, usually strings
    Object,
    /// Timestamps
    DateTime,
}

impl DataType {
    /// Returns the canonical name of this type.
    pub fn name(&self) -> &'static str {
        match self {
            DataType::Int64 => "int64",
            DataType::Float64 => "float64",
            DataType::Bool => "bool",
            DataType::Category => "category",
            DataType::Object => "object",
            DataType::DateTime => "datetime64[ns]",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Missing value
    Null,
    /// Boolean value
    Bool(bool),
    /// Integer value
    Int(i64),
    /// Floating point value; NaN counts as missing
    Float(f64),
    /// String value
    Str(String),
    /// Timestamp value
    DateTime(NaiveDateTime),
}

impl Value {
    /// Returns true for `Null` and for a NaN float.
    pub fn is_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of this value, if it is a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Attempts to get this value as a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Renders the value the way lengths are measured: missing values
    /// render as `nan`, booleans as `True`/`False`, whole floats keep a
    /// trailing `.0`.
    pub fn render(&self) -> String {
        match self {
            Value::Null => "nan".to_string(),
            Value::Bool(true) => "True".to_string(),
            Value::Bool(false) => "False".to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => render_float(*f),
            Value::Str(s) => s.clone(),
            Value::DateTime(dt) => dt.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }

    /// Hashable identity used for duplicate detection and set membership.
    ///
    /// All missing values share one key, and a whole float shares its key
    /// with the equal integer.
    pub fn key(&self) -> ValueKey {
        match self {
            Value::Null => ValueKey::Null,
            Value::Bool(b) => ValueKey::Bool(*b),
            Value::Int(i) => ValueKey::Int(*i),
            Value::Float(f) if f.is_nan() => ValueKey::Null,
            Value::Float(f) if is_whole_i64(*f) => ValueKey::Int(*f as i64),
            Value::Float(f) => ValueKey::Float(f.to_bits()),
            Value::Str(s) => ValueKey::Str(s.clone()),
            Value::DateTime(dt) => ValueKey::DateTime(*dt),
        }
    }

    /// Coerces this value to a timestamp. `Ok(None)` means missing.
    pub fn to_datetime(&self, column: &str) -> Result<Option<NaiveDateTime>> {
        match self {
            v if v.is_null() => Ok(None),
            Value::DateTime(dt) => Ok(Some(*dt)),
            Value::Str(s) => parse_datetime(s)
                .map(Some)
                .ok_or_else(|| CoreError::date_parse(column, s.as_str())),
            other => Err(CoreError::date_parse(column, other.render())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            v if v.is_null() => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            other => serializer.serialize_str(&other.render()),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<NaiveDate> for Value {
    fn from(date: NaiveDate) -> Self {
        Value::DateTime(date.and_time(NaiveTime::MIN))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Null, Into::into)
    }
}

/// Identity of a value for hashing. See [`Value::key`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Null,
    Bool(bool),
    Int(i64),
    Float(u64),
    Str(String),
    DateTime(NaiveDateTime),
}

/// Whole and inside the `i64` range, so the float keys like the equal integer.
fn is_whole_i64(value: f64) -> bool {
    value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64
}

/// Formats a float with a trailing `.0` when it is whole.
///
/// Whole values from 1e16 up switch to exponent form (`1e+16`) so the text
/// never reads back as an integer.
pub fn render_float(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let sign = if value > 0.0 { "" } else { "-" };
        format!("{sign}inf")
    } else if value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else if value.fract() == 0.0 {
        format!("{value:e}").replacen("e", "e+", 1)
    } else {
        format!("{value}")
    }
}

/// Parses the date and timestamp layouts accepted for date coercion.
pub fn parse_datetime(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(date.and_time(NaiveTime::MIN));
    }
    const LAYOUTS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];
    LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .or_else(|| {
            DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

/// A named, typed column of values.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    dtype: DataType,
    values: Vec<Value>,
}

impl Column {
    /// Creates a new column.
    pub fn new<V: Into<Value>>(
        name: impl Into<String>,
        dtype: DataType,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        Self {
            name: name.into(),
            dtype,
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dtype(&self) -> DataType {
        self.dtype
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// One flag per row, true where the value is missing.
    pub fn null_mask(&self) -> Vec<bool> {
        self.values.iter().map(Value::is_null).collect()
    }

    /// Returns true if any value is missing.
    pub fn has_nulls(&self) -> bool {
        self.values.iter().any(Value::is_null)
    }

    /// Flags every occurrence of a value after its first one.
    pub fn duplicated_mask(&self) -> Vec<bool> {
        let mut seen = HashSet::new();
        self.values.iter().map(|v| !seen.insert(v.key())).collect()
    }

    /// Flags every row whose value occurs more than once, first occurrence included.
    pub fn repeated_mask(&self) -> Vec<bool> {
        let mut counts: HashMap<ValueKey, usize> = HashMap::new();
        for value in &self.values {
            *counts.entry(value.key()).or_default() += 1;
        }
        self.values
            .iter()
            .map(|v| counts.get(&v.key()).is_some_and(|n| *n > 1))
            .collect()
    }

    /// Length in characters of each rendered value, missing values included.
    pub fn rendered_lengths(&self) -> Vec<usize> {
        self.values
            .iter()
            .map(|v| v.render().chars().count())
            .collect()
    }

    /// Distinct values in first-seen order; missing values collapse to one `Null`.
    pub fn distinct(&self) -> Vec<Value> {
        let mut seen = HashSet::new();
        self.values
            .iter()
            .filter(|v| seen.insert(v.key()))
            .map(|v| if v.is_null() { Value::Null } else { v.clone() })
            .collect()
    }

    /// Smallest non-missing number, or NaN when there is none.
    pub fn numeric_min(&self) -> Result<Value> {
        self.numeric_extreme(Ordering::Less)
    }

    /// Largest non-missing number, or NaN when there is none.
    pub fn numeric_max(&self) -> Result<Value> {
        self.numeric_extreme(Ordering::Greater)
    }

    fn numeric_extreme(&self, pick: Ordering) -> Result<Value> {
        let mut best: Option<(f64, &Value)> = None;
        for value in self.values.iter().filter(|v| !v.is_null()) {
            let x = value
                .as_f64()
                .ok_or_else(|| CoreError::not_numeric(&self.name, value.render()))?;
            match best {
                Some((current, _)) if x.partial_cmp(&current) != Some(pick) => {}
                _ => best = Some((x, value)),
            }
        }
        Ok(best.map_or(Value::Float(f64::NAN), |(_, v)| v.clone()))
    }

    /// Coerces every value to a timestamp; missing values become `None`.
    pub fn to_datetimes(&self) -> Result<Vec<Option<NaiveDateTime>>> {
        self.values
            .iter()
            .map(|v| v.to_datetime(&self.name))
            .collect()
    }

    /// Earliest timestamp, or `None` when every value is missing.
    pub fn date_min(&self) -> Result<Option<NaiveDateTime>> {
        Ok(self.to_datetimes()?.into_iter().flatten().min())
    }

    /// Latest timestamp, or `None` when every value is missing.
    pub fn date_max(&self) -> Result<Option<NaiveDateTime>> {
        Ok(self.to_datetimes()?.into_iter().flatten().max())
    }

    fn filter(&self, mask: &[bool]) -> Column {
        Column {
            name: self.name.clone(),
            dtype: self.dtype,
            values: self
                .values
                .iter()
                .zip(mask)
                .filter(|(_, keep)| **keep)
                .map(|(v, _)| v.clone())
                .collect(),
        }
    }
}

/// A dataset: equally long columns in a fixed order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataFrame {
    columns: Vec<Column>,
}

impl DataFrame {
    /// Creates a frame, checking that all columns have the same length.
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(CoreError::LengthMismatch {
                    column: bad.name.clone(),
                    expected,
                    actual: bad.len(),
                });
            }
        }
        Ok(Self { columns })
    }

    /// Creates a frame with no columns and no rows.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of rows.
    pub fn height(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the frame has no rows.
    pub fn is_empty(&self) -> bool {
        self.height() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(Column::name)
    }

    /// Looks up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| CoreError::missing_column(name))
    }

    /// Keeps the rows whose mask flag is set.
    pub fn filter(&self, mask: &[bool]) -> DataFrame {
        DataFrame {
            columns: self.columns.iter().map(|c| c.filter(mask)).collect(),
        }
    }

    /// Sets an `object` column holding `label` on every row. A column already
    /// named `name` is replaced in place, otherwise the column is appended.
    pub fn with_label(mut self, name: &str, label: &str) -> DataFrame {
        let height = self.height();
        let column = Column::new(name, DataType::Object, std::iter::repeat_n(label, height));
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
        self
    }

    /// Iterates over rows as cell references in column order.
    pub fn rows(&self) -> impl Iterator<Item = Vec<&Value>> + '_ {
        (0..self.height()).map(move |i| self.columns.iter().map(|c| &c.values[i]).collect())
    }

    /// Stacks frames row-wise. All frames must share column names in order;
    /// a column whose types disagree becomes `object`.
    pub fn concat(frames: Vec<DataFrame>) -> Result<DataFrame> {
        let mut frames = frames.into_iter();
        let mut columns = frames
            .next()
            .ok_or(CoreError::NothingToConcatenate)?
            .columns;

        for frame in frames {
            let same_layout = frame.columns.len() == columns.len()
                && frame
                    .columns
                    .iter()
                    .zip(&columns)
                    .all(|(a, b)| a.name == b.name);
            if !same_layout {
                let names: Vec<&str> = frame.column_names().collect();
                return Err(CoreError::SchemaMismatch(names.join(", ")));
            }
            for (target, source) in columns.iter_mut().zip(frame.columns) {
                if target.dtype != source.dtype {
                    target.dtype = DataType::Object;
                }
                target.values.extend(source.values);
            }
        }

        Ok(DataFrame { columns })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn names() -> Column {
        Column::new("name", DataType::Object, vec![Some("a"), None, Some("bb"), Some("a")])
    }

    #[test]
    fn test_null_detection() {
        let col = names();
        assert_eq!(col.null_mask(), vec![false, true, false, false]);
        assert!(col.has_nulls());
        assert!(Value::Float(f64::NAN).is_null());
    }

    #[test]
    fn test_duplicated_keeps_first() {
        assert_eq!(names().duplicated_mask(), vec![false, false, false, true]);

        let nulls = Column::new("x", DataType::Float64, vec![None, Some(f64::NAN)]);
        assert_eq!(nulls.duplicated_mask(), vec![false, true]);
    }

    #[test]
    fn test_repeated_flags_every_occurrence() {
        assert_eq!(names().repeated_mask(), vec![true, false, false, true]);
    }

    #[test]
    fn test_rendered_lengths_include_missing() {
        assert_eq!(names().rendered_lengths(), vec![1, 3, 2, 1]);
    }

    #[test]
    fn test_distinct_first_seen_order() {
        assert_eq!(
            names().distinct(),
            vec![Value::from("a"), Value::Null, Value::from("bb")]
        );
    }

    #[test]
    fn test_numeric_extremes() {
        let col = Column::new("age", DataType::Int64, vec![Some(30), None, Some(4), Some(90)]);
        assert_eq!(col.numeric_min().unwrap(), Value::Int(4));
        assert_eq!(col.numeric_max().unwrap(), Value::Int(90));

        let empty = Column::new("age", DataType::Float64, vec![None::<f64>, None]);
        assert!(empty.numeric_min().unwrap().is_null());
    }

    #[test]
    fn test_numeric_extreme_rejects_text() {
        let col = Column::new("age", DataType::Object, vec!["x"]);
        assert!(matches!(
            col.numeric_max(),
            Err(CoreError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_date_coercion() {
        let col = Column::new(
            "day",
            DataType::Object,
            vec![Some("2021-03-04"), None, Some("2020-01-02 10:00:00")],
        );
        let min = col.date_min().unwrap().unwrap();
        assert_eq!(min.format("%Y-%m-%d").to_string(), "2020-01-02");

        let bad = Column::new("day", DataType::Object, vec!["yesterday"]);
        assert!(matches!(bad.date_max(), Err(CoreError::DateParse { .. })));
    }

    #[test]
    fn test_render_float() {
        assert_eq!(render_float(1.0), "1.0");
        assert_eq!(render_float(0.25), "0.25");
        assert_eq!(render_float(f64::NAN), "nan");
        assert_eq!(render_float(1e16), "1e+16");
        assert_eq!(render_float(-2.5e20), "-2.5e+20");
    }

    #[test]
    fn test_frame_length_mismatch() {
        let result = DataFrame::new(vec![
            Column::new("a", DataType::Int64, vec![1, 2]),
            Column::new("b", DataType::Int64, vec![1]),
        ]);
        assert!(matches!(result, Err(CoreError::LengthMismatch { .. })));
    }

    #[test]
    fn test_filter_label_concat() {
        let frame = DataFrame::new(vec![names()]).unwrap();
        let nulls = frame.filter(&names().null_mask()).with_label("Validation", "nullable: name");
        let dups = frame
            .filter(&names().duplicated_mask())
            .with_label("Validation", "unique: name");

        let all = DataFrame::concat(vec![nulls, dups]).unwrap();
        assert_eq!(all.height(), 2);
        assert_eq!(all.width(), 2);
        let labels: Vec<String> = all
            .column("Validation")
            .unwrap()
            .values()
            .iter()
            .map(Value::render)
            .collect();
        assert_eq!(labels, vec!["nullable: name", "unique: name"]);
    }

    #[test]
    fn test_with_label_replaces_same_name() {
        let frame = DataFrame::new(vec![
            Column::new("tag", DataType::Object, vec!["old", "old"]),
            Column::new("n", DataType::Int64, vec![1i64, 2]),
        ])
        .unwrap()
        .with_label("tag", "new");

        let names: Vec<_> = frame.column_names().collect();
        assert_eq!(names, vec!["tag", "n"]);
        assert_eq!(
            frame.column("tag").unwrap().values(),
            &[Value::from("new"), Value::from("new")]
        );
    }

    #[test]
    fn test_concat_nothing() {
        assert!(matches!(
            DataFrame::concat(Vec::new()),
            Err(CoreError::NothingToConcatenate)
        ));
    }

    #[test]
    fn test_missing_column_lookup() {
        let frame = DataFrame::new(vec![names()]).unwrap();
        assert!(matches!(
            frame.column("nope"),
            Err(CoreError::MissingColumn(name)) if name == "nope"
        ));
    }
}
