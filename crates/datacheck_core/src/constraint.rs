//! Constraint kinds, values, per-column records and the ordered constraint set.

use crate::frame::render_float;
use crate::{CoreError, Value};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::str::FromStr;

/// The closed set of rules a column can carry.
///
/// Declaration order is the canonical order of kinds inside a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ConstraintKind {
    DataType,
    Nullable,
    Unique,
    MinLength,
    MaxLength,
    ValueRange,
    MinValue,
    MaxValue,
    MinDate,
    MaxDate,
}

impl ConstraintKind {
    /// Every kind, in canonical order.
    pub const ALL: [ConstraintKind; 10] = [
        ConstraintKind::DataType,
        ConstraintKind::Nullable,
        ConstraintKind::Unique,
        ConstraintKind::MinLength,
        ConstraintKind::MaxLength,
        ConstraintKind::ValueRange,
        ConstraintKind::MinValue,
        ConstraintKind::MaxValue,
        ConstraintKind::MinDate,
        ConstraintKind::MaxDate,
    ];

    /// Wire name of the kind, as stored in constraint files.
    pub fn as_str(&self) -> &'static str {
        match self {
            ConstraintKind::DataType => "data_type",
            ConstraintKind::Nullable => "nullable",
            ConstraintKind::Unique => "unique",
            ConstraintKind::MinLength => "min_length",
            ConstraintKind::MaxLength => "max_length",
            ConstraintKind::ValueRange => "value_range",
            ConstraintKind::MinValue => "min_value",
            ConstraintKind::MaxValue => "max_value",
            ConstraintKind::MinDate => "min_date",
            ConstraintKind::MaxDate => "max_date",
        }
    }

    /// Returns true for kinds whose check also reports the offending rows.
    ///
    /// Bound checks on values and dates only count.
    pub fn is_row_capturing(&self) -> bool {
        matches!(
            self,
            ConstraintKind::DataType
                | ConstraintKind::Nullable
                | ConstraintKind::Unique
                | ConstraintKind::MinLength
                | ConstraintKind::MaxLength
                | ConstraintKind::ValueRange
        )
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConstraintKind {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConstraintKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| CoreError::UnknownConstraintKind(s.to_string()))
    }
}

/// Expected value of one constraint.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintValue {
    /// Null bound: NaN for numbers, the null date for dates
    Missing,
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    /// Distinct values, first-seen order
    Values(Vec<Value>),
}

impl ConstraintValue {
    /// Builds a `Values` constraint, dropping repeated members.
    pub fn values<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        let mut seen = HashSet::new();
        ConstraintValue::Values(
            values
                .into_iter()
                .map(Into::into)
                .filter(|v: &Value| seen.insert(v.key()))
                .collect(),
        )
    }

    /// Returns true for `Missing` and for a NaN float.
    pub fn is_missing(&self) -> bool {
        match self {
            ConstraintValue::Missing => true,
            ConstraintValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstraintValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Non-negative whole number view, used for length bounds.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            ConstraintValue::Integer(i) => usize::try_from(*i).ok(),
            ConstraintValue::Float(f) if f.fract() == 0.0 && *f >= 0.0 => Some(*f as usize),
            _ => None,
        }
    }

    /// Numeric view; `Missing` reads as NaN.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConstraintValue::Missing => Some(f64::NAN),
            ConstraintValue::Integer(i) => Some(*i as f64),
            ConstraintValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConstraintValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_values(&self) -> Option<&[Value]> {
        match self {
            ConstraintValue::Values(values) => Some(values),
            _ => None,
        }
    }
}

impl fmt::Display for ConstraintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintValue::Missing => f.write_str("nan"),
            ConstraintValue::Bool(true) => f.write_str("True"),
            ConstraintValue::Bool(false) => f.write_str("False"),
            ConstraintValue::Integer(i) => write!(f, "{i}"),
            ConstraintValue::Float(x) => f.write_str(&render_float(*x)),
            ConstraintValue::Text(s) => f.write_str(s),
            ConstraintValue::Values(values) => {
                let items: Vec<String> = values.iter().map(Value::render).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// JSON-facing adapter: plain booleans and numbers, arrays for value sets,
/// `null` for missing bounds and NaN.
impl Serialize for ConstraintValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ConstraintValue::Missing => serializer.serialize_none(),
            ConstraintValue::Float(f) if f.is_nan() => serializer.serialize_none(),
            ConstraintValue::Bool(b) => serializer.serialize_bool(*b),
            ConstraintValue::Integer(i) => serializer.serialize_i64(*i),
            ConstraintValue::Float(f) => serializer.serialize_f64(*f),
            ConstraintValue::Text(s) => serializer.serialize_str(s),
            ConstraintValue::Values(values) => {
                let mut seq = serializer.serialize_seq(Some(values.len()))?;
                for value in values {
                    seq.serialize_element(value)?;
                }
                seq.end()
            }
        }
    }
}

impl From<bool> for ConstraintValue {
    fn from(b: bool) -> Self {
        ConstraintValue::Bool(b)
    }
}

impl From<i64> for ConstraintValue {
    fn from(i: i64) -> Self {
        ConstraintValue::Integer(i)
    }
}

impl From<usize> for ConstraintValue {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(ConstraintValue::Float(n as f64), ConstraintValue::Integer)
    }
}

impl From<f64> for ConstraintValue {
    fn from(f: f64) -> Self {
        ConstraintValue::Float(f)
    }
}

impl From<&str> for ConstraintValue {
    fn from(s: &str) -> Self {
        ConstraintValue::Text(s.to_string())
    }
}

impl From<String> for ConstraintValue {
    fn from(s: String) -> Self {
        ConstraintValue::Text(s)
    }
}

/// Converts a profiled cell (a numeric bound) into a constraint value.
impl From<Value> for ConstraintValue {
    fn from(value: Value) -> Self {
        match value {
            v if v.is_null() => ConstraintValue::Missing,
            Value::Bool(b) => ConstraintValue::Bool(b),
            Value::Int(i) => ConstraintValue::Integer(i),
            Value::Float(f) => ConstraintValue::Float(f),
            Value::Str(s) => ConstraintValue::Text(s),
            other => ConstraintValue::Text(other.render()),
        }
    }
}

/// Rules for one column, keyed by kind in canonical order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintRecord {
    entries: BTreeMap<ConstraintKind, ConstraintValue>,
}

impl ConstraintRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a rule, builder style.
    pub fn with(mut self, kind: ConstraintKind, value: impl Into<ConstraintValue>) -> Self {
        self.entries.insert(kind, value.into());
        self
    }

    /// Adds or replaces a rule, returning the previous value.
    pub fn insert(
        &mut self,
        kind: ConstraintKind,
        value: impl Into<ConstraintValue>,
    ) -> Option<ConstraintValue> {
        self.entries.insert(kind, value.into())
    }

    pub fn get(&self, kind: ConstraintKind) -> Option<&ConstraintValue> {
        self.entries.get(&kind)
    }

    pub fn contains(&self, kind: ConstraintKind) -> bool {
        self.entries.contains_key(&kind)
    }

    pub fn remove(&mut self, kind: ConstraintKind) -> Option<ConstraintValue> {
        self.entries.remove(&kind)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (ConstraintKind, &ConstraintValue)> {
        self.entries.iter().map(|(kind, value)| (*kind, value))
    }

    pub fn kinds(&self) -> impl Iterator<Item = ConstraintKind> + '_ {
        self.entries.keys().copied()
    }

    /// Overwrites overlapping kinds with `other`'s values and adds the rest.
    pub fn merge(&mut self, other: ConstraintRecord) {
        self.entries.extend(other.entries);
    }
}

impl FromIterator<(ConstraintKind, ConstraintValue)> for ConstraintRecord {
    fn from_iter<T: IntoIterator<Item = (ConstraintKind, ConstraintValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Serialize for ConstraintRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (kind, value) in &self.entries {
            map.serialize_entry(kind.as_str(), value)?;
        }
        map.end()
    }
}

/// Constraint records keyed by column name, in insertion order.
///
/// Replacing the record of an existing column keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintSet {
    columns: Vec<(String, ConstraintRecord)>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, column: &str) -> Option<&ConstraintRecord> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, record)| record)
    }

    pub fn get_mut(&mut self, column: &str) -> Option<&mut ConstraintRecord> {
        self.columns
            .iter_mut()
            .find(|(name, _)| name == column)
            .map(|(_, record)| record)
    }

    pub fn contains(&self, column: &str) -> bool {
        self.get(column).is_some()
    }

    /// Sets the record for `column`, returning the one it replaced.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        record: ConstraintRecord,
    ) -> Option<ConstraintRecord> {
        let column = column.into();
        match self.get_mut(&column) {
            Some(existing) => Some(std::mem::replace(existing, record)),
            None => {
                self.columns.push((column, record));
                None
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConstraintRecord)> {
        self.columns
            .iter()
            .map(|(name, record)| (name.as_str(), record))
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    /// Every kind used by any record, in order of first appearance.
    pub fn kinds(&self) -> Vec<ConstraintKind> {
        let mut kinds = Vec::new();
        for kind in self.columns.iter().flat_map(|(_, record)| record.kinds()) {
            if !kinds.contains(&kind) {
                kinds.push(kind);
            }
        }
        kinds
    }
}

impl FromIterator<(String, ConstraintRecord)> for ConstraintSet {
    fn from_iter<T: IntoIterator<Item = (String, ConstraintRecord)>>(iter: T) -> Self {
        let mut set = ConstraintSet::new();
        for (column, record) in iter {
            set.insert(column, record);
        }
        set
    }
}

impl Serialize for ConstraintSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.columns.len()))?;
        for (column, record) in &self.columns {
            map.serialize_entry(column, record)?;
        }
        map.end()
    }
}
