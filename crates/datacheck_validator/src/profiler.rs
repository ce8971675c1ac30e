//! Constraint discovery.
//!
//! The profiler looks at every column of a frame and records the rules the
//! data currently satisfies. Which rules are recorded depends on the column
//! category:
//! - all columns: `data_type`, `nullable`
//! - categorical: `unique`, `min_length`, `max_length`, `value_range`
//! - numeric: `min_value`, `max_value`
//! - datetime: `min_date`, `max_date`

use datacheck_core::{
    Column, ColumnCategory, ConstraintKind, ConstraintRecord, ConstraintSet, ConstraintValue,
    CoreError, DataFrame, Result, classify,
};
use tracing::debug;

/// Derives and holds a constraint set.
///
/// # Example
///
/// ```rust
/// use datacheck_core::{Column, ConstraintKind, ConstraintValue, DataFrame, DataType};
/// use datacheck_validator::Profiler;
///
/// let frame = DataFrame::new(vec![
///     Column::new("age", DataType::Int64, vec![Some(31i64), None, Some(7)]),
/// ])
/// .unwrap();
///
/// let mut profiler = Profiler::new();
/// let constraints = profiler.generate(&frame).unwrap();
/// let age = constraints.get("age").unwrap();
/// assert_eq!(age.get(ConstraintKind::Nullable), Some(&ConstraintValue::Bool(true)));
/// assert_eq!(age.get(ConstraintKind::MaxValue), Some(&ConstraintValue::Integer(31)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Profiler {
    constraints: ConstraintSet,
}

impl Profiler {
    /// Creates a profiler with an empty constraint set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an existing constraint set, e.g. one loaded from disk, for editing.
    pub fn with_constraints(constraints: ConstraintSet) -> Self {
        Self { constraints }
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn into_constraints(self) -> ConstraintSet {
        self.constraints
    }

    /// Profiles every column of `frame`.
    ///
    /// The record of each profiled column is rebuilt from scratch; columns
    /// held from an earlier call that `frame` does not have are left alone.
    ///
    /// # Errors
    ///
    /// Fails when a numeric column holds a non-numeric cell or a datetime
    /// column an unparseable one. The held constraint set is unchanged then.
    pub fn generate(&mut self, frame: &DataFrame) -> Result<&ConstraintSet> {
        let classes = classify(frame);
        let mut records = Vec::with_capacity(frame.width());

        for column in frame.columns() {
            let mut record = ConstraintRecord::new()
                .with(ConstraintKind::DataType, column.dtype().name())
                .with(ConstraintKind::Nullable, column.has_nulls());

            match ColumnCategory::of(column.dtype()) {
                ColumnCategory::Categorical => record.merge(categorical_constraints(column)),
                ColumnCategory::Numeric => record.merge(numeric_constraints(column)?),
                ColumnCategory::DateTime => record.merge(datetime_constraints(column)?),
                ColumnCategory::Other => {}
            }
            records.push((column.name(), record));
        }

        for (name, record) in records {
            self.constraints.insert(name, record);
        }

        debug!(
            columns = frame.width(),
            categorical = classes.categorical.len(),
            numeric = classes.numeric.len(),
            datetime = classes.datetime.len(),
            "Profiled dataset"
        );
        Ok(&self.constraints)
    }

    /// Merges `partial` into the record of `column`, overwriting kinds that
    /// are already present.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::UnknownColumn` if `column` has no record yet.
    pub fn modify(&mut self, column: &str, partial: ConstraintRecord) -> Result<&ConstraintSet> {
        let record = self
            .constraints
            .get_mut(column)
            .ok_or_else(|| CoreError::UnknownColumn(column.to_string()))?;
        record.merge(partial);
        Ok(&self.constraints)
    }
}

fn categorical_constraints(column: &Column) -> ConstraintRecord {
    let unique = !column.duplicated_mask().into_iter().any(|dup| dup);
    let lengths = column.rendered_lengths();
    let bound = |n: Option<&usize>| n.map_or(ConstraintValue::Missing, |n| (*n).into());

    ConstraintRecord::new()
        .with(ConstraintKind::Unique, unique)
        .with(ConstraintKind::MinLength, bound(lengths.iter().min()))
        .with(ConstraintKind::MaxLength, bound(lengths.iter().max()))
        .with(
            ConstraintKind::ValueRange,
            ConstraintValue::Values(column.distinct()),
        )
}

fn numeric_constraints(column: &Column) -> Result<ConstraintRecord> {
    Ok(ConstraintRecord::new()
        .with(ConstraintKind::MinValue, column.numeric_min()?)
        .with(ConstraintKind::MaxValue, column.numeric_max()?))
}

fn datetime_constraints(column: &Column) -> Result<ConstraintRecord> {
    // Bounds are only formatted when the column holds at least one date;
    // otherwise the null date is kept as is.
    let format = |bound: Option<chrono::NaiveDateTime>| {
        bound.map_or(ConstraintValue::Missing, |dt| {
            ConstraintValue::Text(dt.format("%Y-%m-%d").to_string())
        })
    };

    Ok(ConstraintRecord::new()
        .with(ConstraintKind::MinDate, format(column.date_min()?))
        .with(ConstraintKind::MaxDate, format(column.date_max()?)))
}
