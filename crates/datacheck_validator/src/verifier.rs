//! Verification of a dataset against a constraint set.
//!
//! A [`Verifier`] runs every recorded constraint when it is built and keeps
//! two results: a per-column summary of break counts and a table of the
//! offending rows, each tagged with the rule it broke.

use crate::checks::{CheckOutcome, evaluate};
use datacheck_core::{ConstraintKind, ConstraintSet, CoreError, DataFrame, Result};
use tracing::{debug, info};

/// Name of the column added to violating rows.
pub const VALIDATION_COLUMN: &str = "Validation";

/// Check outcomes per column, in constraint-set order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VerificationSummary {
    rows: Vec<(String, Vec<(ConstraintKind, CheckOutcome)>)>,
}

impl VerificationSummary {
    /// Outcome of `kind` on `column`, if that constraint was evaluated.
    pub fn get(&self, column: &str, kind: ConstraintKind) -> Option<CheckOutcome> {
        self.rows
            .iter()
            .find(|(name, _)| name == column)
            .and_then(|(_, outcomes)| outcomes.iter().find(|(k, _)| *k == kind))
            .map(|(_, outcome)| *outcome)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[(ConstraintKind, CheckOutcome)])> {
        self.rows
            .iter()
            .map(|(name, outcomes)| (name.as_str(), outcomes.as_slice()))
    }

    /// Every evaluated kind, in order of first appearance.
    pub fn kinds(&self) -> Vec<ConstraintKind> {
        let mut kinds = Vec::new();
        for (kind, _) in self.rows.iter().flat_map(|(_, outcomes)| outcomes) {
            if !kinds.contains(kind) {
                kinds.push(*kind);
            }
        }
        kinds
    }

    /// Sum of all break counts.
    pub fn total_breaks(&self) -> usize {
        self.outcomes().filter_map(CheckOutcome::breaks).sum()
    }

    /// Number of columns whose declared type does not match.
    pub fn type_mismatches(&self) -> usize {
        self.outcomes()
            .filter(|outcome| matches!(outcome, CheckOutcome::TypeMismatch(true)))
            .count()
    }

    fn outcomes(&self) -> impl Iterator<Item = CheckOutcome> + '_ {
        self.rows
            .iter()
            .flat_map(|(_, outcomes)| outcomes.iter().map(|(_, outcome)| *outcome))
    }
}

/// Gathers offending rows for one verification run.
struct ViolationsBuilder<'a> {
    frame: &'a DataFrame,
    batches: Vec<DataFrame>,
}

impl<'a> ViolationsBuilder<'a> {
    fn new(frame: &'a DataFrame) -> Self {
        Self {
            frame,
            batches: Vec::new(),
        }
    }

    fn capture(&mut self, mask: &[bool], kind: ConstraintKind, column: &str) {
        let label = format!("{kind}: {column}");
        self.batches
            .push(self.frame.filter(mask).with_label(VALIDATION_COLUMN, &label));
    }

    /// Stacks the captured batches. Nothing captured means no violations.
    fn finish(self) -> Result<DataFrame> {
        match DataFrame::concat(self.batches) {
            Err(CoreError::NothingToConcatenate) => {
                let none = vec![false; self.frame.height()];
                Ok(self.frame.filter(&none).with_label(VALIDATION_COLUMN, ""))
            }
            other => other,
        }
    }
}

/// Verifies a dataset against a constraint set.
///
/// All checks run in [`Verifier::new`]; the verifier is a read-only holder
/// of the results afterwards.
///
/// # Example
///
/// ```rust
/// use datacheck_core::{
///     Column, ConstraintKind, ConstraintRecord, ConstraintSet, DataFrame, DataType,
/// };
/// use datacheck_validator::{CheckOutcome, Verifier};
///
/// let frame = DataFrame::new(vec![
///     Column::new("name", DataType::Object, vec![Some("a"), None, Some("b")]),
/// ])
/// .unwrap();
///
/// let mut constraints = ConstraintSet::new();
/// constraints.insert(
///     "name",
///     ConstraintRecord::new().with(ConstraintKind::Nullable, false),
/// );
///
/// let verifier = Verifier::new(&frame, &constraints).unwrap();
/// assert_eq!(
///     verifier.summary().get("name", ConstraintKind::Nullable),
///     Some(CheckOutcome::Breaks(1))
/// );
/// assert_eq!(verifier.violations().height(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Verifier {
    summary: VerificationSummary,
    violations: DataFrame,
}

impl Verifier {
    /// Runs every constraint of `constraints` against `frame`.
    ///
    /// # Errors
    ///
    /// Fails on the first column missing from `frame`, constraint value of
    /// the wrong shape, non-numeric cell under a value bound or unparseable
    /// cell under a date bound. No partial results are returned.
    pub fn new(frame: &DataFrame, constraints: &ConstraintSet) -> Result<Self> {
        let mut builder = ViolationsBuilder::new(frame);
        let mut rows = Vec::with_capacity(constraints.len());

        for (name, record) in constraints.iter() {
            let column = frame.column(name)?;
            let mut outcomes = Vec::with_capacity(record.len());

            for (kind, expected) in record.iter() {
                let evaluation = evaluate(kind, expected, column)?;
                debug!(
                    column = name,
                    check = %kind,
                    outcome = %evaluation.outcome,
                    "Check evaluated"
                );
                if let Some(mask) = evaluation.offending {
                    builder.capture(&mask, kind, name);
                }
                outcomes.push((kind, evaluation.outcome));
            }

            rows.push((name.to_string(), outcomes));
        }

        let summary = VerificationSummary { rows };
        let violations = builder.finish()?;
        info!(
            columns = constraints.len(),
            breaks = summary.total_breaks(),
            type_mismatches = summary.type_mismatches(),
            violating_rows = violations.height(),
            "Verification finished"
        );

        Ok(Self {
            summary,
            violations,
        })
    }

    pub fn summary(&self) -> &VerificationSummary {
        &self.summary
    }

    /// Offending rows of the row-capturing checks, with a `Validation` column.
    pub fn violations(&self) -> &DataFrame {
        &self.violations
    }

    pub fn total_breaks(&self) -> usize {
        self.summary.total_breaks()
    }

    /// Returns true when no check found a break or type mismatch.
    pub fn passed(&self) -> bool {
        self.summary.outcomes().all(|outcome| outcome.passed())
    }

    pub fn into_parts(self) -> (VerificationSummary, DataFrame) {
        (self.summary, self.violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use datacheck_core::{Column, ConstraintRecord, DataType, Value};
    use pretty_assertions::assert_eq;

    fn labels(frame: &DataFrame) -> Vec<String> {
        frame
            .column(VALIDATION_COLUMN)
            .unwrap()
            .values()
            .iter()
            .map(Value::render)
            .collect()
    }

    fn set(column: &str, record: ConstraintRecord) -> ConstraintSet {
        let mut set = ConstraintSet::new();
        set.insert(column, record);
        set
    }

    #[test]
    fn test_unique_scenario() {
        let frame = DataFrame::new(vec![Column::new("id", DataType::Int64, vec![1i64, 1, 2, 3])])
            .unwrap();
        let constraints = set("id", ConstraintRecord::new().with(ConstraintKind::Unique, true));

        let verifier = Verifier::new(&frame, &constraints).unwrap();
        assert_eq!(
            verifier.summary().get("id", ConstraintKind::Unique),
            Some(CheckOutcome::Breaks(2))
        );
        assert_eq!(labels(verifier.violations()), vec!["unique: id", "unique: id"]);
    }

    #[test]
    fn test_total_breaks_skips_type_flags() {
        let frame = DataFrame::new(vec![Column::new(
            "age",
            DataType::Int64,
            vec![Some(10i64), None, Some(120)],
        )])
        .unwrap();
        let constraints = set(
            "age",
            ConstraintRecord::new()
                .with(ConstraintKind::DataType, "float64")
                .with(ConstraintKind::Nullable, false)
                .with(ConstraintKind::MaxValue, 90i64),
        );

        let verifier = Verifier::new(&frame, &constraints).unwrap();
        assert_eq!(verifier.total_breaks(), 2);
        assert_eq!(verifier.summary().type_mismatches(), 1);
    }

    #[test]
    fn test_no_row_capturing_constraints_yields_empty_table() {
        let frame = DataFrame::new(vec![Column::new("age", DataType::Int64, vec![10i64, 120])])
            .unwrap();
        let constraints = set(
            "age",
            ConstraintRecord::new()
                .with(ConstraintKind::MinValue, 0i64)
                .with(ConstraintKind::MaxValue, 90i64),
        );

        let verifier = Verifier::new(&frame, &constraints).unwrap();
        assert_eq!(
            verifier.summary().get("age", ConstraintKind::MaxValue),
            Some(CheckOutcome::Breaks(1))
        );
        assert!(!verifier.passed());
        assert_eq!(verifier.violations().height(), 0);
        let names: Vec<_> = verifier.violations().column_names().collect();
        assert_eq!(names, vec!["age", VALIDATION_COLUMN]);
    }

    #[test]
    fn test_existing_validation_column_is_overwritten() {
        let frame = DataFrame::new(vec![
            Column::new("id", DataType::Int64, vec![1i64, 1]),
            Column::new(VALIDATION_COLUMN, DataType::Object, vec!["ok", "ok"]),
        ])
        .unwrap();
        let constraints = set("id", ConstraintRecord::new().with(ConstraintKind::Unique, true));

        let verifier = Verifier::new(&frame, &constraints).unwrap();
        let names: Vec<_> = verifier.violations().column_names().collect();
        assert_eq!(names, vec!["id", VALIDATION_COLUMN]);
        assert_eq!(labels(verifier.violations()), vec!["unique: id", "unique: id"]);
    }

    #[test]
    fn test_missing_column() {
        let frame = DataFrame::new(vec![Column::new("a", DataType::Int64, vec![1i64])]).unwrap();
        let constraints = set("b", ConstraintRecord::new().with(ConstraintKind::Nullable, false));
        let err = Verifier::new(&frame, &constraints).unwrap_err();
        assert!(matches!(err, CoreError::MissingColumn(name) if name == "b"));
    }

    #[test]
    fn test_summary_follows_record_kinds() {
        let frame = DataFrame::new(vec![Column::new("a", DataType::Int64, vec![1i64])]).unwrap();
        let constraints = set(
            "a",
            ConstraintRecord::new()
                .with(ConstraintKind::DataType, "int64")
                .with(ConstraintKind::Nullable, false),
        );
        let verifier = Verifier::new(&frame, &constraints).unwrap();
        assert_eq!(
            verifier.summary().kinds(),
            vec![ConstraintKind::DataType, ConstraintKind::Nullable]
        );
        assert_eq!(
            verifier.summary().get("a", ConstraintKind::DataType),
            Some(CheckOutcome::TypeMismatch(false))
        );
        assert!(verifier.passed());
    }
}
