//! Per-constraint checks.
//!
//! Every constraint kind maps to one check taking the expected value and the
//! column under test. Row-capturing kinds also return the mask of offending
//! rows; count-only kinds (value and date bounds) return just the count.

use datacheck_core::{
    Column, ConstraintKind, ConstraintValue, CoreError, Result, Value, parse_datetime,
};
use std::collections::HashSet;
use std::fmt;

/// What a single check reports for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    /// Number of rows violating the constraint
    Breaks(usize),
    /// Whether the declared type differs from the expected one
    TypeMismatch(bool),
}

impl CheckOutcome {
    /// Returns true when the check found nothing wrong.
    pub fn passed(self) -> bool {
        matches!(self, CheckOutcome::Breaks(0) | CheckOutcome::TypeMismatch(false))
    }

    /// Break count, if this is a counting outcome.
    pub fn breaks(self) -> Option<usize> {
        match self {
            CheckOutcome::Breaks(n) => Some(n),
            CheckOutcome::TypeMismatch(_) => None,
        }
    }
}

impl fmt::Display for CheckOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CheckOutcome::Breaks(n) => write!(f, "{n}"),
            CheckOutcome::TypeMismatch(true) => f.write_str("True"),
            CheckOutcome::TypeMismatch(false) => f.write_str("False"),
        }
    }
}

/// Result of one check: the summary outcome plus, for row-capturing kinds,
/// the rows to report.
#[derive(Debug)]
pub(crate) struct Evaluation {
    pub outcome: CheckOutcome,
    pub offending: Option<Vec<bool>>,
}

impl Evaluation {
    fn captured(mask: Vec<bool>) -> Self {
        Self {
            outcome: CheckOutcome::Breaks(count(&mask)),
            offending: Some(mask),
        }
    }

    fn counted(mask: &[bool]) -> Self {
        Self {
            outcome: CheckOutcome::Breaks(count(mask)),
            offending: None,
        }
    }

    fn clean() -> Self {
        Self {
            outcome: CheckOutcome::Breaks(0),
            offending: None,
        }
    }
}

fn count(mask: &[bool]) -> usize {
    mask.iter().filter(|flag| **flag).count()
}

/// Dispatches `kind` to its check.
pub(crate) fn evaluate(
    kind: ConstraintKind,
    expected: &ConstraintValue,
    column: &Column,
) -> Result<Evaluation> {
    let input = CheckInput {
        kind,
        expected,
        column,
    };
    match kind {
        ConstraintKind::DataType => check_data_type(&input),
        ConstraintKind::Nullable => check_nullable(&input),
        ConstraintKind::Unique => check_unique(&input),
        ConstraintKind::MaxLength => check_length(&input, |len, bound| len > bound),
        ConstraintKind::MinLength => check_length(&input, |len, bound| len < bound),
        ConstraintKind::ValueRange => check_value_range(&input),
        ConstraintKind::MaxValue => check_value_bound(&input, |x, bound| x > bound),
        ConstraintKind::MinValue => check_value_bound(&input, |x, bound| x < bound),
        ConstraintKind::MaxDate => check_date_bound(&input, |d, bound| d > bound),
        ConstraintKind::MinDate => check_date_bound(&input, |d, bound| d < bound),
    }
}

struct CheckInput<'a> {
    kind: ConstraintKind,
    expected: &'a ConstraintValue,
    column: &'a Column,
}

impl CheckInput<'_> {
    fn invalid(&self, expected: &'static str) -> CoreError {
        CoreError::invalid_value(
            self.column.name(),
            self.kind.as_str(),
            expected,
            self.expected.to_string(),
        )
    }

    fn expect_bool(&self) -> Result<bool> {
        self.expected.as_bool().ok_or_else(|| self.invalid("a boolean"))
    }
}

fn check_data_type(input: &CheckInput<'_>) -> Result<Evaluation> {
    let expected = input
        .expected
        .as_text()
        .ok_or_else(|| input.invalid("a type name"))?;
    Ok(Evaluation {
        outcome: CheckOutcome::TypeMismatch(input.column.dtype().name() != expected),
        offending: None,
    })
}

fn check_nullable(input: &CheckInput<'_>) -> Result<Evaluation> {
    if input.expect_bool()? {
        return Ok(Evaluation::clean());
    }
    Ok(Evaluation::captured(input.column.null_mask()))
}

/// Every row holding a repeated value breaks, not only the later copies.
fn check_unique(input: &CheckInput<'_>) -> Result<Evaluation> {
    if !input.expect_bool()? {
        return Ok(Evaluation::clean());
    }
    Ok(Evaluation::captured(input.column.repeated_mask()))
}

/// Missing values have no length and never break a length bound.
fn check_length(input: &CheckInput<'_>, breaks: fn(usize, usize) -> bool) -> Result<Evaluation> {
    let bound = if input.expected.is_missing() {
        None
    } else {
        Some(
            input
                .expected
                .as_count()
                .ok_or_else(|| input.invalid("a non-negative integer"))?,
        )
    };

    let mask = input
        .column
        .values()
        .iter()
        .map(|value| match bound {
            Some(bound) if !value.is_null() => breaks(value.render().chars().count(), bound),
            _ => false,
        })
        .collect();
    Ok(Evaluation::captured(mask))
}

fn check_value_range(input: &CheckInput<'_>) -> Result<Evaluation> {
    let allowed: HashSet<_> = input
        .expected
        .as_values()
        .ok_or_else(|| input.invalid("a set of values"))?
        .iter()
        .map(Value::key)
        .collect();

    let mask = input
        .column
        .values()
        .iter()
        .map(|value| !allowed.contains(&value.key()))
        .collect();
    Ok(Evaluation::captured(mask))
}

/// Missing cells and a NaN bound never compare as a break.
fn check_value_bound(input: &CheckInput<'_>, breaks: fn(f64, f64) -> bool) -> Result<Evaluation> {
    let bound = input
        .expected
        .as_f64()
        .ok_or_else(|| input.invalid("a number"))?;

    let mask = input
        .column
        .values()
        .iter()
        .map(|value| {
            if value.is_null() {
                return Ok(false);
            }
            let x = value
                .as_f64()
                .ok_or_else(|| CoreError::not_numeric(input.column.name(), value.render()))?;
            Ok(breaks(x, bound))
        })
        .collect::<Result<Vec<_>>>()?;
    Ok(Evaluation::counted(&mask))
}

/// The column is coerced to dates before comparing, so an unparseable cell
/// fails the whole check.
fn check_date_bound(
    input: &CheckInput<'_>,
    breaks: fn(chrono::NaiveDateTime, chrono::NaiveDateTime) -> bool,
) -> Result<Evaluation> {
    let dates = input.column.to_datetimes()?;
    let bound = match input.expected {
        ConstraintValue::Missing => None,
        ConstraintValue::Text(text) => Some(
            parse_datetime(text)
                .ok_or_else(|| CoreError::date_parse(input.column.name(), text.as_str()))?,
        ),
        _ => return Err(input.invalid("a date string")),
    };

    let mask: Vec<bool> = dates
        .into_iter()
        .map(|date| match (date, bound) {
            (Some(date), Some(bound)) => breaks(date, bound),
            _ => false,
        })
        .collect();
    Ok(Evaluation::counted(&mask))
}
