//! # datacheck validator
//!
//! Profiling and verification engine. This crate provides:
//!
//! - [`Profiler`]: derives a constraint set from a dataset, one record per
//!   column, and lets callers adjust single records
//! - [`Verifier`]: replays a constraint set against a dataset and reports
//!   break counts per column plus the offending rows
//!
//! ## Example
//!
//! ```rust
//! use datacheck_core::{Column, ConstraintKind, ConstraintRecord, DataFrame, DataType};
//! use datacheck_validator::{CheckOutcome, Profiler, Verifier};
//!
//! let reference = DataFrame::new(vec![
//!     Column::new("id", DataType::Int64, vec![1i64, 2, 3]),
//! ])
//! .unwrap();
//!
//! let mut profiler = Profiler::new();
//! profiler.generate(&reference).unwrap();
//! profiler
//!     .modify("id", ConstraintRecord::new().with(ConstraintKind::Unique, true))
//!     .unwrap();
//!
//! let incoming = DataFrame::new(vec![
//!     Column::new("id", DataType::Int64, vec![1i64, 1, 7]),
//! ])
//! .unwrap();
//! let verifier = Verifier::new(&incoming, profiler.constraints()).unwrap();
//!
//! assert_eq!(
//!     verifier.summary().get("id", ConstraintKind::MaxValue),
//!     Some(CheckOutcome::Breaks(1))
//! );
//! assert!(!verifier.passed());
//! ```

mod checks;
mod profiler;
mod verifier;

pub use checks::CheckOutcome;
pub use profiler::*;
pub use verifier::*;
