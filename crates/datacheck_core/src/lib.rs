//! # datacheck core
//!
//! Core data structures shared by the datacheck crates.
//!
//! - **Frame**: a small in-memory columnar dataset ([`DataFrame`], [`Column`],
//!   [`Value`], [`DataType`])
//! - **Classifier**: sorts columns into numeric, categorical, datetime and
//!   other by declared type ([`classify`])
//! - **Constraints**: per-column rule records ([`ConstraintRecord`]) gathered
//!   into an ordered [`ConstraintSet`], the unit that is persisted and verified
//!
//! ## Example
//!
//! ```rust
//! use datacheck_core::{
//!     Column, ConstraintKind, ConstraintRecord, ConstraintSet, DataFrame, DataType,
//! };
//!
//! let frame = DataFrame::new(vec![
//!     Column::new("id", DataType::Int64, vec![1i64, 2, 3]),
//! ])
//! .unwrap();
//! assert_eq!(frame.height(), 3);
//!
//! let mut constraints = ConstraintSet::new();
//! constraints.insert(
//!     "id",
//!     ConstraintRecord::new()
//!         .with(ConstraintKind::DataType, "int64")
//!         .with(ConstraintKind::Nullable, false),
//! );
//! assert!(constraints.contains("id"));
//! ```

pub mod classify;
pub mod constraint;
pub mod error;
pub mod frame;

pub use classify::*;
pub use constraint::*;
pub use error::*;
pub use frame::*;
