//! Persistence for datacheck constraint sets and datasets.
//!
//! Constraint sets are stored as JSON or as a transposed CSV table; the file
//! extension selects the format. Datasets are headered CSV files.
//!
//! # Example
//!
//! ```rust
//! use datacheck_core::{ConstraintKind, ConstraintRecord, ConstraintSet, ConstraintValue};
//! use datacheck_store::{load, save};
//!
//! let mut constraints = ConstraintSet::new();
//! constraints.insert(
//!     "color",
//!     ConstraintRecord::new()
//!         .with(ConstraintKind::DataType, "category")
//!         .with(ConstraintKind::ValueRange, ConstraintValue::values(["red", "blue"])),
//! );
//!
//! let dir = std::env::temp_dir().join("datacheck_store_doc");
//! std::fs::create_dir_all(&dir).unwrap();
//! let path = dir.join("constraints.csv");
//!
//! save(&constraints, &path).unwrap();
//! assert_eq!(load(&path).unwrap(), constraints);
//! ```

mod csv_format;
mod dataset;
mod error;
mod format;
mod json;
mod set_literal;
mod store;

pub use csv_format::{from_csv_str, to_csv_string};
pub use dataset::{DatasetOptions, read_dataset, read_dataset_str, write_dataset};
pub use error::{Result, StoreError};
pub use format::{ConstraintFormat, detect_format};
pub use json::{from_json_str, to_json_string};
pub use set_literal::{decode_set_literal, encode_set_literal};
pub use store::{load, save};
