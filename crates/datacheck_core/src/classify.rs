//! Column classification by declared type.

use crate::{DataFrame, DataType};

/// Category of a column, deciding which constraint kinds apply to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnCategory {
    /// `int64` and `float64` columns
    Numeric,
    /// `category` columns
    Categorical,
    /// `datetime64[ns]` columns
    DateTime,
    /// Everything else; only the universal constraints apply
    Other,
}

impl ColumnCategory {
    /// Classifies a declared type.
    pub fn of(dtype: DataType) -> Self {
        match dtype {
            DataType::Int64 | DataType::Float64 => ColumnCategory::Numeric,
            DataType::Category => ColumnCategory::Categorical,
            DataType::DateTime => ColumnCategory::DateTime,
            DataType::Bool | DataType::Object => ColumnCategory::Other,
        }
    }
}

/// Column names of a frame partitioned by category, each list in frame order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnClasses {
    pub numeric: Vec<String>,
    pub categorical: Vec<String>,
    pub datetime: Vec<String>,
}

/// Partitions the columns of `frame` using only their declared types.
pub fn classify(frame: &DataFrame) -> ColumnClasses {
    let mut classes = ColumnClasses::default();
    for column in frame.columns() {
        let name = column.name().to_string();
        match ColumnCategory::of(column.dtype()) {
            ColumnCategory::Numeric => classes.numeric.push(name),
            ColumnCategory::Categorical => classes.categorical.push(name),
            ColumnCategory::DateTime => classes.datetime.push(name),
            ColumnCategory::Other => {}
        }
    }
    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Column;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_by_dtype() {
        let frame = DataFrame::new(vec![
            Column::new("id", DataType::Int64, vec![1, 2]),
            Column::new("flag", DataType::Bool, vec![true, false]),
            Column::new("color", DataType::Category, vec!["red", "blue"]),
            Column::new("score", DataType::Float64, vec![0.5, 1.5]),
            Column::new("note", DataType::Object, vec!["x", "y"]),
            Column::new("seen", DataType::DateTime, vec![None::<&str>, None]),
        ])
        .unwrap();

        let classes = classify(&frame);
        assert_eq!(classes.numeric, vec!["id", "score"]);
        assert_eq!(classes.categorical, vec!["color"]);
        assert_eq!(classes.datetime, vec!["seen"]);
    }

    #[test]
    fn test_bool_is_not_numeric() {
        assert_eq!(ColumnCategory::of(DataType::Bool), ColumnCategory::Other);
    }
}
