//! Reading and writing headered CSV datasets.
//!
//! Column types are inferred from the non-blank cells of each column unless
//! the caller names the column as categorical or as a date column. Blank
//! cells are missing values.

use crate::Result;
use datacheck_core::{Column, CoreError, DataFrame, DataType, Value, parse_datetime};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// How a dataset file is read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetOptions {
    categorical: Vec<String>,
    dates: Vec<String>,
    delimiter: u8,
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            categorical: Vec::new(),
            dates: Vec::new(),
            delimiter: b',',
        }
    }
}

impl DatasetOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Columns read as `category` instead of inferring their type.
    pub fn with_categorical<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categorical.extend(columns.into_iter().map(Into::into));
        self
    }

    /// Columns parsed as `datetime64[ns]`.
    pub fn with_dates<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dates.extend(columns.into_iter().map(Into::into));
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn categorical(&self) -> &[String] {
        &self.categorical
    }

    pub fn dates(&self) -> &[String] {
        &self.dates
    }

    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }
}

/// Reads a headered CSV file into a frame.
///
/// # Errors
///
/// Fails on I/O and CSV errors, when an option names a column the file does
/// not have (`CoreError::MissingColumn`) and when a date column holds a cell
/// that is not a date (`CoreError::DateParse`).
pub fn read_dataset(path: &Path, options: &DatasetOptions) -> Result<DataFrame> {
    let file = File::open(path)?;
    let frame = parse_dataset(file, options)?;
    info!(
        path = %path.display(),
        rows = frame.height(),
        columns = frame.width(),
        "Dataset loaded"
    );
    Ok(frame)
}

/// Reads a headered CSV document held in memory.
///
/// # Example
///
/// ```rust
/// use datacheck_core::DataType;
/// use datacheck_store::{read_dataset_str, DatasetOptions};
///
/// let options = DatasetOptions::new().with_categorical(["team"]);
/// let frame = read_dataset_str("id,team\n1,red\n2,\n", &options).unwrap();
///
/// assert_eq!(frame.column("id").unwrap().dtype(), DataType::Int64);
/// assert_eq!(frame.column("team").unwrap().dtype(), DataType::Category);
/// assert!(frame.column("team").unwrap().has_nulls());
/// ```
pub fn read_dataset_str(content: &str, options: &DatasetOptions) -> Result<DataFrame> {
    parse_dataset(content.as_bytes(), options)
}

fn parse_dataset<R: Read>(input: R, options: &DatasetOptions) -> Result<DataFrame> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .from_reader(input);

    let headers: Vec<String> = reader.headers()?.iter().map(str::to_string).collect();
    if let Some(unknown) = options
        .categorical
        .iter()
        .chain(&options.dates)
        .find(|name| !headers.contains(name))
    {
        return Err(CoreError::missing_column(unknown.as_str()).into());
    }

    let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
    for row in reader.records() {
        let row = row?;
        for (column, cell) in cells.iter_mut().zip(row.iter()) {
            column.push(cell.to_string());
        }
    }

    let columns = headers
        .into_iter()
        .zip(cells)
        .map(|(name, raw)| build_column(name, &raw, options))
        .collect::<Result<Vec<_>>>()?;
    Ok(DataFrame::new(columns)?)
}

fn build_column(name: String, raw: &[String], options: &DatasetOptions) -> Result<Column> {
    let dtype = if options.dates.contains(&name) {
        DataType::DateTime
    } else if options.categorical.contains(&name) {
        DataType::Category
    } else {
        let mut candidate = TypeCandidate::default();
        raw.iter().for_each(|cell| candidate.update(cell));
        candidate.decide()
    };

    let values = raw
        .iter()
        .map(|cell| parse_cell(&name, dtype, cell))
        .collect::<Result<Vec<_>>>()?;
    debug!(column = %name, dtype = %dtype, "Column read");
    Ok(Column::new(name, dtype, values))
}

fn parse_cell(column: &str, dtype: DataType, cell: &str) -> Result<Value> {
    if cell.is_empty() {
        return Ok(Value::Null);
    }
    let value = match dtype {
        DataType::DateTime => parse_datetime(cell)
            .map(Value::DateTime)
            .ok_or_else(|| CoreError::date_parse(column, cell))?,
        DataType::Bool => parse_bool(cell).map_or_else(|| Value::from(cell), Value::Bool),
        DataType::Int64 => cell.parse().map_or_else(|_| Value::from(cell), Value::Int),
        DataType::Float64 => cell.parse().map_or_else(|_| Value::from(cell), Value::Float),
        DataType::Category | DataType::Object => Value::from(cell),
    };
    Ok(value)
}

fn parse_bool(cell: &str) -> Option<bool> {
    match cell {
        "True" | "true" | "TRUE" => Some(true),
        "False" | "false" | "FALSE" => Some(false),
        _ => None,
    }
}

/// Tallies which types every non-blank cell of a column fits.
#[derive(Debug, Default)]
struct TypeCandidate {
    non_empty: usize,
    boolean_matches: usize,
    integer_matches: usize,
    float_matches: usize,
}

impl TypeCandidate {
    fn update(&mut self, cell: &str) {
        if cell.is_empty() {
            return;
        }
        self.non_empty += 1;
        if parse_bool(cell).is_some() {
            self.boolean_matches += 1;
        }
        if cell.parse::<i64>().is_ok() {
            self.integer_matches += 1;
        }
        if cell.parse::<f64>().is_ok() {
            self.float_matches += 1;
        }
    }

    /// A column without any value reads as `float64`, like an all-NaN column.
    fn decide(&self) -> DataType {
        match self.non_empty {
            0 => DataType::Float64,
            n if self.boolean_matches == n => DataType::Bool,
            n if self.integer_matches == n => DataType::Int64,
            n if self.float_matches == n => DataType::Float64,
            _ => DataType::Object,
        }
    }
}

/// Writes a frame as a headered CSV file. Missing values become blank cells.
pub fn write_dataset(frame: &DataFrame, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(frame.column_names())?;
    for row in frame.rows() {
        writer.write_record(row.into_iter().map(|value| {
            if value.is_null() {
                String::new()
            } else {
                value.render()
            }
        }))?;
    }
    writer.flush()?;
    info!(path = %path.display(), rows = frame.height(), "Dataset written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    const PEOPLE: &str = "\
id,name,score,active,team,joined
1,ann,1.5,True,red,2020-01-31
2,,2,false,blue,
3,cy,,TRUE,,2021-06-01 08:30:00
";

    fn dtypes(frame: &DataFrame) -> Vec<DataType> {
        frame.columns().iter().map(Column::dtype).collect()
    }

    #[test]
    fn test_infers_types() {
        let frame = read_dataset_str(PEOPLE, &DatasetOptions::new()).unwrap();
        assert_eq!(
            dtypes(&frame),
            vec![
                DataType::Int64,
                DataType::Object,
                DataType::Float64,
                DataType::Bool,
                DataType::Object,
                DataType::Object,
            ]
        );
        let score = frame.column("score").unwrap();
        assert_eq!(
            score.values(),
            &[Value::Float(1.5), Value::Float(2.0), Value::Null]
        );
        let active = frame.column("active").unwrap();
        assert_eq!(
            active.values(),
            &[Value::Bool(true), Value::Bool(false), Value::Bool(true)]
        );
    }

    #[test]
    fn test_options_force_category_and_dates() {
        let options = DatasetOptions::new()
            .with_categorical(["team"])
            .with_dates(["joined"]);
        let frame = read_dataset_str(PEOPLE, &options).unwrap();

        assert_eq!(frame.column("team").unwrap().dtype(), DataType::Category);
        let joined = frame.column("joined").unwrap();
        assert_eq!(joined.dtype(), DataType::DateTime);
        let first = NaiveDate::from_ymd_opt(2020, 1, 31)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(joined.values()[0], Value::DateTime(first));
        assert_eq!(joined.values()[1], Value::Null);
    }

    #[test]
    fn test_unknown_option_column() {
        let options = DatasetOptions::new().with_categorical(["missing"]);
        let err = read_dataset_str(PEOPLE, &options).unwrap_err();
        assert!(matches!(
            err,
            crate::StoreError::Core(CoreError::MissingColumn(name)) if name == "missing"
        ));
    }

    #[test]
    fn test_bad_date_cell() {
        let options = DatasetOptions::new().with_dates(["name"]);
        let err = read_dataset_str(PEOPLE, &options).unwrap_err();
        assert!(matches!(
            err,
            crate::StoreError::Core(CoreError::DateParse { value, .. }) if value == "ann"
        ));
    }

    #[test]
    fn test_delimiter() {
        let options = DatasetOptions::new().with_delimiter(b';');
        let frame = read_dataset_str("a;b\n1;x\n", &options).unwrap();
        assert_eq!(frame.width(), 2);
        assert_eq!(frame.column("b").unwrap().values(), &[Value::from("x")]);
    }

    #[test]
    fn test_all_blank_column_is_float() {
        let frame = read_dataset_str("a,b\n1,\n2,\n", &DatasetOptions::new()).unwrap();
        assert_eq!(frame.column("b").unwrap().dtype(), DataType::Float64);
        assert!(frame.column("b").unwrap().values().iter().all(Value::is_null));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let frame = read_dataset_str(PEOPLE, &DatasetOptions::new()).unwrap();

        write_dataset(&frame, &path).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("id,name,score,active,team,joined\n1,ann,1.5,True,red,"));
        assert!(written.contains("\n3,cy,,True,,"));

        let reread = read_dataset(&path, &DatasetOptions::new()).unwrap();
        assert_eq!(dtypes(&reread), dtypes(&frame));
        assert_eq!(reread.height(), 3);
    }
}
