use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;
use thiserror::Error;

use super::model::{LaunchDataset, LaunchRecord, Outcome};

/// Required column names, shared by every supported format.
pub const SITE_COLUMN: &str = "Launch Site";
pub const PAYLOAD_COLUMN: &str = "Payload Mass (kg)";
pub const CLASS_COLUMN: &str = "class";
pub const BOOSTER_COLUMN: &str = "Booster Version Category";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Parquet: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("Arrow: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("Unsupported file extension: .{0}")]
    UnsupportedExtension(String),
    #[error("missing required column '{0}'")]
    MissingColumn(&'static str),
    #[error("column '{column}' has unsupported type {data_type}")]
    ColumnType {
        column: &'static str,
        data_type: DataType,
    },
    #[error("row {row}, column '{column}': {reason}")]
    InvalidValue {
        row: usize,
        column: &'static str,
        reason: String,
    },
    #[error("expected a top-level JSON array of records")]
    NotRecords,
    #[error("dataset contains no launch records")]
    Empty,
}

impl LoadError {
    fn invalid(row: usize, column: &'static str, reason: impl Into<String>) -> Self {
        LoadError::InvalidValue {
            row,
            column,
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a launch dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the four required columns (extra columns ignored)
/// * `.json`    – `[{ "Launch Site": ..., "Payload Mass (kg)": ..., ... }, ...]`
/// * `.parquet` – columns with the same names
pub fn load_file(path: &Path) -> Result<LaunchDataset, LoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let open = || {
        File::open(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })
    };

    let dataset = match ext.as_str() {
        "csv" => load_csv_reader(open()?)?,
        "json" => load_json_reader(BufReader::new(open()?))?,
        "parquet" | "pq" => load_parquet(open()?)?,
        other => return Err(LoadError::UnsupportedExtension(other.to_string())),
    };

    log::info!(
        "Loaded {} launches from {} ({} sites, payload {:?} kg)",
        dataset.len(),
        path.display(),
        dataset.sites().len(),
        dataset.bounds()
    );
    Ok(dataset)
}

/// Turn validated rows into a dataset; zero rows is an error.
fn finish(records: Vec<LaunchRecord>) -> Result<LaunchDataset, LoadError> {
    LaunchDataset::from_records(records).ok_or(LoadError::Empty)
}

/// Shared per-row validation for every format.
fn build_record(
    row: usize,
    site: String,
    payload_mass_kg: f64,
    class: f64,
    booster_category: String,
) -> Result<LaunchRecord, LoadError> {
    let site = site.trim().to_string();
    if site.is_empty() {
        return Err(LoadError::invalid(row, SITE_COLUMN, "empty launch site"));
    }
    if !payload_mass_kg.is_finite() || payload_mass_kg < 0.0 {
        return Err(LoadError::invalid(
            row,
            PAYLOAD_COLUMN,
            format!("payload {payload_mass_kg} is not a non-negative number"),
        ));
    }
    let outcome = Some(class)
        .filter(|c| c.fract() == 0.0)
        .and_then(|c| Outcome::from_class(c as i64))
        .ok_or_else(|| LoadError::invalid(row, CLASS_COLUMN, format!("class {class} is not 0 or 1")))?;

    Ok(LaunchRecord {
        site,
        payload_mass_kg,
        outcome,
        booster_category: booster_category.trim().to_string(),
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Parse CSV launch records from any reader.  Headers are matched by name
/// after trimming, so column order does not matter.
pub fn load_csv_reader<R: Read>(reader: R) -> Result<LaunchDataset, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let headers = reader.headers()?.clone();

    let column = |name: &'static str| {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or(LoadError::MissingColumn(name))
    };
    let site_idx = column(SITE_COLUMN)?;
    let payload_idx = column(PAYLOAD_COLUMN)?;
    let class_idx = column(CLASS_COLUMN)?;
    let booster_idx = column(BOOSTER_COLUMN)?;

    let mut records = Vec::new();

    for (row, result) in reader.records().enumerate() {
        let rec = result?;
        let field = |idx: usize| rec.get(idx).unwrap_or("");

        let payload = parse_number(field(payload_idx), row, PAYLOAD_COLUMN)?;
        let class = parse_number(field(class_idx), row, CLASS_COLUMN)?;

        records.push(build_record(
            row,
            field(site_idx).to_string(),
            payload,
            class,
            field(booster_idx).to_string(),
        )?);
    }

    finish(records)
}

fn parse_number(s: &str, row: usize, column: &'static str) -> Result<f64, LoadError> {
    s.parse::<f64>()
        .map_err(|_| LoadError::invalid(row, column, format!("'{s}' is not a number")))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON, the default `df.to_json(orient='records')`:
///
/// ```json
/// [
///   { "Launch Site": "KSC LC-39A", "Payload Mass (kg)": 2490.0,
///     "class": 1, "Booster Version Category": "FT" },
///   ...
/// ]
/// ```
pub fn load_json_reader<R: Read>(reader: R) -> Result<LaunchDataset, LoadError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    let rows = root.as_array().ok_or(LoadError::NotRecords)?;

    let mut records = Vec::with_capacity(rows.len());

    for (row, value) in rows.iter().enumerate() {
        let obj = value.as_object().ok_or(LoadError::NotRecords)?;
        let get = |name: &'static str| obj.get(name).ok_or(LoadError::MissingColumn(name));

        let text = |name: &'static str| -> Result<String, LoadError> {
            match get(name)? {
                JsonValue::String(s) => Ok(s.clone()),
                other => Err(LoadError::invalid(row, name, format!("{other} is not a string"))),
            }
        };
        let number = |name: &'static str| -> Result<f64, LoadError> {
            let v = get(name)?;
            v.as_f64()
                .ok_or_else(|| LoadError::invalid(row, name, format!("{v} is not a number")))
        };

        records.push(build_record(
            row,
            text(SITE_COLUMN)?,
            number(PAYLOAD_COLUMN)?,
            number(CLASS_COLUMN)?,
            text(BOOSTER_COLUMN)?,
        )?);
    }

    finish(records)
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load launch records from Parquet.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`): numeric columns may be 32- or 64-bit,
/// `class` may also be boolean.
fn load_parquet(file: File) -> Result<LaunchDataset, LoadError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
    // checked up front so a zero-row file still reports missing columns
    for name in [SITE_COLUMN, PAYLOAD_COLUMN, CLASS_COLUMN, BOOSTER_COLUMN] {
        builder
            .schema()
            .index_of(name)
            .map_err(|_| LoadError::MissingColumn(name))?;
    }
    let reader = builder.build()?;

    let mut records = Vec::new();

    for batch in reader {
        let batch = batch?;
        let schema = batch.schema();
        let column = |name: &'static str| {
            schema
                .index_of(name)
                .map(|i| batch.column(i).clone())
                .map_err(|_| LoadError::MissingColumn(name))
        };

        let site_col = column(SITE_COLUMN)?;
        let payload_col = column(PAYLOAD_COLUMN)?;
        let class_col = column(CLASS_COLUMN)?;
        let booster_col = column(BOOSTER_COLUMN)?;

        let offset = records.len();
        for i in 0..batch.num_rows() {
            let row = offset + i;
            records.push(build_record(
                row,
                string_at(&site_col, i, row, SITE_COLUMN)?,
                number_at(&payload_col, i, row, PAYLOAD_COLUMN)?,
                number_at(&class_col, i, row, CLASS_COLUMN)?,
                string_at(&booster_col, i, row, BOOSTER_COLUMN)?,
            )?);
        }
    }

    finish(records)
}

// -- Arrow helpers --

/// Read a Utf8 / LargeUtf8 cell.
fn string_at(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<String, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::invalid(row, column, "null value"));
    }
    let value = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| a.value(i)),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| a.value(i)),
        _ => None,
    };
    value.map(str::to_string).ok_or_else(|| LoadError::ColumnType {
        column,
        data_type: col.data_type().clone(),
    })
}

/// Read a numeric (or boolean) cell widened to `f64`.
fn number_at(col: &ArrayRef, i: usize, row: usize, column: &'static str) -> Result<f64, LoadError> {
    if col.is_null(i) {
        return Err(LoadError::invalid(row, column, "null value"));
    }
    let value = match col.data_type() {
        DataType::Float64 => col.as_primitive_opt::<Float64Type>().map(|a| a.value(i)),
        DataType::Float32 => col.as_primitive_opt::<Float32Type>().map(|a| a.value(i) as f64),
        DataType::Int64 => col.as_primitive_opt::<Int64Type>().map(|a| a.value(i) as f64),
        DataType::Int32 => col.as_primitive_opt::<Int32Type>().map(|a| a.value(i) as f64),
        DataType::Boolean => col
            .as_boolean_opt()
            .map(|a| if a.value(i) { 1.0 } else { 0.0 }),
        _ => None,
    };
    value.ok_or_else(|| LoadError::ColumnType {
        column,
        data_type: col.data_type().clone(),
    })
}
