use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{columns, AttributeValue, CountyId, CountyRecord};
use crate::error::DataLoadError;

/// One raw row: column name → cell, before the required fields are pulled out.
type RawRow = BTreeMap<String, AttributeValue>;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the county table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.parquet` – one row per county (recommended)
/// * `.json`    – `[{ "fips": "01001", "county": "...", ... }, ...]`
/// * `.csv`     – header row with column names
///
/// Rows come back in file order.
pub fn load_records(path: &Path) -> Result<Vec<CountyRecord>, DataLoadError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let rows = match ext.as_str() {
        "parquet" | "pq" => read_parquet(path)?,
        "json" => read_json(path)?,
        "csv" => read_csv(path)?,
        other => return Err(DataLoadError::UnsupportedFormat(other.to_string())),
    };

    build_records(path, rows)
}

/// Turn raw rows into records, rejecting an empty table and duplicate ids.
fn build_records(path: &Path, rows: Vec<RawRow>) -> Result<Vec<CountyRecord>, DataLoadError> {
    if rows.is_empty() {
        return Err(DataLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let mut seen: BTreeSet<CountyId> = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());
    for (row_no, row) in (1..).zip(rows) {
        let record = record_from_row(path, row_no, row)?;
        if !seen.insert(record.id.clone()) {
            return Err(DataLoadError::DuplicateId {
                path: path.to_path_buf(),
                id: record.id.0,
            });
        }
        records.push(record);
    }
    Ok(records)
}

fn record_from_row(path: &Path, row_no: usize, mut row: RawRow) -> Result<CountyRecord, DataLoadError> {
    let mut take = |column: &str| {
        row.remove(column).ok_or_else(|| DataLoadError::MissingColumn {
            path: path.to_path_buf(),
            column: column.to_string(),
        })
    };

    let id = match take(columns::ID)? {
        AttributeValue::Null => return Err(DataLoadError::row(path, row_no, "empty county id")),
        AttributeValue::Integer(i) => CountyId(format!("{i:05}")),
        other => CountyId::normalise(&other.to_string()),
    };
    let display_name = match take(columns::NAME)? {
        AttributeValue::Null => return Err(DataLoadError::row(path, row_no, "empty county name")),
        other => other.to_string(),
    };

    let mut numbers = [0.0; columns::REQUIRED_NUMERIC.len()];
    for (slot, column) in numbers.iter_mut().zip(columns::REQUIRED_NUMERIC) {
        *slot = take(column)?
            .as_f64()
            .filter(|v| v.is_finite())
            .ok_or_else(|| {
                DataLoadError::row(path, row_no, format!("'{column}' is not a finite number"))
            })?;
    }
    let [house_price, min_annual_temp, max_annual_temp, min_monthly_avg_temp, max_monthly_avg_temp] =
        numbers;

    let avg_monthly_precip = row
        .remove(columns::AVG_PRECIP_MONTH)
        .and_then(|v| v.as_f64());
    let total_annual_precip = row
        .remove(columns::TOTAL_PRECIP_YEAR)
        .and_then(|v| v.as_f64());

    Ok(CountyRecord {
        id,
        display_name,
        house_price,
        min_annual_temp,
        max_annual_temp,
        min_monthly_avg_temp,
        max_monthly_avg_temp,
        avg_monthly_precip,
        total_annual_precip,
        extras: row,
    })
}

// ---------------------------------------------------------------------------
// JSON reader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "fips": "01001",
///     "county": "Autauga County, AL",
///     "house_price": 189000,
///     "min_tmp_year": 22.1,
///     ...
///   },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<Vec<RawRow>, DataLoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| DataLoadError::io(path, e))?;
    let root: JsonValue =
        serde_json::from_str(&text).map_err(|e| DataLoadError::table(path, e.to_string()))?;

    let records = root
        .as_array()
        .ok_or_else(|| DataLoadError::table(path, "expected top-level JSON array"))?;

    records
        .iter()
        .zip(1..)
        .map(|(rec, i)| {
            let obj = rec
                .as_object()
                .ok_or_else(|| DataLoadError::row(path, i, "not a JSON object"))?;
            Ok(obj
                .iter()
                .map(|(key, val)| (key.clone(), json_to_attribute(val)))
                .collect())
        })
        .collect()
}

fn json_to_attribute(val: &JsonValue) -> AttributeValue {
    match val {
        JsonValue::String(s) => AttributeValue::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                AttributeValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                AttributeValue::Float(f)
            } else {
                AttributeValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => AttributeValue::Bool(*b),
        JsonValue::Null => AttributeValue::Null,
        other => AttributeValue::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV reader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one county per line.
/// Cell types are guessed; the `fips` column is always kept as text so
/// zero-padded codes survive.
fn read_csv(path: &Path) -> Result<Vec<RawRow>, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|e| DataLoadError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| DataLoadError::table(path, format!("reading CSV headers: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in (1..).zip(reader.records()) {
        let record = result.map_err(|e| DataLoadError::row(path, row_no, e.to_string()))?;

        let row: RawRow = headers
            .iter()
            .zip(record.iter())
            .map(|(col, value)| {
                let value = if col == columns::ID && !value.trim().is_empty() {
                    AttributeValue::String(value.trim().to_string())
                } else {
                    guess_attribute_type(value)
                };
                (col.clone(), value)
            })
            .collect();
        rows.push(row);
    }

    Ok(rows)
}

fn guess_attribute_type(s: &str) -> AttributeValue {
    let s = s.trim();
    if s.is_empty() {
        return AttributeValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return AttributeValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return AttributeValue::Float(f);
    }
    if s == "true" || s == "false" {
        return AttributeValue::Bool(s == "true");
    }
    AttributeValue::String(s.to_string())
}

// ---------------------------------------------------------------------------
// Parquet reader
// ---------------------------------------------------------------------------

/// Load a Parquet file holding the county table.
///
/// Every column becomes a cell of the raw row; strings, ints, floats and
/// bools are understood. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<Vec<RawRow>, DataLoadError> {
    let file = std::fs::File::open(path).map_err(|e| DataLoadError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| DataLoadError::table(path, format!("reading parquet metadata: {e}")))?;
    let reader = builder
        .build()
        .map_err(|e| DataLoadError::table(path, format!("building parquet reader: {e}")))?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| DataLoadError::table(path, format!("reading parquet record batch: {e}")))?;
        let schema = batch.schema();

        let cols: Vec<(usize, String)> = schema
            .fields()
            .iter()
            .enumerate()
            .map(|(i, f)| (i, f.name().clone()))
            .collect();

        for row in 0..batch.num_rows() {
            let raw: RawRow = cols
                .iter()
                .map(|(col_idx, col_name)| {
                    (col_name.clone(), extract_attribute(batch.column(*col_idx), row))
                })
                .collect();
            rows.push(raw);
        }
    }

    Ok(rows)
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_attribute(col: &Arc<dyn Array>, row: usize) -> AttributeValue {
    if col.is_null(row) {
        return AttributeValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => AttributeValue::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => {
            AttributeValue::String(col.as_string::<i64>().value(row).to_string())
        }
        DataType::Int32 => AttributeValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => AttributeValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => {
            AttributeValue::Float(col.as_primitive::<Float32Type>().value(row) as f64)
        }
        DataType::Float64 => AttributeValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => AttributeValue::Bool(col.as_boolean().value(row)),
        other => AttributeValue::String(format!("{other:?}")),
    }
}
