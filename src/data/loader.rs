use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use calamine::{Data, Reader, open_workbook_auto};
use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Date32Type, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
    UInt16Type, UInt32Type, UInt8Type,
};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::dates;
use super::model::{CellValue, Column, Dataset};

/// Ordinal day of 1970-01-01, the epoch of Arrow `Date32` columns.
const UNIX_EPOCH_ORDINAL: i64 = 719_163;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with column names, one observation per row
/// * `.parquet` – flat scalar columns (written by Pandas or Polars)
/// * `.json`    – `[{ "dates": 733042, "red": 512, ... }, ...]`
/// * `.xlsx`    – first worksheet, header in the first row (also `.xls`)
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "parquet" | "pq" => load_parquet(path),
        "json" => load_json(path),
        "xlsx" | "xlsm" | "xls" => load_excel(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, every following row one
/// observation. Cell types are guessed per cell.
fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut columns: Vec<Column> = headers
        .iter()
        .map(|name| Column {
            name: name.clone(),
            values: Vec::new(),
        })
        .collect();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if record.len() != headers.len() {
            bail!(
                "CSV row {row_no}: expected {} fields but found {}",
                headers.len(),
                record.len()
            );
        }
        for (col, value) in columns.iter_mut().zip(record.iter()) {
            col.values.push(guess_cell_type(value));
        }
    }

    Ok(Dataset::from_columns(path.to_path_buf(), columns))
}

fn guess_cell_type(raw: &str) -> CellValue {
    let s = raw.trim();
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    match s {
        "true" | "True" | "TRUE" => CellValue::Bool(true),
        "false" | "False" | "FALSE" => CellValue::Bool(false),
        _ => CellValue::Text(s.to_string()),
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default
/// `df.to_json(orient='records')`). Columns keep the order in which their
/// keys first appear.
///
/// ```json
/// [
///   { "dates": "01/01/2008", "red": 512, "nir": 2301, "qa": 0 },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut columns: Vec<Column> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;

        for (key, val) in obj {
            let col = *index.entry(key.clone()).or_insert_with(|| {
                columns.push(Column {
                    name: key.clone(),
                    values: Vec::new(),
                });
                columns.len() - 1
            });
            let values = &mut columns[col].values;
            // A key first seen in a later record is null in earlier rows.
            values.resize(i, CellValue::Null);
            values.push(json_to_cell(val));
        }
    }

    Ok(Dataset::from_columns(path.to_path_buf(), columns))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Excel loader
// ---------------------------------------------------------------------------

/// First worksheet; the first row names the columns.
fn load_excel(path: &Path) -> Result<Dataset> {
    let mut workbook = open_workbook_auto(path).context("opening Excel workbook")?;
    let range = workbook
        .worksheet_range_at(0)
        .context("Workbook has no worksheets")?
        .context("reading first worksheet")?;

    let mut rows = range.rows();
    let header = rows.next().context("Worksheet is empty")?;
    Ok(Dataset::from_columns(
        path.to_path_buf(),
        sheet_columns(header, rows),
    ))
}

/// Build columns from a header row and data rows. Unnamed header cells get
/// pandas-style `Unnamed: N` names.
fn sheet_columns<'a>(header: &[Data], rows: impl Iterator<Item = &'a [Data]>) -> Vec<Column> {
    let mut columns: Vec<Column> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = cell.to_string().trim().to_string();
            Column {
                name: if name.is_empty() {
                    format!("Unnamed: {i}")
                } else {
                    name
                },
                values: Vec::new(),
            }
        })
        .collect();

    for row in rows {
        for (i, column) in columns.iter_mut().enumerate() {
            column
                .values
                .push(row.get(i).map_or(CellValue::Null, excel_to_cell));
        }
    }
    columns
}

/// Excel stores every number as a float; whole numbers come back as
/// integers, as pandas does for whole-number columns.
fn excel_to_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => CellValue::Integer(*f as i64),
        Data::Float(f) => CellValue::Float(*f),
        Data::String(s) if s.trim().is_empty() => CellValue::Null,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(d) => CellValue::Integer(dates::ordinal(d.date())),
            None => CellValue::Float(dt.as_f64()),
        },
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
        Data::Empty => CellValue::Null,
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per variable.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`). `Date32` columns are converted to
/// ordinal days so they can serve directly as the date column.
fn load_parquet(path: &Path) -> Result<Dataset> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let columns_schema = builder.schema().clone();
    let reader = builder.build().context("building parquet reader")?;

    let mut columns: Vec<Column> = columns_schema
        .fields()
        .iter()
        .map(|f| Column {
            name: f.name().clone(),
            values: Vec::new(),
        })
        .collect();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for (col_idx, column) in columns.iter_mut().enumerate() {
            let array = batch.column(col_idx);
            column
                .values
                .extend((0..batch.num_rows()).map(|row| extract_cell(array, row)));
        }
    }

    Ok(Dataset::from_columns(path.to_path_buf(), columns))
}

// -- Parquet / Arrow helpers --

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    match col.data_type() {
        DataType::Utf8 => CellValue::Text(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => CellValue::Text(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => CellValue::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => CellValue::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => CellValue::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::Float32 => {
            CellValue::Float(col.as_primitive::<Float32Type>().value(row).into())
        }
        DataType::Float64 => CellValue::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        DataType::Date32 => {
            let days = i64::from(col.as_primitive::<Date32Type>().value(row));
            CellValue::Integer(UNIX_EPOCH_ORDINAL + days)
        }
        other => CellValue::Text(format!("{other:?}")),
    }
}
