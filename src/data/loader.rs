use std::path::Path;

use anyhow::{bail, Context, Result};
use arrow::array::{Array, AsArray};
use arrow::compute::cast;
use arrow::datatypes::{DataType, Float64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map as JsonMap, Value as JsonValue};

use super::model::SourceDataSet;

/// Rows inspected when deciding whether a CSV column is numeric.
const SNIFF_ROWS: usize = 100;
/// Share of non-empty sniffed cells that must parse for a column to count
/// as numeric.
const NUMERIC_RATIO: f64 = 0.7;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the numeric columns of a table.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one column per field
/// * `.json`    – `[{ "col": 1.0, ... }, ...]` or `{ "col": [1.0, ...], ... }`
/// * `.parquet` – any numeric Arrow columns
///
/// Non-numeric columns are dropped silently.
pub fn load_file(path: &Path) -> Result<SourceDataSet> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
    .with_context(|| format!("loading {}", path.display()))?;

    log::info!(
        "loaded {} numeric columns, {} rows from {}",
        dataset.len(),
        dataset.row_count(),
        path.display()
    );
    Ok(dataset)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Header row first. Short rows are padded with empty cells, long rows are
/// truncated, blank lines are skipped. Numbers may carry `,` thousands
/// separators or embedded spaces.
fn load_csv(path: &Path) -> Result<SourceDataSet> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context("opening CSV")?;

    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        bail!("CSV has no header row");
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {}", row_no + 1))?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let mut row: Vec<String> = record.iter().take(headers.len()).map(str::to_string).collect();
        row.resize(headers.len(), String::new());
        rows.push(row);
    }

    let columns = headers
        .iter()
        .enumerate()
        .filter(|(col, _)| is_numeric_column(&rows, *col))
        .map(|(col, name)| {
            let values = rows
                .iter()
                .map(|row| parse_number(&row[col]).unwrap_or(0.0))
                .collect();
            (name.clone(), values)
        });
    Ok(SourceDataSet::from_columns(columns))
}

fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.chars().filter(|c| *c != ',' && *c != ' ').collect();
    cleaned.parse().ok()
}

fn is_numeric_column(rows: &[Vec<String>], col: usize) -> bool {
    let (mut numeric, mut total) = (0usize, 0usize);
    for cell in rows.iter().take(SNIFF_ROWS).map(|r| r[col].as_str()) {
        if cell.is_empty() {
            continue;
        }
        total += 1;
        if parse_number(cell).is_some() {
            numeric += 1;
        }
    }
    total > 0 && numeric as f64 / total as f64 >= NUMERIC_RATIO
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records (`df.to_json(orient='records')`) or columns
/// (`df.to_json(orient='list')`). A field is kept when every value is a
/// number or null; nulls and missing fields become `0.0`.
fn load_json(path: &Path) -> Result<SourceDataSet> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    match root {
        JsonValue::Array(records) => json_records(&records),
        JsonValue::Object(columns) => Ok(json_columns(&columns)),
        _ => bail!("Expected a top-level JSON array or object"),
    }
}

fn json_records(records: &[JsonValue]) -> Result<SourceDataSet> {
    let mut names: Vec<&str> = Vec::new();
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !names.contains(&key.as_str()) {
                names.push(key);
            }
        }
    }

    let columns = names.into_iter().filter_map(|name| {
        let cells = records.iter().map(|rec| rec.get(name));
        json_numbers(cells).map(|values| (name.to_string(), values))
    });
    Ok(SourceDataSet::from_columns(columns))
}

fn json_columns(columns: &JsonMap<String, JsonValue>) -> SourceDataSet {
    SourceDataSet::from_columns(columns.iter().filter_map(|(name, value)| {
        let cells = value.as_array()?;
        json_numbers(cells.iter().map(Some)).map(|values| (name.clone(), values))
    }))
}

/// `None` as soon as a value is neither a number nor null. Missing cells
/// count as null.
fn json_numbers<'a>(cells: impl Iterator<Item = Option<&'a JsonValue>>) -> Option<Vec<f64>> {
    cells
        .map(|v| match v {
            None | Some(JsonValue::Null) => Some(0.0),
            Some(other) => other.as_f64(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Every numeric column (ints, floats, decimals) is cast to `Float64`;
/// nulls become `0.0`. Works with files written by both **Pandas** and
/// **Polars**.
fn load_parquet(path: &Path) -> Result<SourceDataSet> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;

    let numeric: Vec<(usize, String)> = builder
        .schema()
        .fields()
        .iter()
        .enumerate()
        .filter(|(_, f)| f.data_type().is_numeric())
        .map(|(i, f)| (i, f.name().clone()))
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); numeric.len()];
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for ((col_idx, name), out) in numeric.iter().zip(values.iter_mut()) {
            let floats = cast(batch.column(*col_idx), &DataType::Float64)
                .with_context(|| format!("casting '{name}' to Float64"))?;
            let floats = floats.as_primitive::<Float64Type>();
            out.extend((0..floats.len()).map(|row| {
                if floats.is_null(row) {
                    0.0
                } else {
                    floats.value(row)
                }
            }));
        }
    }

    Ok(SourceDataSet::from_columns(
        numeric.into_iter().map(|(_, name)| name).zip(values),
    ))
}
