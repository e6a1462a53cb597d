use std::io::Read;
use std::path::Path;

use serde_json::{Map, Number, Value};

/// Columns kept verbatim instead of being coerced to numbers or booleans.
const TEXT_COLUMNS: [&str; 6] = [
    "first_name",
    "last_name",
    "email",
    "primary_goal",
    "source",
    "external_contact_id",
];

#[derive(Debug, thiserror::Error)]
pub enum BatchImportError {
    #[error("failed to read batch file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid batch CSV data: {0}")]
    Csv(#[from] csv::Error),
}

pub fn records_from_path<P: AsRef<Path>>(path: P) -> Result<Vec<Value>, BatchImportError> {
    let file = std::fs::File::open(path)?;
    records_from_reader(file)
}

/// Read a CSV whose headers are input field names into raw JSON records.
/// Blank cells are omitted so the validator applies its defaults.
pub fn records_from_reader<R: Read>(reader: R) -> Result<Vec<Value>, BatchImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(normalize_header)
        .collect();

    let mut records = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        let mut fields = Map::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if header.is_empty() || cell.is_empty() {
                continue;
            }
            fields.insert(header.clone(), coerce_cell(header, cell));
        }
        records.push(Value::Object(fields));
    }

    Ok(records)
}

fn normalize_header(raw: &str) -> String {
    raw.trim_start_matches('\u{feff}')
        .trim()
        .to_ascii_lowercase()
        .replace([' ', '-'], "_")
}

fn coerce_cell(header: &str, cell: &str) -> Value {
    if TEXT_COLUMNS.contains(&header) {
        return Value::String(cell.to_string());
    }

    match cell.to_ascii_lowercase().as_str() {
        "true" => return Value::Bool(true),
        "false" => return Value::Bool(false),
        _ => {}
    }

    if let Ok(integer) = cell.parse::<i64>() {
        return Value::Number(integer.into());
    }

    cell.parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(cell.to_string()))
}
