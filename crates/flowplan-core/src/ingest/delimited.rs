use rust_decimal::Decimal;
use std::str::FromStr;

use csv::ReaderBuilder;

use crate::error::FlowplanError;
use crate::model::{CellValue, DecodedSheet, RawRow};

/// Decode delimited text into the same sheet shape the xlsx decoder
/// produces, so the two upload formats are indistinguishable downstream.
pub fn decode(bytes: &[u8]) -> Result<DecodedSheet, FlowplanError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| FlowplanError::Decode(format!("failed to read header row: {e}")))?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record =
            record.map_err(|e| FlowplanError::Decode(format!("failed to read row: {e}")))?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }
        let mut row = RawRow::new();
        for (i, column) in columns.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            row.insert(column.clone(), parse_field(record.get(i).unwrap_or("")));
        }
        rows.push(row);
    }

    Ok(DecodedSheet { columns, rows })
}

/// Numeric fields become Number so csv and xlsx uploads carry identical
/// cell values.
fn parse_field(field: &str) -> CellValue {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        return CellValue::Empty;
    }
    match Decimal::from_str(trimmed) {
        Ok(d) => CellValue::Number(d),
        Err(_) => CellValue::Text(trimmed.to_string()),
    }
}
