use std::io::Cursor;

use calamine::{Reader, Xlsx};
use rust_decimal::Decimal;

use crate::error::FlowplanError;
use crate::model::{CellValue, DecodedSheet, RawRow};

/// Decode the first worksheet of an xlsx payload.
///
/// The header row supplies the column set; every following row becomes one
/// RawRow keyed by those columns. Cells past the header width are dropped,
/// missing trailing cells read as Empty. A sheet with no cells at all
/// decodes to an empty sheet rather than an error.
pub fn decode(bytes: &[u8]) -> Result<DecodedSheet, FlowplanError> {
    let cursor = Cursor::new(bytes);
    let mut workbook: Xlsx<_> = calamine::open_workbook_from_rs(cursor)
        .map_err(|e| FlowplanError::Decode(format!("failed to open xlsx: {e}")))?;

    let sheet = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| FlowplanError::Decode("workbook has no sheets".into()))?
        .map_err(|e| FlowplanError::Decode(format!("failed to read first sheet: {e}")))?;

    let mut row_iter = sheet.rows();
    let columns: Vec<String> = match row_iter.next() {
        Some(header) => header
            .iter()
            .map(|c| cell_as_string(c).unwrap_or_default())
            .collect(),
        None => return Ok(DecodedSheet::default()),
    };

    let mut rows = Vec::new();
    for raw in row_iter {
        if raw.iter().all(is_blank) {
            continue;
        }
        let mut row = RawRow::new();
        for (i, column) in columns.iter().enumerate() {
            if column.is_empty() {
                continue;
            }
            let cell = raw.get(i).map(to_cell_value).unwrap_or(CellValue::Empty);
            row.insert(column.clone(), cell);
        }
        rows.push(row);
    }

    Ok(DecodedSheet { columns, rows })
}

fn to_cell_value(cell: &calamine::Data) -> CellValue {
    match cell {
        calamine::Data::Empty => CellValue::Empty,
        calamine::Data::Float(f) => CellValue::Number(f64_to_decimal(*f)),
        calamine::Data::Int(i) => CellValue::Number(Decimal::from(*i)),
        calamine::Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(trimmed.to_string())
            }
        }
        other => CellValue::Text(format!("{other}")),
    }
}

fn cell_as_string(cell: &calamine::Data) -> Option<String> {
    match cell {
        calamine::Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_string())
            }
        }
        calamine::Data::Float(f) => Some(f.to_string()),
        calamine::Data::Int(i) => Some(i.to_string()),
        calamine::Data::Empty => None,
        _ => Some(format!("{cell}")),
    }
}

fn is_blank(cell: &calamine::Data) -> bool {
    match cell {
        calamine::Data::Empty => true,
        calamine::Data::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 40.7_f64 becoming 40.69999...).
fn f64_to_decimal(f: f64) -> Decimal {
    let s = format!("{f}");
    s.parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}
