//! xlsx to records

use std::collections::HashMap;
use std::io::Cursor;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use chrono::{Duration, NaiveDate};

use crate::{
    error::{AppError, AppResult},
    models::{CellValue, HeaderMap, ImportRow, Record, RowError},
};

type Check = Box<dyn Fn(&CellValue) -> bool + Send + Sync>;

/// Optional per-field predicates applied to populated cells
#[derive(Default)]
pub struct Validators(HashMap<String, Check>);

impl Validators {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<F>(mut self, key: impl Into<String>, check: F) -> Self
    where
        F: Fn(&CellValue) -> bool + Send + Sync + 'static,
    {
        self.0.insert(key.into(), Box::new(check));
        self
    }

    /// `true` when `value` passes (or `key` has no validator)
    pub fn accepts(&self, key: &str, value: &CellValue) -> bool {
        self.0.get(key).map_or(true, |check| check(value))
    }
}

impl std::fmt::Debug for Validators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

/// First sheet of a workbook, translated through a header map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSheet {
    pub rows: Vec<ImportRow>,
    /// Rows rejected by a validator
    pub errors: Vec<RowError>,
    /// Header labels that matched no field key
    pub skipped_columns: Vec<String>,
}

impl ParsedSheet {
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.rows.iter().map(|r| &r.record)
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len() + self.errors.len()
    }
}

/// Only Excel workbooks are offered to the import
pub fn check_file_name(file_name: &str) -> AppResult<()> {
    let lower = file_name.to_lowercase();
    if lower.ends_with(".xlsx") || lower.ends_with(".xls") {
        Ok(())
    } else {
        Err(AppError::Validation(format!(
            "{} is not an Excel file (.xlsx or .xls)",
            file_name
        )))
    }
}

/// Read the first sheet of `bytes` and map its columns through `headers`.
///
/// The whole call fails only when the workbook itself is unreadable; rows
/// failing validation are reported in [`ParsedSheet::errors`].
pub fn import_records(
    bytes: &[u8],
    headers: &HeaderMap,
    validators: &Validators,
) -> AppResult<ParsedSheet> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let first = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| AppError::Parse("workbook has no sheets".to_string()))?;
    let range = workbook.worksheet_range(&first)?;

    let parsed = parse_range(&range, headers, validators);
    tracing::info!(
        "Parsed sheet {}: {} rows, {} invalid, {} unmapped columns",
        first,
        parsed.rows.len(),
        parsed.errors.len(),
        parsed.skipped_columns.len()
    );
    Ok(parsed)
}

fn parse_range(range: &Range<Data>, headers: &HeaderMap, validators: &Validators) -> ParsedSheet {
    let mut parsed = ParsedSheet::default();
    let Some((first_row, _)) = range.start() else {
        return parsed;
    };

    let inverted = headers.inverted();
    let mut rows = range.rows();
    let Some(header_cells) = rows.next() else {
        return parsed;
    };

    // column index -> field key
    let mut columns: Vec<Option<&str>> = Vec::with_capacity(header_cells.len());
    for cell in header_cells {
        let label = header_label(cell);
        let key = inverted.get(label.as_str()).copied();
        if key.is_none() && !label.is_empty() {
            parsed.skipped_columns.push(label);
        }
        columns.push(key);
    }

    for (offset, cells) in rows.enumerate() {
        // 1-based sheet row; the header occupies `first_row + 1`
        let row = first_row + offset as u32 + 2;
        let values: Vec<CellValue> = cells.iter().map(cell_value).collect();
        if values.iter().all(CellValue::is_empty) {
            continue;
        }

        let mut record = Record::new();
        let mut valid = true;
        for (value, key) in values.into_iter().zip(&columns) {
            let Some(key) = key else { continue };
            if value.is_empty() {
                continue;
            }
            if !validators.accepts(key, &value) {
                tracing::debug!("Row {} rejected on field {}", row, key);
                valid = false;
            }
            record.insert(*key, value);
        }

        if valid {
            parsed.rows.push(ImportRow { row, record });
        } else {
            parsed.errors.push(RowError::validation(row));
        }
    }

    parsed
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

/// Translate a sheet cell into a record value
pub fn cell_value(cell: &Data) -> CellValue {
    match cell {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => from_excel_serial(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

/// Last serial Excel can display as a date (9999-12-31 23:59:59)
const MAX_EXCEL_SERIAL: f64 = 2_958_465.999_99;

/// Excel counts days from 1899-12-30 (the 1900 leap-year bug folded in).
/// Serials outside the date range stay plain numbers.
fn from_excel_serial(serial: f64) -> CellValue {
    if !serial.is_finite() || !(0.0..=MAX_EXCEL_SERIAL).contains(&serial) {
        return CellValue::Number(serial);
    }
    let Some(epoch) = NaiveDate::from_ymd_opt(1899, 12, 30) else {
        return CellValue::Number(serial);
    };
    let days = serial.trunc() as i64;
    let seconds = ((serial - serial.trunc()) * 86_400.0).round() as i64;
    let Some(date) = Duration::try_days(days).and_then(|d| epoch.checked_add_signed(d)) else {
        return CellValue::Number(serial);
    };
    if seconds == 0 {
        return CellValue::Date(date);
    }
    let time = Duration::try_seconds(seconds);
    match (date.and_hms_opt(0, 0, 0), time) {
        (Some(midnight), Some(time)) => CellValue::DateTime(midnight + time),
        _ => CellValue::Date(date),
    }
}
