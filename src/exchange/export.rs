//! Records to xlsx

use std::fmt::Write;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::{
    config::ExchangeConfig,
    error::AppResult,
    models::{CellValue, HeaderMap, Record},
};

/// Everything needed to produce one export file
#[derive(Debug, Clone)]
pub struct ExportSpec {
    pub file_name: String,
    /// Falls back to the configured default sheet name
    pub sheet_name: Option<String>,
    pub headers: HeaderMap,
    pub rows: Vec<Record>,
}

impl ExportSpec {
    pub fn new(file_name: impl Into<String>, headers: HeaderMap, rows: Vec<Record>) -> Self {
        Self {
            file_name: file_name.into(),
            sheet_name: None,
            headers,
            rows,
        }
    }

    pub fn sheet(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Restrict the export to the fields ticked in the export dialog
    pub fn select_fields<S: AsRef<str>>(mut self, keys: &[S]) -> AppResult<Self> {
        self.headers = self.headers.select(keys)?;
        Ok(self)
    }
}

/// A cell as it lands in the sheet
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Blank,
    Text(String),
    Number(f64),
}

/// Resolve `key` against `record` and format it for display.
pub fn render(record: &Record, key: &str, config: &ExchangeConfig) -> Rendered {
    match record.resolve(key) {
        None | Some(CellValue::Empty) | Some(CellValue::Record(_)) => Rendered::Blank,
        Some(CellValue::Text(s)) if s.is_empty() => Rendered::Blank,
        Some(CellValue::Text(s)) => Rendered::Text(s.clone()),
        Some(CellValue::Number(n)) => Rendered::Number(*n),
        Some(CellValue::Bool(b)) => Rendered::Text(if *b {
            config.yes_label.clone()
        } else {
            config.no_label.clone()
        }),
        Some(CellValue::Date(d)) => Rendered::Text(format_date(*d, &config.date_format)),
        Some(CellValue::DateTime(dt)) => Rendered::Text(format_date(dt.date(), &config.date_format)),
    }
}

/// A malformed format string falls back to ISO dates instead of panicking
fn format_date(date: NaiveDate, fmt: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", date.format(fmt)).is_err() {
        return date.to_string();
    }
    out
}

pub(crate) fn write_header_row(
    worksheet: &mut Worksheet,
    headers: &HeaderMap,
    column_width: f64,
) -> AppResult<()> {
    for (col, label) in headers.labels().enumerate() {
        let col = col as u16;
        worksheet.write_string(0, col, label)?;
        worksheet.set_column_width(col, column_width)?;
    }
    Ok(())
}

fn build_workbook(spec: &ExportSpec, config: &ExchangeConfig) -> AppResult<Workbook> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(
        spec.sheet_name
            .as_deref()
            .unwrap_or(&config.default_sheet_name),
    )?;

    write_header_row(worksheet, &spec.headers, config.export_column_width)?;

    for (i, record) in spec.rows.iter().enumerate() {
        let row = i as u32 + 1;
        for (col, key) in spec.headers.keys().enumerate() {
            let col = col as u16;
            match render(record, key, config) {
                Rendered::Blank => {}
                Rendered::Text(s) => {
                    worksheet.write_string(row, col, s)?;
                }
                Rendered::Number(n) => {
                    worksheet.write_number(row, col, n)?;
                }
            }
        }
    }

    Ok(workbook)
}

/// Render `spec` to xlsx bytes.
pub fn export_records(spec: &ExportSpec, config: &ExchangeConfig) -> AppResult<Vec<u8>> {
    let mut workbook = build_workbook(spec, config)?;
    let bytes = workbook.save_to_buffer()?;
    tracing::info!(
        "Exported {} rows x {} columns for {}",
        spec.rows.len(),
        spec.headers.len(),
        spec.file_name
    );
    Ok(bytes)
}

/// Write `spec` to `dir/<file_name>` and return the full path.
pub fn export_to_file(spec: &ExportSpec, dir: &Path, config: &ExchangeConfig) -> AppResult<PathBuf> {
    let path = dir.join(&spec.file_name);
    let bytes = export_records(spec, config)?;
    std::fs::write(&path, bytes)?;
    Ok(path)
}
