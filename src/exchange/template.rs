//! Blank import templates

use rust_xlsxwriter::Workbook;

use super::export::write_header_row;
use crate::{config::ExchangeConfig, error::AppResult, models::HeaderMap};

pub const TEMPLATE_SHEET: &str = "Template";

/// A workbook holding only the header row, for users to fill in and import back.
pub fn import_template(headers: &HeaderMap, config: &ExchangeConfig) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(TEMPLATE_SHEET)?;
    write_header_row(worksheet, headers, config.template_column_width)?;
    Ok(workbook.save_to_buffer()?)
}
