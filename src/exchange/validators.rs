//! Reusable field predicates for imports

use once_cell::sync::Lazy;
use regex::Regex;
use validator::ValidateEmail;

use crate::models::CellValue;

/// Printable ASCII without spaces, as produced by CODE128 labels and wedges
static BARCODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\x21-\x7E]+$").expect("valid regex"));

fn text_of(value: &CellValue) -> Option<String> {
    match value {
        CellValue::Text(s) => Some(s.trim().to_string()),
        CellValue::Number(n) if n.fract() == 0.0 => Some(format!("{}", *n as i64)),
        _ => None,
    }
}

pub fn barcode(value: &CellValue) -> bool {
    text_of(value).map_or(false, |s| BARCODE_RE.is_match(&s))
}

pub fn email(value: &CellValue) -> bool {
    match value {
        CellValue::Text(s) => s.trim().to_string().validate_email(),
        _ => false,
    }
}

/// Four-digit publication year
pub fn year(value: &CellValue) -> bool {
    value
        .as_f64()
        .map_or(false, |y| y.fract() == 0.0 && (1000.0..=9999.0).contains(&y))
}
