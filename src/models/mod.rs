//! Data models for bibliodesk

pub mod header_map;
pub mod import_report;
pub mod scan;
pub mod value;

// Re-export commonly used types
pub use header_map::HeaderMap;
pub use import_report::{ErrorSummary, ImportOutcome, ImportRow, RowError};
pub use scan::{Key, KeyEvent, ScanCompleted, ScanDisplay};
pub use value::{CellValue, Record};
