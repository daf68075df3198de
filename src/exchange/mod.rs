//! Spreadsheet import and export driven by header maps

pub mod bulk;
pub mod export;
pub mod import;
pub mod presets;
pub mod template;
pub mod validators;

pub use bulk::{bulk_create, RecordSink, SinkError};
pub use export::{export_records, export_to_file, ExportSpec};
pub use import::{check_file_name, import_records, ParsedSheet, Validators};
pub use template::import_template;
