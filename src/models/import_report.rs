//! Import report models for row-isolated spreadsheet imports.

use serde::{Deserialize, Serialize};

use super::value::Record;

/// One spreadsheet row translated to field keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportRow {
    /// 1-based sheet row number (first data row under the header is 2)
    pub row: u32,
    pub record: Record,
}

/// A row that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowError {
    pub row: u32,
    pub error: String,
}

impl RowError {
    pub fn new(row: u32, error: impl Into<String>) -> Self {
        Self {
            row,
            error: error.into(),
        }
    }

    pub fn validation(row: u32) -> Self {
        Self::new(row, format!("Validation error in row {}", row))
    }
}

/// Aggregate result of an import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub success_count: usize,
    pub fail_count: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<RowError>,
    /// Column labels present in the sheet that matched no field
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped_columns: Vec<String>,
    /// The run was stopped before every row was processed
    #[serde(default)]
    pub cancelled: bool,
}

impl ImportOutcome {
    pub fn record_success(&mut self) {
        self.success_count += 1;
    }

    pub fn record_failure(&mut self, error: RowError) {
        self.fail_count += 1;
        self.errors.push(error);
    }

    pub fn processed(&self) -> usize {
        self.success_count + self.fail_count
    }

    /// Errors in row order, the first `limit` of them in detail.
    pub fn summary(&self, limit: usize) -> ErrorSummary<'_> {
        let shown = self.errors.len().min(limit);
        ErrorSummary {
            shown: &self.errors[..shown],
            remaining: self.errors.len() - shown,
        }
    }
}

/// Truncated view of the row errors for the results table.
#[derive(Debug, PartialEq, Eq)]
pub struct ErrorSummary<'a> {
    pub shown: &'a [RowError],
    pub remaining: usize,
}

impl std::fmt::Display for ErrorSummary<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for err in self.shown {
            writeln!(f, "{}\t{}", err.row, err.error)?;
        }
        if self.remaining > 0 {
            write!(f, "...and {} more errors", self.remaining)?;
        }
        Ok(())
    }
}
