//! Spreadsheet exchange service used by the catalog screens

use std::path::{Path, PathBuf};

use tokio_util::sync::CancellationToken;

use crate::{
    config::ExchangeConfig,
    error::AppResult,
    exchange::{self, ExportSpec, ParsedSheet, RecordSink, Validators},
    models::{ErrorSummary, HeaderMap, ImportOutcome},
};

#[derive(Clone)]
pub struct ExchangeService {
    config: ExchangeConfig,
}

impl ExchangeService {
    pub fn new(config: ExchangeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExchangeConfig {
        &self.config
    }

    /// Export to xlsx bytes
    pub fn export(&self, spec: &ExportSpec) -> AppResult<Vec<u8>> {
        exchange::export_records(spec, &self.config)
    }

    /// Export into `dir` under `spec.file_name`
    pub fn export_to_dir(&self, spec: &ExportSpec, dir: &Path) -> AppResult<PathBuf> {
        exchange::export_to_file(spec, dir, &self.config)
    }

    /// Blank workbook with the header row only
    pub fn template(&self, headers: &HeaderMap) -> AppResult<Vec<u8>> {
        exchange::import_template(headers, &self.config)
    }

    /// Check the file name and parse the workbook
    pub fn parse(
        &self,
        file_name: &str,
        bytes: &[u8],
        headers: &HeaderMap,
        validators: &Validators,
    ) -> AppResult<ParsedSheet> {
        exchange::check_file_name(file_name)?;
        exchange::import_records(bytes, headers, validators)
    }

    /// Parse the workbook and create every valid row through `sink`
    pub async fn import<S>(
        &self,
        file_name: &str,
        bytes: &[u8],
        headers: &HeaderMap,
        validators: &Validators,
        sink: &S,
        cancel: &CancellationToken,
    ) -> AppResult<ImportOutcome>
    where
        S: RecordSink + ?Sized,
    {
        let parsed = self.parse(file_name, bytes, headers, validators)?;
        tracing::info!("Importing {} rows from {}", parsed.total_rows(), file_name);
        Ok(exchange::bulk_create(parsed, sink, cancel, &self.config.unknown_error_label).await)
    }

    /// Error table as shown after an import
    pub fn preview<'a>(&self, outcome: &'a ImportOutcome) -> ErrorSummary<'a> {
        outcome.summary(self.config.error_preview_limit)
    }
}
