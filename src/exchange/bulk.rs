//! Row-by-row creation of imported records
//!
//! The backend create call is abstracted as a [`RecordSink`]. Rows go out
//! strictly in sheet order, one await per row, and a failing row never stops
//! the rest of the batch.

use async_trait::async_trait;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use super::import::ParsedSheet;
use crate::models::{ImportOutcome, Record, RowError};

/// Failure reported by the create-record call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or("<no message>"))]
pub struct SinkError {
    pub message: Option<String>,
}

impl SinkError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn unknown() -> Self {
        Self { message: None }
    }

    /// Message shown in the row error table
    pub fn message_or(&self, fallback: &str) -> String {
        self.message.clone().unwrap_or_else(|| fallback.to_string())
    }
}

/// Whatever persists one imported record (usually a REST create call)
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSink: Send + Sync {
    async fn create(&self, record: Record) -> Result<(), SinkError>;
}

enum Pending {
    Create(u32, Record),
    Invalid(RowError),
}

/// Push every parsed row to `sink` and collect the outcome.
///
/// Rows already rejected by validators count as failures in their sheet
/// position. `cancel` is checked before each row. Sink errors without a
/// message are reported as `unknown_error`.
pub async fn bulk_create<S>(
    parsed: ParsedSheet,
    sink: &S,
    cancel: &CancellationToken,
    unknown_error: &str,
) -> ImportOutcome
where
    S: RecordSink + ?Sized,
{
    let mut outcome = ImportOutcome {
        skipped_columns: parsed.skipped_columns,
        ..ImportOutcome::default()
    };

    let mut pending: Vec<Pending> = parsed
        .rows
        .into_iter()
        .map(|r| Pending::Create(r.row, r.record))
        .chain(parsed.errors.into_iter().map(Pending::Invalid))
        .collect();
    pending.sort_by_key(|p| match p {
        Pending::Create(row, _) => *row,
        Pending::Invalid(err) => err.row,
    });

    for item in pending {
        if cancel.is_cancelled() {
            tracing::warn!("Import cancelled after {} rows", outcome.processed());
            outcome.cancelled = true;
            break;
        }
        match item {
            Pending::Invalid(err) => outcome.record_failure(err),
            Pending::Create(row, record) => match sink.create(record).await {
                Ok(()) => outcome.record_success(),
                Err(e) => {
                    let message = e.message_or(unknown_error);
                    tracing::warn!("Row {} not created: {}", row, message);
                    outcome.record_failure(RowError::new(row, message));
                }
            },
        }
    }

    tracing::info!(
        "Import finished: {} created, {} failed",
        outcome.success_count,
        outcome.fail_count
    );
    outcome
}
