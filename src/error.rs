//! Error types for bibliodesk

use thiserror::Error;

/// Stable error codes handed to the console alongside messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum ErrorCode {
    Failure = 1,
    BadFile = 2,
    BadValue = 3,
    WriteFailure = 4,
    IoFailure = 5,
    BadConfig = 6,
}

/// Main library error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot read workbook: {0}")]
    Parse(String),

    #[error("Cannot write workbook: {0}")]
    Write(#[from] rust_xlsxwriter::XlsxError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::Parse(_) => ErrorCode::BadFile,
            AppError::Write(_) => ErrorCode::WriteFailure,
            AppError::Io(_) => ErrorCode::IoFailure,
            AppError::Validation(_) => ErrorCode::BadValue,
            AppError::Config(_) => ErrorCode::BadConfig,
            AppError::Internal(_) => ErrorCode::Failure,
        }
    }
}

impl From<calamine::Error> for AppError {
    fn from(e: calamine::Error) -> Self {
        AppError::Parse(e.to_string())
    }
}

/// Result type alias for library operations
pub type AppResult<T> = Result<T, AppError>;
