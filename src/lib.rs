//! Bibliodesk
//!
//! Local engines behind a school library console: capturing barcodes from
//! keyboard-wedge scanners, and moving catalog records in and out of Excel
//! workbooks.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod exchange;
pub mod logging;
pub mod models;
pub mod scanner;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// State shared by every screen of the console
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let services = services::Services::new(&config);
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }

    /// Load configuration, install logging and build the services
    pub fn bootstrap() -> AppResult<Self> {
        let config = AppConfig::load()?;
        logging::init(&config.logging);
        tracing::info!("Starting bibliodesk v{}", env!("CARGO_PKG_VERSION"));
        Ok(Self::new(config))
    }
}
