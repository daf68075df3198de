//! Scan dialogs

use crate::{
    config::ScannerConfig,
    scanner::{ScanHandle, ScanListener, ScanSession},
};

#[derive(Clone)]
pub struct ScannerService {
    config: ScannerConfig,
}

impl ScannerService {
    pub fn new(config: ScannerConfig) -> Self {
        Self { config }
    }

    /// Synchronous session for callers that own their event loop
    pub fn session(&self) -> ScanSession {
        ScanSession::new(&self.config)
    }

    /// Start a listener task for a freshly opened dialog
    pub fn open_dialog(&self) -> ScanHandle {
        tracing::debug!(
            "Opening scan dialog (gap {} ms, settle {} ms)",
            self.config.inter_key_gap_ms,
            self.config.settle_delay_ms
        );
        ScanListener::spawn(&self.config)
    }
}
