//! Keystroke buffering for keyboard-wedge scanners

use crate::{
    config::ScannerConfig,
    models::scan::{Key, ScanCompleted, ScanDisplay},
};

/// Per-dialog scan state.
///
/// A hardware scanner types the whole code in a quick burst and finishes
/// with Enter; a person types slower. Characters are only kept while they
/// arrive within `inter_key_gap_ms` of each other.
#[derive(Debug, Clone)]
pub struct ScanSession {
    inter_key_gap_ms: u64,
    buffer: String,
    last_event_ms: Option<u64>,
    active: bool,
    display: ScanDisplay,
}

impl ScanSession {
    pub fn new(config: &ScannerConfig) -> Self {
        Self {
            inter_key_gap_ms: config.inter_key_gap_ms,
            buffer: String::new(),
            last_event_ms: None,
            active: true,
            display: ScanDisplay::Waiting,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn display(&self) -> &ScanDisplay {
        &self.display
    }

    /// Feed one key event. Returns the barcode when a burst is terminated.
    pub fn on_key_event(&mut self, key: &Key, timestamp_ms: u64) -> Option<ScanCompleted> {
        if !self.active {
            return None;
        }

        let stale = match self.last_event_ms {
            Some(last) => timestamp_ms.saturating_sub(last) > self.inter_key_gap_ms,
            None => true,
        };
        if stale && !self.buffer.is_empty() {
            tracing::debug!("Discarding partial scan of {} chars", self.buffer.len());
            self.buffer.clear();
        }
        self.last_event_ms = Some(timestamp_ms);

        if key.is_terminator() {
            if self.buffer.is_empty() {
                return None;
            }
            let barcode = std::mem::take(&mut self.buffer);
            tracing::info!("Barcode scanned: {}", barcode);
            self.display = ScanDisplay::Scanned(barcode.clone());
            return Some(ScanCompleted {
                barcode,
                timestamp_ms,
            });
        }

        if let Some(c) = key.printable() {
            self.buffer.push(c);
        }
        None
    }

    /// Dialog opened: start listening from a clean state
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_event_ms = None;
        self.display = ScanDisplay::Waiting;
        self.active = true;
    }

    /// Dialog closed: ignore everything from now on
    pub fn stop(&mut self) {
        self.active = false;
    }
}

/// Barcode typed by hand into the dialog's text field
pub fn manual_entry(text: &str) -> Option<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
