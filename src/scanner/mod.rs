//! Barcode scan capture for keyboard-wedge scanners

pub mod listener;
pub mod session;

pub use listener::{ScanHandle, ScanInput, ScanListener};
pub use session::{manual_entry, ScanSession};
