//! Keyboard events and scan results

use serde::{Deserialize, Serialize};

/// A key as reported by the keyboard event source
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Enter,
    /// Modifiers, function keys, arrows...
    Other(String),
}

impl Key {
    /// Parse a DOM-style key name (`"a"`, `"Enter"`, `"Shift"`)
    pub fn from_name(name: &str) -> Self {
        let mut chars = name.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Key::Char(c),
            _ if name == "Enter" || name == "Return" => Key::Enter,
            _ => Key::Other(name.to_string()),
        }
    }

    /// Carriage return and line feed arrive as characters from some wedges
    pub fn is_terminator(&self) -> bool {
        matches!(self, Key::Enter | Key::Char('\r') | Key::Char('\n'))
    }

    pub fn printable(&self) -> Option<char> {
        match self {
            Key::Char(c) if !c.is_control() => Some(*c),
            _ => None,
        }
    }
}

/// A timestamped key event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub timestamp_ms: u64,
}

impl KeyEvent {
    pub fn new(key: Key, timestamp_ms: u64) -> Self {
        Self { key, timestamp_ms }
    }
}

/// Emitted once per physical scan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanCompleted {
    pub barcode: String,
    pub timestamp_ms: u64,
}

/// What the scan dialog shows
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "barcode", rename_all = "snake_case")]
pub enum ScanDisplay {
    #[default]
    Waiting,
    Scanned(String),
}
