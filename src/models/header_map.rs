//! Ordered field-key to column-label mapping

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Association between internal field keys (possibly dotted) and the
/// human-readable column labels of a spreadsheet. Iteration order is
/// column order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HeaderMap(IndexMap<String, String>);

impl HeaderMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, label: impl Into<String>) -> Self {
        self.0.insert(key.into(), label.into());
        self
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    pub fn label(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// `label -> key`; with duplicate labels the later key wins.
    pub fn inverted(&self) -> HashMap<&str, &str> {
        self.iter().map(|(key, label)| (label, key)).collect()
    }

    /// Keep only `keys`, preserving this map's column order.
    pub fn select<S: AsRef<str>>(&self, keys: &[S]) -> AppResult<HeaderMap> {
        let selected: IndexMap<String, String> = self
            .0
            .iter()
            .filter(|(key, _)| keys.iter().any(|k| k.as_ref() == key.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        if selected.is_empty() {
            return Err(AppError::Validation(
                "select at least one field to export".to_string(),
            ));
        }
        Ok(HeaderMap(selected))
    }
}

impl<K: Into<String>, L: Into<String>> FromIterator<(K, L)> for HeaderMap {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        HeaderMap(
            iter.into_iter()
                .map(|(k, l)| (k.into(), l.into()))
                .collect(),
        )
    }
}
