// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Record kind to rule-set identifier mapping.

use std::collections::HashMap;

/// Maps a record kind (see [`Inspectable::kind`](crate::record::Inspectable::kind))
/// to the identifier of the rule set that validates it.
#[derive(Debug, Clone, Default)]
pub struct KindRegistry {
    entries: HashMap<String, String>,
}

impl KindRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `identifier` for `kind`, replacing any previous entry.
    pub fn register(&mut self, kind: impl Into<String>, identifier: impl Into<String>) {
        self.entries.insert(kind.into(), identifier.into());
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, kind: impl Into<String>, identifier: impl Into<String>) -> Self {
        self.register(kind, identifier);
        self
    }

    /// Rule-set identifier for `kind`.
    pub fn lookup(&self, kind: &str) -> Option<&str> {
        self.entries.get(kind).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for KindRegistry {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
