// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Parsed rule-set cache.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{Result, RkError};
use crate::rules::RuleSet;

/// Per-identifier cache of parsed rule sets.
///
/// Entries are whole `Arc<RuleSet>` values replaced under the write lock, so
/// a caller holding an entry keeps a consistent rule list even if the entry
/// is swapped or invalidated meanwhile. Entries only leave the cache through
/// [`invalidate`](Self::invalidate) or [`invalidate_all`](Self::invalidate_all).
#[derive(Debug, Default)]
pub struct RuleSetCache {
    entries: RwLock<HashMap<String, Arc<RuleSet>>>,
}

impl RuleSetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached rule set for `identifier`, if any.
    pub fn get(&self, identifier: &str) -> Result<Option<Arc<RuleSet>>> {
        let entries = self.entries.read().map_err(|_| poisoned())?;
        Ok(entries.get(identifier).cloned())
    }

    /// Store a rule set, replacing any previous entry.
    pub fn insert(&self, rule_set: Arc<RuleSet>) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        entries.insert(rule_set.identifier().to_string(), rule_set);
        Ok(())
    }

    /// Drop the entry for `identifier`. Returns whether one was present.
    pub fn invalidate(&self, identifier: &str) -> Result<bool> {
        let mut entries = self.entries.write().map_err(|_| poisoned())?;
        Ok(entries.remove(identifier).is_some())
    }

    /// Drop every entry.
    pub fn invalidate_all(&self) -> Result<()> {
        self.entries.write().map_err(|_| poisoned())?.clear();
        Ok(())
    }

    /// Number of cached rule sets.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries.read().map_err(|_| poisoned())?.len())
    }
}

fn poisoned() -> RkError {
    RkError::Internal("rule-set cache lock poisoned".to_string())
}
