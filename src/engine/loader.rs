// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Rule-set resolution and loading.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::config::{RulesLocation, DEFAULT_NAMESPACE};
use crate::error::{LoadError, Result};
use crate::rules::{parse_rule_set, RuleSet};

use super::bundle::Bundle;
use super::cache::RuleSetCache;

/// One place a rule document may live.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Candidate {
    Bundled(String),
    File(PathBuf),
}

/// Resolves rule-set identifiers to parsed [`RuleSet`]s.
///
/// Lookup order for an identifier `id`:
///
/// 1. the primary location (`<dir>/<id>` or bundled `<namespace><id>`),
/// 2. the bundled default namespace, `validation/<id>`,
/// 3. `id` as a filesystem path.
///
/// The first readable document wins; a broken document there is reported as
/// malformed and the later locations are not tried.
#[derive(Debug)]
pub struct RuleSetLoader {
    primary: RulesLocation,
    bundle: Bundle,
    cache: Option<RuleSetCache>,
}

impl RuleSetLoader {
    /// Create a loader without caching.
    pub fn new(primary: RulesLocation, bundle: Bundle) -> Self {
        Self {
            primary,
            bundle,
            cache: None,
        }
    }

    /// Enable or disable the rule-set cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(RuleSetCache::new);
        self
    }

    /// Primary rules location.
    pub fn primary(&self) -> &RulesLocation {
        &self.primary
    }

    /// Bundled documents.
    pub fn bundle(&self) -> &Bundle {
        &self.bundle
    }

    /// Whether parsed rule sets are cached.
    pub fn is_caching(&self) -> bool {
        self.cache.is_some()
    }

    /// Resolve and parse the rule set for `identifier`.
    ///
    /// Load failures come back as [`RkError::Load`](crate::error::RkError::Load);
    /// any other error is internal.
    pub fn resolve(&self, identifier: &str) -> Result<Arc<RuleSet>> {
        if let Some(cache) = &self.cache {
            if let Some(hit) = cache.get(identifier)? {
                debug!(identifier, "rule set cache hit");
                return Ok(hit);
            }
        }

        let (origin, bytes) = self.locate(identifier)?;
        let rule_set = Arc::new(parse_rule_set(identifier, &bytes)?);
        info!(identifier, origin = %origin, rules = rule_set.len(), "loaded rule set");

        if let Some(cache) = &self.cache {
            cache.insert(Arc::clone(&rule_set))?;
        }

        Ok(rule_set)
    }

    /// Drop the cached rule set for `identifier`.
    pub fn invalidate(&self, identifier: &str) -> Result<bool> {
        match &self.cache {
            Some(cache) => cache.invalidate(identifier),
            None => Ok(false),
        }
    }

    /// Drop every cached rule set.
    pub fn invalidate_all(&self) -> Result<()> {
        match &self.cache {
            Some(cache) => cache.invalidate_all(),
            None => Ok(()),
        }
    }

    /// Locations searched for `identifier`, in order.
    fn candidates(&self, identifier: &str) -> Vec<Candidate> {
        let primary = match &self.primary {
            RulesLocation::Directory(dir) => Candidate::File(dir.join(identifier)),
            RulesLocation::Bundled { namespace } => {
                Candidate::Bundled(format!("{}{}", namespace, identifier))
            }
        };

        vec![
            primary,
            Candidate::Bundled(format!("{}{}", DEFAULT_NAMESPACE, identifier)),
            Candidate::File(PathBuf::from(identifier)),
        ]
    }

    /// Find the first readable document for `identifier`.
    fn locate(&self, identifier: &str) -> std::result::Result<(String, Vec<u8>), LoadError> {
        let mut searched = Vec::new();

        for candidate in self.candidates(identifier) {
            let (origin, content) = match &candidate {
                Candidate::Bundled(name) => (self.bundle.describe(name), self.bundle.open(name)),
                Candidate::File(path) => (path.display().to_string(), read_file(path)),
            };

            match content {
                Some(bytes) => return Ok((origin, bytes)),
                None => {
                    debug!(identifier, location = %origin, "rule document not found here");
                    searched.push(origin);
                }
            }
        }

        Err(LoadError::NotFound {
            identifier: identifier.to_string(),
            searched,
        })
    }
}

fn read_file(path: &Path) -> Option<Vec<u8>> {
    if !path.is_file() {
        return None;
    }

    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "rule document unreadable, skipping");
            None
        }
    }
}
