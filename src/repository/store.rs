// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Directory-backed rule document store.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::config::{RkConfig, RulesLocation};
use crate::engine::Bundle;
use crate::error::{RepositoryError, Result, RkError};

lazy_static! {
    /// A plain file name: no separators, not starting with a dot.
    static ref DOCUMENT_NAME: Regex = Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap();
}

/// File name patterns listed as rule documents.
const DOCUMENT_PATTERNS: &[&str] = &["*.json", "*.yml", "*.yaml"];

/// Where the repository keeps its documents.
#[derive(Debug)]
enum Backing {
    /// A directory owned by the caller.
    Directory(PathBuf),
    /// A temporary directory removed when the repository is dropped.
    Temporary { dir: TempDir, namespace: String },
}

/// Stores rule documents by name.
#[derive(Debug)]
pub struct RuleRepository {
    backing: Backing,
    bundle: Bundle,
}

impl RuleRepository {
    /// Open the repository for the configured rules location.
    pub fn from_config(config: &RkConfig, bundle: Bundle) -> Result<Self> {
        let bundle = match &config.rules.resources {
            Some(root) if bundle.root().is_none() => bundle.with_root(root),
            _ => bundle,
        };
        Self::open(&config.rules.location()?, &config.rules.file, bundle)
    }

    /// Open a repository.
    ///
    /// Directory locations are used in place and created if missing. Bundled
    /// locations get a fresh temporary directory, seeded with the bundled
    /// `<namespace><default_file>` document when the bundle has one.
    pub fn open(location: &RulesLocation, default_file: &str, bundle: Bundle) -> Result<Self> {
        let backing = match location {
            RulesLocation::Directory(dir) => {
                fs::create_dir_all(dir).map_err(|e| init_failed(dir, e))?;
                Backing::Directory(dir.clone())
            }
            RulesLocation::Bundled { namespace } => {
                let dir = tempfile::Builder::new()
                    .prefix("validation-rules-")
                    .tempdir()
                    .map_err(|e| init_failed(&std::env::temp_dir(), e))?;
                debug!(path = %dir.path().display(), "created temporary rules directory");

                let seed = format!("{}{}", namespace, default_file);
                if let Some(content) = bundle.open(&seed) {
                    fs::write(dir.path().join(default_file), content)
                        .map_err(|e| init_failed(dir.path(), e))?;
                    debug!(document = %seed, "seeded rules directory from bundle");
                }

                Backing::Temporary {
                    dir,
                    namespace: namespace.clone(),
                }
            }
        };

        Ok(Self { backing, bundle })
    }

    /// Directory holding the documents.
    pub fn dir(&self) -> &Path {
        match &self.backing {
            Backing::Directory(dir) => dir,
            Backing::Temporary { dir, .. } => dir.path(),
        }
    }

    /// Whether the directory is temporary.
    pub fn is_temporary(&self) -> bool {
        matches!(self.backing, Backing::Temporary { .. })
    }

    /// Names of all stored documents, sorted.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();

        let base = glob::Pattern::escape(&self.dir().to_string_lossy());

        for pattern in DOCUMENT_PATTERNS {
            let full = format!("{}/{}", base, pattern);
            let paths = glob::glob_with(&full, glob_options()).map_err(|e| {
                RkError::Internal(format!("bad document pattern {}: {}", pattern, e))
            })?;

            for path in paths {
                match path {
                    Ok(path) if path.is_file() => {
                        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
                            names.push(name.to_string());
                        }
                    }
                    Ok(_) => {}
                    Err(e) => warn!(error = %e, "unreadable entry in rules directory"),
                }
            }
        }

        names.sort();
        names.dedup();
        Ok(names)
    }

    /// Read a document.
    ///
    /// For bundled locations a document missing on disk is read from the
    /// bundle and written to the directory before it is returned.
    pub fn read(&self, name: &str) -> Result<String> {
        let path = self.path_for(name)?;

        if path.is_file() {
            return Ok(fs::read_to_string(&path)?);
        }

        if let Backing::Temporary { namespace, .. } = &self.backing {
            if let Some(content) = self.bundle.open(&format!("{}{}", namespace, name)) {
                let text = String::from_utf8(content).map_err(|e| {
                    RkError::WithContext {
                        context: format!("bundled document {}", name),
                        message: e.to_string(),
                    }
                })?;
                fs::write(&path, &text).map_err(|e| write_failed(name, e))?;
                debug!(name, "cached bundled document in rules directory");
                return Ok(text);
            }
        }

        Err(RepositoryError::NotFound {
            name: name.to_string(),
        }
        .into())
    }

    /// Create or replace a document.
    ///
    /// Written to a dotfile first and renamed into place, so readers never
    /// see a partial document.
    pub fn save(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.path_for(name)?;
        let tmp = self.dir().join(format!(".{}.tmp", name));

        if let Err(e) = fs::write(&tmp, content).and_then(|()| fs::rename(&tmp, &path)) {
            let _ = fs::remove_file(&tmp);
            return Err(write_failed(name, e));
        }

        info!(name, path = %path.display(), "saved rule document");
        Ok(path)
    }

    /// Delete a document. Returns whether it existed.
    pub fn delete(&self, name: &str) -> Result<bool> {
        let path = self.path_for(name)?;

        match fs::remove_file(&path) {
            Ok(()) => {
                info!(name, "deleted rule document");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(RepositoryError::DeleteFailed {
                name: name.to_string(),
                message: e.to_string(),
            }
            .into()),
        }
    }

    /// Path for `name`, which must be a plain file name.
    fn path_for(&self, name: &str) -> Result<PathBuf> {
        if !DOCUMENT_NAME.is_match(name) {
            return Err(RepositoryError::InvalidName {
                name: name.to_string(),
            }
            .into());
        }

        Ok(self.dir().join(name))
    }
}

fn glob_options() -> glob::MatchOptions {
    glob::MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: true,
    }
}

fn init_failed(path: &Path, e: std::io::Error) -> RkError {
    RepositoryError::InitFailed {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
    .into()
}

fn write_failed(name: &str, e: std::io::Error) -> RkError {
    RepositoryError::WriteFailed {
        name: name.to_string(),
        message: e.to_string(),
    }
    .into()
}
