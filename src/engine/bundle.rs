// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Bundled rule documents.

use std::borrow::Cow;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Rule documents shipped with the embedding program.
///
/// Documents are registered in memory (typically with `include_bytes!`) or
/// read from an optional resource directory. Names are relative, e.g.
/// `validation/user-validation.yml`.
#[derive(Debug, Clone, Default)]
pub struct Bundle {
    root: Option<PathBuf>,
    embedded: HashMap<String, Cow<'static, [u8]>>,
}

impl Bundle {
    /// An empty bundle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Also look up documents below `root` on disk.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Register an in-memory document.
    pub fn with_document(
        mut self,
        name: impl Into<String>,
        content: impl Into<Cow<'static, [u8]>>,
    ) -> Self {
        self.insert(name, content);
        self
    }

    /// Register an in-memory document, replacing any previous one.
    pub fn insert(&mut self, name: impl Into<String>, content: impl Into<Cow<'static, [u8]>>) {
        self.embedded.insert(name.into(), content.into());
    }

    /// Resource directory, if any.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    /// Read a document. In-memory documents win over the resource directory.
    pub fn open(&self, name: &str) -> Option<Vec<u8>> {
        if let Some(content) = self.embedded.get(name) {
            return Some(content.to_vec());
        }

        let path = self.root.as_ref()?.join(name);
        match std::fs::read(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    tracing::warn!(path = %path.display(), error = %e, "bundled document unreadable");
                }
                None
            }
        }
    }

    /// Where `name` would be found, for diagnostics.
    pub fn describe(&self, name: &str) -> String {
        match &self.root {
            Some(root) => format!("bundled:{} ({})", name, root.join(name).display()),
            None => format!("bundled:{}", name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_document() {
        let bundle = Bundle::new().with_document("validation/a.yml", &b"rules: []"[..]);
        assert_eq!(bundle.open("validation/a.yml").unwrap(), b"rules: []");
        assert!(bundle.open("validation/b.yml").is_none());
    }

    #[test]
    fn test_root_directory() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("validation")).unwrap();
        std::fs::write(dir.path().join("validation/a.yml"), "rules: []").unwrap();

        let bundle = Bundle::new().with_root(dir.path());
        assert_eq!(bundle.open("validation/a.yml").unwrap(), b"rules: []");
        assert!(bundle.open("validation/missing.yml").is_none());
    }

    #[test]
    fn test_embedded_wins_over_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("a.yml"), "from disk").unwrap();

        let bundle = Bundle::new()
            .with_root(dir.path())
            .with_document("a.yml", b"from memory".to_vec());
        assert_eq!(bundle.open("a.yml").unwrap(), b"from memory");
    }
}
