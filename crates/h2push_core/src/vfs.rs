use anyhow::Result;
use log::{debug, trace, warn};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use crate::{analyzer::Loader, url::url_from_path};

/// One file flowing through the build pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub contents: Arc<[u8]>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self { path: path.into(), contents: Arc::from(contents.into()) }
    }
}

/// Files observed so far, keyed by the URL they are served at.
///
/// Only written while files are arriving; [`VirtualFileSet::freeze`] hands
/// the contents over to an immutable [`FileSnapshot`] for analysis.
#[derive(Debug)]
pub struct VirtualFileSet {
    root: PathBuf,
    files: HashMap<String, SourceFile>,
}

impl VirtualFileSet {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), files: HashMap::new() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Registers `file` and returns its URL. A later file with the same URL
    /// replaces the earlier one.
    pub fn insert(&mut self, file: &SourceFile) -> Result<String> {
        let url = url_from_path(&self.root, &file.path)?;
        if self.files.insert(url.clone(), file.clone()).is_some() {
            warn!("{} was registered twice, keeping the latest contents", url);
        } else {
            trace!("Registered {} as {}", file.path.display(), url);
        }
        Ok(url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.files.contains_key(url)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn freeze(self) -> FileSnapshot {
        debug!("Freezing virtual file set with {} files", self.files.len());
        FileSnapshot { files: Arc::new(self.files) }
    }
}

/// Read-only view of a [`VirtualFileSet`], cheap to clone and share.
#[derive(Debug, Clone, Default)]
pub struct FileSnapshot {
    files: Arc<HashMap<String, SourceFile>>,
}

impl FileSnapshot {
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl Loader for FileSnapshot {
    fn load(&self, url: &str) -> Option<Arc<[u8]>> {
        self.files.get(url).map(|file| Arc::clone(&file.contents))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keys_by_url() {
        let mut files = VirtualFileSet::new("/app");
        let url = files.insert(&SourceFile::new("/app/css/app.css", "body {}")).unwrap();
        assert_eq!(url, "/css/app.css");
        assert!(files.contains("/css/app.css"));
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_insert_with_current_dir_root() {
        let mut files = VirtualFileSet::new(".");
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(files.insert(&SourceFile::new("index.html", "")).unwrap(), "/index.html");
        assert_eq!(files.insert(&SourceFile::new(cwd.join("js/app.js"), "")).unwrap(), "/js/app.js");
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_insert_outside_root_fails() {
        let mut files = VirtualFileSet::new("/app");
        assert!(files.insert(&SourceFile::new("/elsewhere/a.js", "")).is_err());
        assert!(files.is_empty());
    }

    #[test]
    fn test_last_write_wins() {
        let mut files = VirtualFileSet::new("/app");
        files.insert(&SourceFile::new("/app/a.js", "first")).unwrap();
        files.insert(&SourceFile::new("a.js", "second")).unwrap();
        assert_eq!(files.len(), 1);

        let snapshot = files.freeze();
        assert_eq!(snapshot.load("/a.js").as_deref(), Some(&b"second"[..]));
    }

    #[test]
    fn test_snapshot_load_missing() {
        let snapshot = VirtualFileSet::new("/app").freeze();
        assert!(snapshot.is_empty());
        assert!(snapshot.load("/index.html").is_none());
    }
}
