use anyhow::{Context, Result, anyhow};
use log::{debug, trace};
use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};

use crate::url::url_from_path;

pub const DEFAULT_ENTRYPOINT: &str = "index.html";

pub fn find_git_root() -> Result<PathBuf> {
    find_git_root_from(&env::current_dir()?)
}

pub fn find_git_root_from(start: &Path) -> Result<PathBuf> {
    debug!("Searching for git root from: {:?}", start);
    let mut current_dir = start.to_path_buf();

    loop {
        let git_dir = current_dir.join(".git");
        trace!("Checking for .git at: {:?}", git_dir);
        if git_dir.exists() {
            debug!("Found git root at: {:?}", current_dir);
            return Ok(current_dir);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(anyhow!("Could not find .git directory in any parent folder")),
        }
    }
}

/// On-disk shape of the project file, every field optional.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ProjectFile {
    root: Option<PathBuf>,
    entrypoint: Option<PathBuf>,
    shell: Option<PathBuf>,
    #[serde(default)]
    fragments: Vec<PathBuf>,
}

/// Where the application's entry documents live.
///
/// `entrypoint`, `shell` and `fragments` may be absolute or relative to
/// `root`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub root: PathBuf,
    pub entrypoint: PathBuf,
    pub shell: Option<PathBuf>,
    pub fragments: Vec<PathBuf>,
}

impl ProjectConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            entrypoint: PathBuf::from(DEFAULT_ENTRYPOINT),
            shell: None,
            fragments: Vec::new(),
        }
    }

    pub fn with_entrypoint(mut self, entrypoint: impl Into<PathBuf>) -> Self {
        self.entrypoint = entrypoint.into();
        self
    }

    pub fn with_shell(mut self, shell: impl Into<PathBuf>) -> Self {
        self.shell = Some(shell.into());
        self
    }

    pub fn with_fragments<I, P>(mut self, fragments: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.fragments = fragments.into_iter().map(Into::into).collect();
        self
    }

    /// Reads a JSON project file such as `polymer.json`.
    ///
    /// A relative `root` is taken relative to the file's directory; a
    /// missing one defaults to that directory.
    pub fn load(path: &Path) -> Result<Self> {
        debug!("Reading project config from {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read project config {}", path.display()))?;
        let file: ProjectFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse project config {}", path.display()))?;

        // A bare file name has an empty parent.
        let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
        let root = match file.root {
            Some(root) if root.is_absolute() => root,
            Some(root) => dir.join(root),
            None => dir.to_path_buf(),
        };

        let mut config = Self::new(root).with_fragments(file.fragments);
        if let Some(entrypoint) = file.entrypoint {
            config.entrypoint = entrypoint;
        }
        config.shell = file.shell;
        debug!(
            "Project config: entrypoint={:?}, shell={:?}, {} fragments",
            config.entrypoint,
            config.shell,
            config.fragments.len()
        );
        Ok(config)
    }

    pub fn entrypoint_url(&self) -> Result<String> {
        url_from_path(&self.root, &self.entrypoint)
    }

    pub fn shell_url(&self) -> Result<Option<String>> {
        self.shell.as_deref().map(|shell| url_from_path(&self.root, shell)).transpose()
    }

    pub fn fragment_urls(&self) -> Result<Vec<String>> {
        self.fragments.iter().map(|fragment| url_from_path(&self.root, fragment)).collect()
    }
}
