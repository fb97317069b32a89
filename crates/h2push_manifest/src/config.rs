use anyhow::{Result, anyhow};
use clap::Parser;
use h2push_core::ProjectConfig;
use log::{debug, info};
use std::path::{Path, PathBuf};

use crate::constants::DEFAULT_OUT_PATH;

/// Project file picked up from the root when `--config` is not given.
pub const DEFAULT_PROJECT_FILE: &str = "polymer.json";

/// Output options of the manifest stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageOptions {
    /// Prefix applied to every URL in the emitted manifest.
    pub base_path: String,
    /// Manifest location, relative to the project root.
    pub out_path: PathBuf,
}

impl Default for StageOptions {
    fn default() -> Self {
        Self { base_path: String::new(), out_path: PathBuf::from(DEFAULT_OUT_PATH) }
    }
}

#[derive(Debug, Clone, Parser)]
#[command(name = "push-manifest")]
#[command(about = "Generate an HTTP/2 server push manifest for a web application")]
pub struct Config {
    /// Root directory of the project (defaults to the project file's directory, then git root)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Project file listing entrypoint, shell and fragments (defaults to <root>/polymer.json)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Base path prepended to every URL in the manifest
    #[arg(long, default_value = "")]
    pub base_path: String,

    /// Manifest file name, relative to the root
    #[arg(long, default_value = DEFAULT_OUT_PATH)]
    pub out_path: PathBuf,

    /// Entrypoint document, overriding the project file
    #[arg(long)]
    pub entrypoint: Option<PathBuf>,

    /// App shell document, overriding the project file
    #[arg(long)]
    pub shell: Option<PathBuf>,

    /// Fragment document; repeat for several, replaces the project file's list
    #[arg(long = "fragment")]
    pub fragments: Vec<PathBuf>,

    /// Print the manifest instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}

impl Config {
    /// Resolves the project root and loads the project configuration,
    /// applying command-line overrides on top.
    pub fn project(&self) -> Result<ProjectConfig> {
        let config_path = match (&self.config, &self.root) {
            (Some(path), _) => Some(path.clone()),
            (None, Some(root)) => Some(root.join(DEFAULT_PROJECT_FILE)).filter(|p| p.is_file()),
            (None, None) => None,
        };

        let mut project = match &config_path {
            Some(path) => ProjectConfig::load(path)?,
            None => ProjectConfig::new(self.default_root()?),
        };

        if let Some(root) = &self.root {
            debug!("Using provided root directory: {:?}", root);
            project.root = root.clone();
        }
        project.root = project.root.canonicalize().unwrap_or(project.root);
        info!("Using root directory: {}", project.root.display());

        if let Some(entrypoint) = &self.entrypoint {
            project.entrypoint = entrypoint.clone();
        }
        if let Some(shell) = &self.shell {
            project.shell = Some(shell.clone());
        }
        if !self.fragments.is_empty() {
            project.fragments = self.fragments.clone();
        }

        debug!(
            "Project: entrypoint={:?}, shell={:?}, fragments={:?}",
            project.entrypoint, project.shell, project.fragments
        );
        Ok(project)
    }

    pub fn options(&self) -> StageOptions {
        StageOptions { base_path: self.base_path.clone(), out_path: self.out_path.clone() }
    }

    fn default_root(&self) -> Result<PathBuf> {
        if let Some(root) = &self.root {
            return Ok(root.clone());
        }
        debug!("No root provided, searching for git root");
        h2push_core::find_git_root()
            .map_err(|e| anyhow!("{e}; pass --root to choose the project directory"))
    }
}

/// Absolute location of the manifest for `project`.
pub fn manifest_path(project: &ProjectConfig, options: &StageOptions) -> PathBuf {
    project.root.join(Path::new(&options.out_path))
}
