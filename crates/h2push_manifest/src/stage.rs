use h2push_core::{Analyzer, FileSnapshot, ProjectConfig, SourceFile, VirtualFileSet};
use log::{debug, info, trace, warn};
use std::path::PathBuf;
use tokio::sync::mpsc;

use crate::{
    builder::build_manifest,
    config::{StageOptions, manifest_path},
    error::ManifestError,
    normalize::normalize_manifest,
    types::PushManifest,
};

/// Pipeline stage that passes every file through and, once the input is
/// exhausted, emits one extra file holding the push manifest.
///
/// Files are only recorded while they arrive. Generation consumes the
/// stage, so the file set is frozen before any document is analyzed.
pub struct PushManifestStage {
    project: ProjectConfig,
    options: StageOptions,
    files: VirtualFileSet,
}

impl PushManifestStage {
    pub fn new(project: ProjectConfig, options: StageOptions) -> Self {
        let files = VirtualFileSet::new(project.root.clone());
        Self { project, options, files }
    }

    pub fn project(&self) -> &ProjectConfig {
        &self.project
    }

    pub fn files_observed(&self) -> usize {
        self.files.len()
    }

    /// Where the manifest file is emitted.
    pub fn manifest_path(&self) -> PathBuf {
        manifest_path(&self.project, &self.options)
    }

    /// Records `file` and hands it back unchanged for forwarding.
    pub fn observe(&mut self, file: SourceFile) -> SourceFile {
        if let Err(e) = self.files.insert(&file) {
            warn!("Not tracking {}: {}", file.path.display(), e);
        }
        file
    }

    /// Builds and normalises the manifest from the files observed so far.
    pub async fn generate<A, F>(self, make_analyzer: F) -> Result<PushManifest, ManifestError>
    where
        A: Analyzer,
        F: FnOnce(FileSnapshot) -> A,
    {
        let snapshot = self.files.freeze();
        debug!("Generating push manifest from {} files", snapshot.len());
        let analyzer = make_analyzer(snapshot);
        let raw = build_manifest(&analyzer, &self.project).await?;
        Ok(normalize_manifest(&raw, &self.options.base_path))
    }

    /// Generates the manifest and wraps it as the synthetic output file.
    pub async fn finish<A, F>(self, make_analyzer: F) -> Result<SourceFile, ManifestError>
    where
        A: Analyzer,
        F: FnOnce(FileSnapshot) -> A,
    {
        let path = self.manifest_path();
        let manifest = self.generate(make_analyzer).await?;
        let json = manifest.to_json()?;
        info!(
            "Push manifest with {} entries and {} resources written to {}",
            manifest.len(),
            manifest.resource_count(),
            path.display()
        );
        Ok(SourceFile::new(path, json))
    }

    /// Non-streaming form: the input files followed by the manifest file.
    pub async fn process<A, F>(
        mut self,
        files: Vec<SourceFile>,
        make_analyzer: F,
    ) -> Result<Vec<SourceFile>, ManifestError>
    where
        A: Analyzer,
        F: FnOnce(FileSnapshot) -> A,
    {
        let mut out: Vec<SourceFile> = files.into_iter().map(|file| self.observe(file)).collect();
        out.push(self.finish(make_analyzer).await?);
        Ok(out)
    }

    /// Streaming form: forwards files from `rx` to `tx` as they arrive and
    /// sends the manifest file once `rx` is closed.
    ///
    /// On failure nothing further is sent.
    pub async fn run<A, F>(
        mut self,
        mut rx: mpsc::Receiver<SourceFile>,
        tx: mpsc::Sender<SourceFile>,
        make_analyzer: F,
    ) -> Result<(), ManifestError>
    where
        A: Analyzer,
        F: FnOnce(FileSnapshot) -> A,
    {
        while let Some(file) = rx.recv().await {
            trace!("Received {}", file.path.display());
            let file = self.observe(file);
            tx.send(file).await.map_err(|_| ManifestError::Closed)?;
        }
        debug!("Input exhausted after {} files", self.files_observed());

        let manifest_file = self.finish(make_analyzer).await?;
        tx.send(manifest_file).await.map_err(|_| ManifestError::Closed)?;
        Ok(())
    }
}
