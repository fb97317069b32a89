use anyhow::{Context, Result};
use h2push_core::{SourceAnalyzer, SourceFile};
use h2push_manifest::{Config, PushManifest, PushManifestStage};
use log::{debug, info};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tokio::sync::mpsc;

use crate::collector;

const CHANNEL_CAPACITY: usize = 64;

/// Manifest produced by one run, before it is written.
pub struct ManifestRun {
    pub manifest: PushManifest,
    pub contents: Vec<u8>,
    pub manifest_path: PathBuf,
    pub files_read: usize,
}

/// Streams `files` through the stage and collects everything it emits.
pub async fn stream(stage: PushManifestStage, files: Vec<SourceFile>) -> Result<Vec<SourceFile>> {
    let (in_tx, in_rx) = mpsc::channel(CHANNEL_CAPACITY);
    let (out_tx, mut out_rx) = mpsc::channel(CHANNEL_CAPACITY);

    let producer = tokio::spawn(async move {
        for file in files {
            if in_tx.send(file).await.is_err() {
                break;
            }
        }
    });
    let stage = tokio::spawn(stage.run(in_rx, out_tx, SourceAnalyzer::new));

    let mut out = Vec::new();
    while let Some(file) = out_rx.recv().await {
        out.push(file);
    }

    producer.await?;
    stage.await??;
    Ok(out)
}

/// Loads the project, reads its files and generates the manifest.
pub fn generate(cfg: &Config) -> Result<ManifestRun> {
    let project = cfg.project()?;
    let stage = PushManifestStage::new(project.clone(), cfg.options());
    let manifest_path = stage.manifest_path();

    info!(
        "Reading sources from {} (using {} threads)",
        project.root.display(),
        rayon::current_num_threads()
    );
    let files = collector::collect_files(&project.root, &manifest_path)?;
    let files_read = files.len();

    let runtime = tokio::runtime::Runtime::new()?;
    let out = runtime.block_on(stream(stage, files))?;
    debug!("Stage emitted {} files", out.len());

    let manifest_file = out
        .into_iter()
        .find(|f| f.path == manifest_path)
        .context("stage finished without emitting a manifest")?;
    let manifest = PushManifest::from_json(std::str::from_utf8(&manifest_file.contents)?)?;

    Ok(ManifestRun {
        manifest,
        contents: manifest_file.contents.to_vec(),
        manifest_path,
        files_read,
    })
}

/// Writes the manifest to disk, or to `writer` on a dry run. Returns where
/// it was written.
pub fn emit<'a, W: Write>(
    run: &'a ManifestRun,
    dry_run: bool,
    writer: &mut W,
) -> Result<Option<&'a Path>> {
    if dry_run {
        writer.write_all(&run.contents)?;
        writeln!(writer)?;
        return Ok(None);
    }

    if let Some(parent) = run.manifest_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&run.manifest_path, &run.contents)
        .with_context(|| format!("writing {}", run.manifest_path.display()))?;
    Ok(Some(&run.manifest_path))
}
