use h2push_core::{Analyzer, ProjectConfig};
use log::{debug, info, trace};

use crate::{error::ManifestError, resolver::resolve_entry, types::PushManifest};

/// Builds the raw (unnormalised) push manifest for a project.
///
/// The shell, or the entrypoint when no shell is configured, is resolved
/// first. Fragments are then resolved in order, skipping the shell itself
/// and everything the shell already pushes. Any resolution failure aborts
/// the build.
pub async fn build_manifest<A: Analyzer>(
    analyzer: &A,
    project: &ProjectConfig,
) -> Result<PushManifest, ManifestError> {
    let shell_url = match project.shell_url()? {
        Some(shell) => shell,
        None => project.entrypoint_url()?,
    };
    let fragment_urls = project.fragment_urls()?;
    info!("Building push manifest for {} and {} fragments", shell_url, fragment_urls.len());

    let mut manifest = PushManifest::default();

    let shell_deps = resolve_entry(analyzer, &shell_url, &[]).await?;
    debug!("Shell {} pushes {} resources", shell_url, shell_deps.len());

    let mut fragment_ignore_urls = Vec::with_capacity(shell_deps.len() + 1);
    fragment_ignore_urls.push(shell_url.clone());
    fragment_ignore_urls.extend(shell_deps.keys().cloned());
    manifest.insert(shell_url, shell_deps);

    for fragment_url in fragment_urls {
        trace!("Resolving fragment: {}", fragment_url);
        let fragment_deps = resolve_entry(analyzer, &fragment_url, &fragment_ignore_urls).await?;
        debug!("Fragment {} pushes {} resources", fragment_url, fragment_deps.len());
        manifest.insert(fragment_url, fragment_deps);
    }

    Ok(manifest)
}
