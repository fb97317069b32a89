//! URL helpers shared by the analyzer and the manifest builder.
//!
//! All URLs handled here are project-absolute paths with POSIX separators
//! (`/index.html`, `/css/app.css`), independent of the host platform.

use anyhow::{Result, anyhow};
use log::trace;
use path_clean::PathClean;
use std::path::{Component, Path};

use crate::constants::EXTERNAL_PACKAGE_DIRS;

/// Converts a file path into the project-absolute URL it is served at.
///
/// Relative paths are taken relative to `root`. Paths that escape the root
/// are rejected.
pub fn url_from_path(root: &Path, path: &Path) -> Result<String> {
    let mut root = root.clean();
    if path.is_absolute() && root.is_relative() {
        root = std::path::absolute(&root)?.clean();
    }
    let full = if path.is_absolute() { path.clean() } else { root.join(path).clean() };
    // A cleaned "." (or empty) root leaves relative paths without a prefix.
    let relative = if root == Path::new(".") {
        full.as_path()
    } else {
        full.strip_prefix(&root).map_err(|_| {
            anyhow!("{} is not inside project root {}", full.display(), root.display())
        })?
    };

    let mut url = String::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => {
                url.push('/');
                url.push_str(&segment.to_string_lossy());
            }
            Component::CurDir => {}
            _ => return Err(anyhow!("{} cannot be expressed as a URL", path.display())),
        }
    }
    if url.is_empty() {
        url.push('/');
    }
    trace!("Mapped {} to URL {}", path.display(), url);
    Ok(url)
}

/// POSIX path normalisation: collapses `.`, `..` and repeated slashes.
pub fn normalize(path: &str) -> String {
    if path.is_empty() {
        return ".".to_string();
    }
    let absolute = path.starts_with('/');
    let trailing = path.ends_with('/');

    let mut parts: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|p| *p != "..") {
                    parts.pop();
                } else if !absolute {
                    parts.push("..");
                }
            }
            s => parts.push(s),
        }
    }

    let joined = parts.join("/");
    let mut out = if absolute { format!("/{joined}") } else { joined };
    if out.is_empty() {
        return ".".to_string();
    }
    if trailing && !out.ends_with('/') {
        out.push('/');
    }
    out
}

/// POSIX path join: concatenates the non-empty segments and normalises.
pub fn join(segments: &[&str]) -> String {
    let joined =
        segments.iter().filter(|s| !s.is_empty()).copied().collect::<Vec<_>>().join("/");
    normalize(&joined)
}

/// True for references that never resolve to a project file.
pub fn is_remote(href: &str) -> bool {
    if href.starts_with("//") || href.starts_with('#') {
        return true;
    }
    // A scheme is whatever precedes the first ':' when no '/' comes before it.
    match href.find(':') {
        Some(idx) => !href[..idx].contains('/'),
        None => false,
    }
}

pub fn is_external_package(url: &str) -> bool {
    url.split('/').any(|segment| EXTERNAL_PACKAGE_DIRS.contains(&segment))
}

/// Resolves `href` as written inside the document at `base_url`.
///
/// Query strings and fragments are dropped. Remote and empty references
/// yield `None`.
pub fn resolve_reference(base_url: &str, href: &str) -> Option<String> {
    let href = href.trim();
    let href = href.split(['?', '#']).next().unwrap_or_default();
    if href.is_empty() || is_remote(href) {
        return None;
    }
    if href.starts_with('/') {
        return Some(normalize(href));
    }
    let dir = match base_url.rfind('/') {
        Some(idx) => &base_url[..=idx],
        None => "/",
    };
    Some(normalize(&format!("{dir}{href}")))
}

/// Extension of the last path segment, without the dot.
pub fn extension(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let name = path.rsplit('/').next().unwrap_or(path);
    let (stem, ext) = name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_string())
}
