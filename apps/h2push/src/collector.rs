use anyhow::{Context, Result};
use h2push_core::SourceFile;
use ignore::WalkBuilder;
use log::{debug, trace};
use rayon::prelude::*;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Walks `root` honouring ignore files and returns every regular file,
/// sorted by path. `skip` is left out, so a previous manifest is never fed
/// back into the stage.
pub fn collect_paths(root: &Path, skip: &Path) -> Result<Vec<PathBuf>> {
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .filter_entry(|e| e.file_name() != ".git")
        .build();

    let mut paths = Vec::new();
    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }
        if p == skip {
            trace!("Skipping previous manifest: {}", p.display());
            continue;
        }
        paths.push(p.to_path_buf());
    }
    paths.sort();
    debug!("Collected {} files", paths.len());
    Ok(paths)
}

/// Reads every path in parallel.
pub fn read_files(paths: &[PathBuf]) -> Result<Vec<SourceFile>> {
    paths
        .par_iter()
        .map(|p| {
            let contents = fs::read(p).with_context(|| format!("reading {}", p.display()))?;
            Ok(SourceFile::new(p.clone(), contents))
        })
        .collect()
}

pub fn collect_files(root: &Path, skip: &Path) -> Result<Vec<SourceFile>> {
    let paths = collect_paths(root, skip)?;
    read_files(&paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, contents: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    #[test]
    fn test_collect_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "index.html", "<p>hi</p>");
        write(root, "src/app.js", "export {}");
        write(root, "push-manifest.json", "{}");

        let files = collect_files(root, &root.join("push-manifest.json")).unwrap();
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![root.join("index.html"), root.join("src/app.js")]);
        assert_eq!(&*files[0].contents, b"<p>hi</p>");
    }

    #[test]
    fn test_collect_skips_git_dir() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, ".git/HEAD", "ref: refs/heads/main");
        write(root, ".well-known/assetlinks.json", "[]");

        let paths = collect_paths(root, &root.join("push-manifest.json")).unwrap();
        assert_eq!(paths, vec![root.join(".well-known/assetlinks.json")]);
    }

    #[test]
    fn test_read_missing_file_fails() {
        let err = read_files(&[PathBuf::from("/definitely/not/here.html")]).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.html"));
    }
}
