//! HTTP/2 server push manifest generation.
//!
//! This crate maps each application entry document (the app shell and its
//! lazily loaded fragments) to the resources a server should push when that
//! document is requested, classifying each resource by type.
//!
//! # Examples
//!
//! ## Basic Usage
//!
//! ```no_run
//! use h2push_core::{ProjectConfig, SourceAnalyzer, SourceFile};
//! use h2push_manifest::{PushManifestStage, StageOptions};
//!
//! # async fn run() -> anyhow::Result<()> {
//! let project = ProjectConfig::new("/path/to/app").with_shell("src/my-app.html");
//! let stage = PushManifestStage::new(project, StageOptions::default());
//!
//! let files = vec![
//!     SourceFile::new("/path/to/app/src/my-app.html", "<link rel=\"stylesheet\" href=\"app.css\">"),
//!     SourceFile::new("/path/to/app/src/app.css", "body { margin: 0 }"),
//! ];
//!
//! // The input files come back unchanged, followed by push-manifest.json.
//! let out = stage.process(files, SourceAnalyzer::new).await?;
//! println!("{}", String::from_utf8_lossy(&out[out.len() - 1].contents));
//! # Ok(())
//! # }
//! ```

mod builder;
mod classifier;
mod config;
mod constants;
mod error;
mod normalize;
mod reporter;
mod resolver;
mod stage;
#[cfg(test)]
mod testutil;
mod types;

// Re-export public API
pub use builder::build_manifest;
pub use classifier::{classify_by_extension, classify_import};
pub use config::{Config, DEFAULT_PROJECT_FILE, StageOptions, manifest_path};
pub use constants::{DEFAULT_OUT_PATH, EXTENSION_TYPES};
pub use error::{ManifestError, ResolutionError};
pub use normalize::{normalize_manifest, normalize_url};
pub use reporter::{print_empty_manifest_message, print_manifest_tree};
pub use resolver::resolve_entry;
pub use stage::PushManifestStage;
pub use types::{PushManifest, PushManifestEntry, PushManifestEntryCollection, ResourceType, Weight};
