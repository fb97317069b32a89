//! Core utilities for h2push tools.
//!
//! This crate provides the document analysis the push-manifest generator
//! builds on, including:
//! - Extracting references from HTML, CSS and JavaScript sources
//! - An in-memory file set that the analyzer loads documents from
//! - Mapping file paths to project URLs and normalising those URLs
//! - Reading the project configuration (entrypoint, shell, fragments)

mod analyzer;
mod config;
mod constants;
mod parser;
mod types;
pub mod url;
mod vfs;

// Re-export public API
pub use analyzer::{Analyzer, Loader, SourceAnalyzer};
pub use config::{DEFAULT_ENTRYPOINT, ProjectConfig, find_git_root, find_git_root_from};
pub use constants::{
    CSS_EXTENSIONS, EXTERNAL_PACKAGE_DIRS, HTML_EXTENSIONS, JS_EXTENSIONS, JS_MIME_TYPES,
};
pub use parser::{SourceKind, references_for};
pub use types::{
    Analysis, Document, DocumentError, FeatureQuery, ImportEdge, KIND_CSS_IMPORT, KIND_CSS_URL,
    KIND_HTML_IMPORT, KIND_HTML_REF, KIND_HTML_SCRIPT, KIND_HTML_STYLE, KIND_JS_IMPORT,
};
pub use url::url_from_path;
pub use vfs::{FileSnapshot, SourceFile, VirtualFileSet};
