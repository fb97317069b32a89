use std::collections::{BTreeSet, HashMap};

use thiserror::Error;

/// Import-kind tag for a CSS `@import` rule.
pub const KIND_CSS_IMPORT: &str = "css-import";
/// Import-kind tag for a CSS `url(...)` reference.
pub const KIND_CSS_URL: &str = "css-url";
/// Import-kind tag for `<link rel="import">`.
pub const KIND_HTML_IMPORT: &str = "html-import";
/// Import-kind tag for `<script src>`.
pub const KIND_HTML_SCRIPT: &str = "html-script";
/// Import-kind tag for `<link rel="stylesheet">`.
pub const KIND_HTML_STYLE: &str = "html-style";
/// Import-kind tag for any other `src`/`href` reference in HTML.
pub const KIND_HTML_REF: &str = "html-ref";
/// Import-kind tag for JavaScript `import`, `import()` and `require()`.
pub const KIND_JS_IMPORT: &str = "js-import";

/// A reference from one document to another resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportEdge {
    pub url: String,
    pub kinds: BTreeSet<String>,
    /// Whether the target lives inside a third-party package directory.
    pub external: bool,
}

impl ImportEdge {
    pub fn new(url: impl Into<String>, kind: &str) -> Self {
        Self { url: url.into(), kinds: BTreeSet::from([kind.to_string()]), external: false }
    }

    pub fn has_kind(&self, kind: &str) -> bool {
        self.kinds.contains(kind)
    }
}

/// Which edges [`Document::features`] should return.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureQuery {
    /// Include edges pointing into `node_modules/` or `bower_components/`.
    pub external_packages: bool,
    /// Include edges surfaced by the document's direct imports (one hop).
    pub imported: bool,
}

/// A parsed document together with the references it makes.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub url: String,
    pub imports: Vec<ImportEdge>,
    pub imported: Vec<ImportEdge>,
}

impl Document {
    pub fn new(url: impl Into<String>, imports: Vec<ImportEdge>) -> Self {
        Self { url: url.into(), imports, imported: Vec::new() }
    }

    pub fn with_imported(mut self, imported: Vec<ImportEdge>) -> Self {
        self.imported = imported;
        self
    }

    /// Edges of this document, in source order, optionally followed by the
    /// edges of the documents it imports directly.
    pub fn features(&self, query: FeatureQuery) -> Vec<ImportEdge> {
        let own = self.imports.iter();
        let hop = self.imported.iter().filter(|_| query.imported);
        own.chain(hop).filter(|edge| query.external_packages || !edge.external).cloned().collect()
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("no such file: {0}")]
    NotFound(String),
    #[error("unsupported document type: {0}")]
    Unsupported(String),
    #[error("failed to parse {url}: {message}")]
    Parse { url: String, message: String },
}

/// Result of one [`crate::Analyzer::analyze`] call.
#[derive(Debug, Clone, Default)]
pub struct Analysis {
    documents: HashMap<String, Result<Document, DocumentError>>,
}

impl Analysis {
    pub fn insert(&mut self, url: impl Into<String>, document: Result<Document, DocumentError>) {
        self.documents.insert(url.into(), document);
    }

    pub fn get_document(&self, url: &str) -> Result<&Document, DocumentError> {
        match self.documents.get(url) {
            Some(Ok(document)) => Ok(document),
            Some(Err(e)) => Err(e.clone()),
            None => Err(DocumentError::NotFound(url.to_string())),
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
