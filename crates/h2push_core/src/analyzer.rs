use dashmap::DashMap;
use log::{debug, trace};
use std::{collections::HashSet, future::Future, sync::Arc};

use crate::{
    parser::{SourceKind, references_for},
    types::{Analysis, Document, DocumentError, ImportEdge},
};

/// Resolves URLs to file contents for the analyzer.
pub trait Loader: Send + Sync {
    fn load(&self, url: &str) -> Option<Arc<[u8]>>;
}

/// Parses documents and reports the references they make.
pub trait Analyzer: Send + Sync {
    /// Analyzes every URL in `urls`. Failures are recorded per document in
    /// the returned [`Analysis`] rather than failing the whole call.
    fn analyze(&self, urls: &[String]) -> impl Future<Output = Analysis> + Send;
}

/// [`Analyzer`] over HTML, CSS and JavaScript sources served by a [`Loader`].
pub struct SourceAnalyzer<L> {
    loader: L,
    cache: DashMap<String, Result<Vec<ImportEdge>, DocumentError>>,
}

impl<L: Loader> SourceAnalyzer<L> {
    pub fn new(loader: L) -> Self {
        Self { loader, cache: DashMap::new() }
    }

    /// Number of documents parsed so far.
    pub fn documents_parsed(&self) -> usize {
        self.cache.len()
    }

    fn references(&self, url: &str) -> Result<Vec<ImportEdge>, DocumentError> {
        if let Some(v) = self.cache.get(url) {
            trace!("Cache hit for references: {}", url);
            return v.clone();
        }

        let result = self.parse(url);
        self.cache.insert(url.to_string(), result.clone());
        result
    }

    fn parse(&self, url: &str) -> Result<Vec<ImportEdge>, DocumentError> {
        let contents =
            self.loader.load(url).ok_or_else(|| DocumentError::NotFound(url.to_string()))?;
        let src = std::str::from_utf8(&contents).map_err(|e| DocumentError::Parse {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        references_for(url, src)
    }

    fn document(&self, url: &str) -> Result<Document, DocumentError> {
        let imports = self.references(url)?;

        // One hop: the references of each directly imported document.
        let mut seen: HashSet<&str> = HashSet::from([url]);
        let mut imported = Vec::new();
        for edge in &imports {
            if !seen.insert(edge.url.as_str()) || SourceKind::for_url(&edge.url).is_none() {
                continue;
            }
            match self.references(&edge.url) {
                Ok(edges) => imported.extend(edges),
                Err(e) => trace!("Not following {} from {}: {}", edge.url, url, e),
            }
        }

        debug!("{} has {} direct and {} imported references", url, imports.len(), imported.len());
        Ok(Document::new(url, imports).with_imported(imported))
    }
}

impl<L: Loader> Analyzer for SourceAnalyzer<L> {
    async fn analyze(&self, urls: &[String]) -> Analysis {
        let mut analysis = Analysis::default();
        for url in urls {
            analysis.insert(url.clone(), self.document(url));
        }
        analysis
    }
}
