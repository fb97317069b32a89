//! Analyzer stub returning synthetic import edges.

use h2push_core::{Analysis, Analyzer, Document, DocumentError, ImportEdge};
use std::{collections::HashMap, sync::Mutex};

#[derive(Default)]
pub(crate) struct StubAnalyzer {
    documents: HashMap<String, Result<Document, DocumentError>>,
    requests: Mutex<Vec<String>>,
}

impl StubAnalyzer {
    pub(crate) fn with_document(self, url: &str, imports: Vec<ImportEdge>) -> Self {
        self.with_document_and_imported(url, imports, Vec::new())
    }

    pub(crate) fn with_document_and_imported(
        mut self,
        url: &str,
        imports: Vec<ImportEdge>,
        imported: Vec<ImportEdge>,
    ) -> Self {
        let document = Document::new(url, imports).with_imported(imported);
        self.documents.insert(url.to_string(), Ok(document));
        self
    }

    pub(crate) fn with_error(mut self, url: &str, error: DocumentError) -> Self {
        self.documents.insert(url.to_string(), Err(error));
        self
    }

    /// URLs analyzed so far, in call order.
    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

impl Analyzer for StubAnalyzer {
    async fn analyze(&self, urls: &[String]) -> Analysis {
        if let Ok(mut requests) = self.requests.lock() {
            requests.extend(urls.iter().cloned());
        }
        let mut analysis = Analysis::default();
        for url in urls {
            if let Some(document) = self.documents.get(url) {
                analysis.insert(url.clone(), document.clone());
            }
        }
        analysis
    }
}
