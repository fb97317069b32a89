use h2push_core::{Analyzer, FeatureQuery};
use log::{debug, trace};
use std::collections::{HashSet, btree_map::Entry};

use crate::{
    classifier::classify_import,
    error::ResolutionError,
    types::{PushManifestEntry, PushManifestEntryCollection},
};

/// Collects the resources to push alongside `entry_url`.
///
/// URLs in `ignore_urls` are skipped. When the same URL is imported more
/// than once, the first import decides its classification.
pub async fn resolve_entry<A: Analyzer>(
    analyzer: &A,
    entry_url: &str,
    ignore_urls: &[String],
) -> Result<PushManifestEntryCollection, ResolutionError> {
    trace!("Resolving entry: {}", entry_url);
    let analysis = analyzer.analyze(&[entry_url.to_string()]).await;
    let document = analysis
        .get_document(entry_url)
        .map_err(|e| ResolutionError { url: entry_url.to_string(), message: e.to_string() })?;

    let ignored: HashSet<&str> = ignore_urls.iter().map(String::as_str).collect();
    let edges = document.features(FeatureQuery { external_packages: true, imported: true });
    debug!("Entry {} has {} import edges", entry_url, edges.len());

    let mut collection = PushManifestEntryCollection::new();
    for edge in edges {
        if ignored.contains(edge.url.as_str()) {
            trace!("Ignoring {} for {}", edge.url, entry_url);
            continue;
        }
        if let Entry::Vacant(slot) = collection.entry(edge.url.clone()) {
            let resource_type = classify_import(&edge);
            trace!("Adding {} as {:?}", edge.url, resource_type);
            slot.insert(PushManifestEntry::new(resource_type));
        }
    }

    debug!("Resolved {} resources for {}", collection.len(), entry_url);
    Ok(collection)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::StubAnalyzer;
    use crate::types::ResourceType;
    use h2push_core::{ImportEdge, KIND_CSS_IMPORT, KIND_HTML_IMPORT, KIND_HTML_SCRIPT};

    #[tokio::test]
    async fn test_resolve_entry_classifies_edges() {
        let analyzer = StubAnalyzer::default().with_document(
            "/index.html",
            vec![
                ImportEdge::new("/css/app.css", KIND_CSS_IMPORT),
                ImportEdge::new("/js/app.js", KIND_HTML_SCRIPT),
                ImportEdge::new("/data/blob.bin", "html-ref"),
            ],
        );

        let collection = resolve_entry(&analyzer, "/index.html", &[]).await.unwrap();
        assert_eq!(collection.len(), 3);
        assert_eq!(collection["/css/app.css"].resource_type, Some(ResourceType::Style));
        assert_eq!(collection["/js/app.js"].resource_type, Some(ResourceType::Script));
        assert_eq!(collection["/data/blob.bin"].resource_type, None);
        assert!(collection.values().all(|entry| entry.weight.is_some()));
    }

    #[tokio::test]
    async fn test_first_import_wins() {
        let analyzer = StubAnalyzer::default().with_document(
            "/index.html",
            vec![
                ImportEdge::new("/widget.js", KIND_HTML_IMPORT),
                ImportEdge::new("/widget.js", KIND_HTML_SCRIPT),
            ],
        );

        let collection = resolve_entry(&analyzer, "/index.html", &[]).await.unwrap();
        assert_eq!(collection.len(), 1);
        assert_eq!(collection["/widget.js"].resource_type, Some(ResourceType::Document));
    }

    #[tokio::test]
    async fn test_ignore_urls() {
        let analyzer = StubAnalyzer::default().with_document(
            "/view.html",
            vec![
                ImportEdge::new("/shared.css", KIND_CSS_IMPORT),
                ImportEdge::new("/view.js", KIND_HTML_SCRIPT),
            ],
        );

        let ignore = vec!["/shared.css".to_string()];
        let collection = resolve_entry(&analyzer, "/view.html", &ignore).await.unwrap();
        assert_eq!(collection.keys().collect::<Vec<_>>(), vec!["/view.js"]);
    }

    #[tokio::test]
    async fn test_includes_imported_edges() {
        let analyzer = StubAnalyzer::default().with_document_and_imported(
            "/index.html",
            vec![ImportEdge::new("/app.html", KIND_HTML_IMPORT)],
            vec![ImportEdge::new("/app.css", KIND_CSS_IMPORT)],
        );

        let collection = resolve_entry(&analyzer, "/index.html", &[]).await.unwrap();
        assert_eq!(collection.len(), 2);
        assert_eq!(collection["/app.css"].resource_type, Some(ResourceType::Style));
    }

    #[tokio::test]
    async fn test_missing_document() {
        let analyzer = StubAnalyzer::default();
        let err = resolve_entry(&analyzer, "/missing.html", &[]).await.unwrap_err();
        assert_eq!(err.url, "/missing.html");
        assert!(err.to_string().starts_with("Unable to get document /missing.html"));
    }
}
