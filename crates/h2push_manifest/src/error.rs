use thiserror::Error;

/// The analyzer could not produce a document for an entry URL.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Unable to get document {url}: {message}")]
pub struct ResolutionError {
    pub url: String,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("failed to serialize push manifest")]
    Serialize(#[from] serde_json::Error),
    #[error("output stream closed before the push manifest was emitted")]
    Closed,
    #[error(transparent)]
    Config(#[from] anyhow::Error),
}
