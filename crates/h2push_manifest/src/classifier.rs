use h2push_core::{
    ImportEdge, KIND_CSS_IMPORT, KIND_HTML_IMPORT, KIND_HTML_SCRIPT, KIND_HTML_STYLE, url,
};
use log::trace;

use crate::{constants::EXTENSION_TYPES, types::ResourceType};

/// Looks the URL's file extension up in the fixed extension table.
pub fn classify_by_extension(resource_url: &str) -> Option<ResourceType> {
    let ext = url::extension(resource_url)?;
    let found = EXTENSION_TYPES.iter().find(|(known, _)| *known == ext).map(|(_, ty)| *ty);
    if found.is_none() {
        trace!("No resource type for extension '{}' of {}", ext, resource_url);
    }
    found
}

/// Classifies an import edge by its kind tags, falling back to the
/// extension for generic imports.
pub fn classify_import(edge: &ImportEdge) -> Option<ResourceType> {
    if edge.has_kind(KIND_CSS_IMPORT) || edge.has_kind(KIND_HTML_STYLE) {
        Some(ResourceType::Style)
    } else if edge.has_kind(KIND_HTML_IMPORT) {
        Some(ResourceType::Document)
    } else if edge.has_kind(KIND_HTML_SCRIPT) {
        Some(ResourceType::Script)
    } else {
        classify_by_extension(&edge.url)
    }
}
