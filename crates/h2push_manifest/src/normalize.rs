use h2push_core::url;
use log::{debug, warn};

use crate::types::{PushManifest, PushManifestEntryCollection};

/// Rewrites `resource_url` into the relative form used in the emitted
/// manifest: POSIX-joined onto `base_path`, with no leading slash.
///
/// With an empty base path the rewrite is idempotent. A non-empty base is
/// prefixed on every call, so `/static/x.js` under base `static` becomes
/// `static/static/x.js` and stays distinct from `/x.js`.
pub fn normalize_url(resource_url: &str, base_path: &str) -> String {
    let joined = url::join(&[base_path, resource_url]);
    let path = joined.trim_start_matches('/');
    if path == "." { String::new() } else { path.to_string() }
}

/// Applies [`normalize_url`] to every entry URL and every resource URL.
///
/// When two URLs normalise to the same key the first one is kept and the
/// collision is logged.
pub fn normalize_manifest(manifest: &PushManifest, base_path: &str) -> PushManifest {
    debug!("Normalizing {} manifest entries with base path '{}'", manifest.len(), base_path);
    let mut normalized = PushManifest::default();

    for (entry_url, collection) in manifest.iter() {
        let mut resources = PushManifestEntryCollection::new();
        for (resource_url, entry) in collection {
            let url = normalize_url(resource_url, base_path);
            if resources.contains_key(&url) {
                warn!(
                    "Dropping {} from {}: it normalizes to {} like another resource",
                    resource_url, entry_url, url
                );
                continue;
            }
            resources.insert(url, entry.clone());
        }

        let key = normalize_url(entry_url, base_path);
        if normalized.get(&key).is_some() {
            warn!("Dropping entry {}: it normalizes to {} like another entry", entry_url, key);
            continue;
        }
        normalized.insert(key, resources);
    }

    normalized
}
