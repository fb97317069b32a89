//! Tables driving resource classification and manifest output.

use crate::types::ResourceType;

/// File name of the emitted manifest, relative to the project root
pub const DEFAULT_OUT_PATH: &str = "push-manifest.json";

/// Resource type implied by a file extension
pub const EXTENSION_TYPES: &[(&str, ResourceType)] = &[
    ("css", ResourceType::Style),
    ("gif", ResourceType::Image),
    ("html", ResourceType::Document),
    ("jpg", ResourceType::Image),
    ("js", ResourceType::Script),
    ("json", ResourceType::Script),
    ("png", ResourceType::Image),
    ("svg", ResourceType::Image),
    ("webp", ResourceType::Image),
    ("woff", ResourceType::Font),
    ("woff2", ResourceType::Font),
];
