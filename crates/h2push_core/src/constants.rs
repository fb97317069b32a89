//! Constants for file extensions and package layout.
//!
//! Extension lists decide which files the analyzer is able to parse. The
//! resource-type table used for push classification lives in the manifest
//! crate, since it is a policy of the manifest rather than of parsing.

/// Extensions parsed as HTML documents
pub const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Extensions parsed as stylesheets
pub const CSS_EXTENSIONS: &[&str] = &["css"];

/// Extensions parsed as JavaScript modules or scripts
pub const JS_EXTENSIONS: &[&str] = &[
    "js",  // JavaScript
    "mjs", // JavaScript module
    "cjs", // JavaScript CommonJS
    "jsx", // JavaScript with JSX
];

/// Directory names holding third-party packages
pub const EXTERNAL_PACKAGE_DIRS: &[&str] = &["node_modules", "bower_components"];

/// `type` values of `<script>` elements that browsers run as classic
/// JavaScript. Anything else except `module` is a data block.
pub const JS_MIME_TYPES: &[&str] = &[
    "application/ecmascript",
    "application/javascript",
    "application/x-ecmascript",
    "application/x-javascript",
    "text/ecmascript",
    "text/javascript",
    "text/javascript1.0",
    "text/javascript1.1",
    "text/javascript1.2",
    "text/javascript1.3",
    "text/javascript1.4",
    "text/javascript1.5",
    "text/jscript",
    "text/livescript",
    "text/x-ecmascript",
    "text/x-javascript",
];
