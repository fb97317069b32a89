use log::{debug, trace};
use oxc_allocator::Allocator;
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::{
    constants::{CSS_EXTENSIONS, HTML_EXTENSIONS, JS_EXTENSIONS, JS_MIME_TYPES},
    types::{
        DocumentError, ImportEdge, KIND_CSS_IMPORT, KIND_CSS_URL, KIND_HTML_IMPORT, KIND_HTML_REF,
        KIND_HTML_SCRIPT, KIND_HTML_STYLE, KIND_JS_IMPORT,
    },
    url::{extension, is_external_package, resolve_reference},
};

static HTML_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)<!--.*?-->|<script\b([^>]*)>(.*?)</script\s*>|<style\b[^>]*>(.*?)</style\s*>|<([a-z][a-z0-9-]*)\b([^>]*)>",
    )
    .expect("valid html token regex")
});

static HTML_ATTR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)([a-z_:][-a-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("valid html attribute regex")
});

static CSS_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid css comment regex"));

static CSS_REFERENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?i)@import\s+(?:url\(\s*(?:"([^"]*)"|'([^']*)'|([^)\s]*))\s*\)|"([^"]*)"|'([^']*)')|url\(\s*(?:"([^"]*)"|'([^']*)'|([^)\s"']*))\s*\)"#,
    )
    .expect("valid css reference regex")
});

/// Elements whose `src` attribute loads a subresource.
const SRC_ELEMENTS: &[&str] = &["img", "source", "iframe", "embed", "video", "audio", "track"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Html,
    Css,
    Js,
}

impl SourceKind {
    pub fn for_url(url: &str) -> Option<Self> {
        let ext = extension(url)?.to_ascii_lowercase();
        let ext = ext.as_str();
        if HTML_EXTENSIONS.contains(&ext) {
            Some(Self::Html)
        } else if CSS_EXTENSIONS.contains(&ext) {
            Some(Self::Css)
        } else if JS_EXTENSIONS.contains(&ext) {
            Some(Self::Js)
        } else {
            None
        }
    }
}

/// Extracts the references made by the document at `url`.
pub fn references_for(url: &str, src: &str) -> Result<Vec<ImportEdge>, DocumentError> {
    let kind = SourceKind::for_url(url).ok_or_else(|| DocumentError::Unsupported(url.to_string()))?;
    trace!("Parsing {} as {:?}", url, kind);

    let edges = match kind {
        SourceKind::Html => html_references(url, src)?,
        SourceKind::Css => css_references(url, src),
        SourceKind::Js => js_references(url, src, false)?,
    };

    debug!("Found {} references in {}", edges.len(), url);
    Ok(edges)
}

fn edge(base_url: &str, href: &str, kind: &str) -> Option<ImportEdge> {
    let Some(url) = resolve_reference(base_url, href) else {
        trace!("Skipping non-local reference '{}' in {}", href, base_url);
        return None;
    };
    let external = is_external_package(&url);
    Some(ImportEdge { external, ..ImportEdge::new(url, kind) })
}

fn attribute(attrs: &str, name: &str) -> Option<String> {
    HTML_ATTR.captures_iter(attrs).find_map(|cap| {
        if !cap[1].eq_ignore_ascii_case(name) {
            return None;
        }
        let value = cap.get(2).or_else(|| cap.get(3)).or_else(|| cap.get(4))?;
        Some(value.as_str().to_string())
    })
}

/// How an inline `<script>` body is executed: `Some(true)` for modules,
/// `Some(false)` for classic scripts, `None` for data blocks such as JSON-LD
/// or client-side templates.
fn inline_script_mode(attrs: &str) -> Option<bool> {
    let ty = attribute(attrs, "type").unwrap_or_default();
    let essence = ty.split(';').next().unwrap_or_default().trim().to_ascii_lowercase();
    if essence.is_empty() || JS_MIME_TYPES.contains(&essence.as_str()) {
        Some(false)
    } else if essence == "module" {
        Some(true)
    } else {
        None
    }
}

fn first_group<'t>(cap: &Captures<'t>, groups: std::ops::RangeInclusive<usize>) -> Option<&'t str> {
    groups.into_iter().find_map(|i| cap.get(i)).map(|m| m.as_str())
}

fn html_references(url: &str, src: &str) -> Result<Vec<ImportEdge>, DocumentError> {
    let mut edges = Vec::new();

    for cap in HTML_TOKEN.captures_iter(src) {
        if let Some(script_attrs) = cap.get(1) {
            let script_attrs = script_attrs.as_str();
            if let Some(href) = attribute(script_attrs, "src") {
                edges.extend(edge(url, &href, KIND_HTML_SCRIPT));
                continue;
            }
            let body = cap.get(2).map(|m| m.as_str()).unwrap_or_default();
            if body.trim().is_empty() {
                continue;
            }
            match inline_script_mode(script_attrs) {
                Some(module) => {
                    trace!("Scanning inline script in {}", url);
                    edges.extend(js_references(url, body, module)?);
                }
                None => trace!("Skipping inline data block in {}", url),
            }
        } else if let Some(style_body) = cap.get(3) {
            trace!("Scanning inline style in {}", url);
            edges.extend(css_references(url, style_body.as_str()));
        } else if let Some(tag) = cap.get(4) {
            let tag = tag.as_str().to_ascii_lowercase();
            let attrs = cap.get(5).map(|m| m.as_str()).unwrap_or_default();

            if tag == "link" {
                let Some(href) = attribute(attrs, "href") else { continue };
                let rel = attribute(attrs, "rel").unwrap_or_default().to_ascii_lowercase();
                let rels: Vec<&str> = rel.split_whitespace().collect();
                let kind = if rels.contains(&"stylesheet") {
                    KIND_HTML_STYLE
                } else if rels.contains(&"import") {
                    KIND_HTML_IMPORT
                } else {
                    KIND_HTML_REF
                };
                edges.extend(edge(url, &href, kind));
            } else if SRC_ELEMENTS.contains(&tag.as_str())
                && let Some(href) = attribute(attrs, "src")
            {
                edges.extend(edge(url, &href, KIND_HTML_REF));
            }
        }
    }

    Ok(edges)
}

fn css_references(url: &str, src: &str) -> Vec<ImportEdge> {
    let src = CSS_COMMENT.replace_all(src, "");
    let mut edges = Vec::new();

    for cap in CSS_REFERENCE.captures_iter(&src) {
        if let Some(href) = first_group(&cap, 1..=5) {
            edges.extend(edge(url, href, KIND_CSS_IMPORT));
        } else if let Some(href) = first_group(&cap, 6..=8) {
            edges.extend(edge(url, href, KIND_CSS_URL));
        }
    }

    edges
}

fn js_references(url: &str, src: &str, module: bool) -> Result<Vec<ImportEdge>, DocumentError> {
    let st = source_type_for(url, module);
    let allocator = Allocator::default();
    let mut ret = OxcParser::new(&allocator, src, st).parse();
    // Plain .js files are often ES modules; retry before giving up.
    if ret.panicked && !st.is_module() {
        trace!("Reparsing {} as a module", url);
        ret = OxcParser::new(&allocator, src, st.with_module(true)).parse();
    }
    let ParserReturn { program, panicked, errors, .. } = ret;

    if panicked {
        let message = errors
            .first()
            .map(|e| e.to_string())
            .unwrap_or_else(|| "unrecoverable syntax error".to_string());
        return Err(DocumentError::Parse { url: url.to_string(), message });
    }

    let mut requests: Vec<String> = Vec::new();

    for stmt in &program.body {
        match stmt {
            Statement::ImportDeclaration(decl) => {
                if decl.import_kind.is_type() {
                    continue;
                }
                requests.push(decl.source.value.to_string());
            }
            Statement::ExportAllDeclaration(decl) => {
                requests.push(decl.source.value.to_string());
            }
            Statement::ExportNamedDeclaration(decl) => {
                if let Some(source) = &decl.source {
                    requests.push(source.value.to_string());
                }
            }
            Statement::ExpressionStatement(es) => {
                extract_requests_from_expression(&es.expression, &mut requests);
            }
            Statement::VariableDeclaration(vd) => {
                for decl in &vd.declarations {
                    if let Some(init) = &decl.init {
                        extract_requests_from_expression(init, &mut requests);
                    }
                }
            }
            _ => {}
        }
    }

    let edges = requests
        .iter()
        .filter(|request| {
            // Bare specifiers need an import map to become URLs.
            let local = request.starts_with("./")
                || request.starts_with("../")
                || request.starts_with('/');
            if !local {
                trace!("Skipping bare specifier '{}' in {}", request, url);
            }
            local
        })
        .filter_map(|request| edge(url, request, KIND_JS_IMPORT))
        .collect();

    Ok(edges)
}

fn extract_requests_from_expression(expr: &Expression, requests: &mut Vec<String>) {
    match expr {
        Expression::CallExpression(ce) => {
            if let Expression::Identifier(callee_ident) = &ce.callee
                && callee_ident.name.as_str() == "require"
                && !ce.arguments.is_empty()
                && let Some(Expression::StringLiteral(sl)) = ce.arguments[0].as_expression()
            {
                trace!("Found require() call: '{}'", sl.value);
                requests.push(sl.value.to_string());
            }
            for arg in &ce.arguments {
                if let Some(arg_expr) = arg.as_expression() {
                    extract_requests_from_expression(arg_expr, requests);
                }
            }
            extract_requests_from_expression(&ce.callee, requests);
        }
        Expression::ImportExpression(ie) => {
            if let Expression::StringLiteral(sl) = &ie.source {
                trace!("Found dynamic import(): '{}'", sl.value);
                requests.push(sl.value.to_string());
            }
        }
        Expression::AwaitExpression(ae) => {
            extract_requests_from_expression(&ae.argument, requests);
        }
        Expression::ArrayExpression(ae) => {
            for elem in &ae.elements {
                if let Some(expr) = elem.as_expression() {
                    extract_requests_from_expression(expr, requests);
                }
            }
        }
        Expression::ConditionalExpression(ce) => {
            extract_requests_from_expression(&ce.consequent, requests);
            extract_requests_from_expression(&ce.alternate, requests);
        }
        Expression::ParenthesizedExpression(pe) => {
            extract_requests_from_expression(&pe.expression, requests);
        }
        _ => {}
    }
}

fn source_type_for(url: &str, module: bool) -> SourceType {
    let ext = extension(url);

    // Only .mjs is a module by extension; everything else starts as a
    // classic script unless the caller knows better.
    let module = module || matches!(ext.as_deref(), Some("mjs"));
    SourceType::default().with_jsx(matches!(ext.as_deref(), Some("jsx"))).with_module(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(edges: &[ImportEdge]) -> Vec<&str> {
        edges.iter().map(|e| e.url.as_str()).collect()
    }

    #[test]
    fn test_source_kind_for_url() {
        assert_eq!(SourceKind::for_url("/index.html"), Some(SourceKind::Html));
        assert_eq!(SourceKind::for_url("/a.CSS"), Some(SourceKind::Css));
        assert_eq!(SourceKind::for_url("/a.mjs"), Some(SourceKind::Js));
        assert_eq!(SourceKind::for_url("/logo.png"), None);
    }

    #[test]
    fn test_unsupported_document() {
        let err = references_for("/logo.png", "").unwrap_err();
        assert_eq!(err, DocumentError::Unsupported("/logo.png".to_string()));
    }

    #[test]
    fn test_html_link_and_script() {
        let html = r#"<!doctype html>
<html><head>
  <link rel="stylesheet" href="css/app.css">
  <link rel="import" href="src/my-app.html">
  <link rel="icon" href="/favicon.ico">
  <script src="js/app.js"></script>
</head><body><a href="/about.html">About</a></body></html>"#;
        let edges = references_for("/index.html", html).unwrap();
        assert_eq!(
            urls(&edges),
            vec!["/css/app.css", "/src/my-app.html", "/favicon.ico", "/js/app.js"]
        );
        assert!(edges[0].has_kind(KIND_HTML_STYLE));
        assert!(edges[1].has_kind(KIND_HTML_IMPORT));
        assert!(edges[2].has_kind(KIND_HTML_REF));
        assert!(edges[3].has_kind(KIND_HTML_SCRIPT));
    }

    #[test]
    fn test_html_skips_comments_and_remote() {
        let html = r#"<!-- <script src="old.js"></script> -->
<script src="https://cdn.example.com/lib.js"></script>
<img src='images/logo.png'>"#;
        let edges = references_for("/views/page.html", html).unwrap();
        assert_eq!(urls(&edges), vec!["/views/images/logo.png"]);
    }

    #[test]
    fn test_html_inline_style_and_module_script() {
        let html = r#"<style>@import "theme.css"; body { background: url(bg.webp) }</style>
<script type="module">import './boot.js'; import 'lit';</script>"#;
        let edges = references_for("/index.html", html).unwrap();
        assert_eq!(urls(&edges), vec!["/theme.css", "/bg.webp", "/boot.js"]);
        assert!(edges[0].has_kind(KIND_CSS_IMPORT));
        assert!(edges[1].has_kind(KIND_CSS_URL));
        assert!(edges[2].has_kind(KIND_JS_IMPORT));
    }

    #[test]
    fn test_html_skips_data_blocks() {
        let html = r#"<script type="application/ld+json">{"@context": "https://schema.org", "@type": "WebSite"}</script>
<script type="text/x-template" id="row"><li class="{{cls}}"><img src="{{icon}}"></li></script>
<link rel="stylesheet" href="app.css">"#;
        let edges = references_for("/index.html", html).unwrap();
        assert_eq!(urls(&edges), vec!["/app.css"]);
    }

    #[test]
    fn test_html_inline_classic_script() {
        let html = r#"<script type="text/javascript; charset=utf-8">var legacy = require('./legacy.js');</script>
<script>require('./boot.js');</script>"#;
        let edges = references_for("/index.html", html).unwrap();
        assert_eq!(urls(&edges), vec!["/legacy.js", "/boot.js"]);
        assert!(edges[0].has_kind(KIND_JS_IMPORT));
    }

    #[test]
    fn test_inline_script_mode() {
        assert_eq!(inline_script_mode(""), Some(false));
        assert_eq!(inline_script_mode(r#"type="text/JavaScript""#), Some(false));
        assert_eq!(inline_script_mode(r#"type="module""#), Some(true));
        assert_eq!(inline_script_mode(r#"type="application/ld+json""#), None);
        assert_eq!(inline_script_mode(r#"type="text/x-template""#), None);
    }

    #[test]
    fn test_source_type_for() {
        assert!(!source_type_for("/src/app.js", false).is_module());
        assert!(!source_type_for("/lib/index.cjs", false).is_module());
        assert!(source_type_for("/src/app.mjs", false).is_module());
        assert!(source_type_for("/index.html", true).is_module());
    }

    #[test]
    fn test_css_references() {
        let css = r#"
/* @import "commented.css"; */
@import url("base.css");
@import 'print.css' print;
@font-face { src: url(../fonts/a.woff2) format("woff2"); }
.hero { background-image: url('data:image/png;base64,AAAA'); }
"#;
        let edges = references_for("/css/app.css", css).unwrap();
        assert_eq!(urls(&edges), vec!["/css/base.css", "/css/print.css", "/fonts/a.woff2"]);
        assert!(edges[0].has_kind(KIND_CSS_IMPORT));
        assert!(edges[1].has_kind(KIND_CSS_IMPORT));
        assert!(edges[2].has_kind(KIND_CSS_URL));
    }

    #[test]
    fn test_js_imports() {
        let js = r#"
import { a } from './a.js';
export * from '../shared/b.js';
export { c } from './c.js';
const d = await import('./lazy/d.js');
import 'lit';
"#;
        let edges = references_for("/src/main.js", js).unwrap();
        assert_eq!(urls(&edges), vec!["/src/a.js", "/shared/b.js", "/src/c.js", "/src/lazy/d.js"]);
        assert!(edges.iter().all(|e| e.has_kind(KIND_JS_IMPORT)));
    }

    #[test]
    fn test_js_require() {
        let js = "const mods = [require('./x.js'), cond ? require('./y.js') : null];";
        let edges = references_for("/lib/index.cjs", js).unwrap();
        assert_eq!(urls(&edges), vec!["/lib/x.js", "/lib/y.js"]);
    }

    #[test]
    fn test_external_package_flag() {
        let html = r#"<script src="node_modules/lit/index.js"></script>"#;
        let edges = references_for("/index.html", html).unwrap();
        assert_eq!(edges.len(), 1);
        assert!(edges[0].external);
    }
}
