#![deny(missing_docs)]

//! # API Reference Page
//!
//! The static HTML shell published next to the enriched document. It loads
//! the document from a relative URL and renders it client-side.

const TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1" />
    <title>{{TITLE}}</title>
  </head>
  <body>
    <script id="api-reference" data-url="{{SPEC_URL}}"></script>
    <script src="https://cdn.jsdelivr.net/npm/@scalar/api-reference"></script>
  </body>
</html>
"#;

/// Renders the page for a document served at `spec_url`.
pub fn render_html_shell(title: &str, spec_url: &str) -> String {
    TEMPLATE
        .replace("{{TITLE}}", &escape_html(title))
        .replace("{{SPEC_URL}}", &escape_html(spec_url))
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
