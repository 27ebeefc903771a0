//! Page shell rendering for the client-side display.
//!
//! The server performs no data injection: each page is a static HTML
//! document that names the client component to boot and leaves everything
//! else to the bundle, which calls back into the JSON endpoint.

use serde::Serialize;
use strum::{Display, IntoStaticStr};

/// Client component a page shell boots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, IntoStaticStr)]
pub enum Component {
    /// Root placeholder page.
    #[strum(serialize = "Test")]
    Test,
    /// EMY patient display.
    #[strum(serialize = "Display/Index")]
    DisplayIndex,
}

/// Page object embedded in the shell's `data-page` attribute.
#[derive(Debug, Serialize)]
pub struct PageObject<'a> {
    /// Component name.
    pub component: &'static str,
    /// Component props; always empty.
    pub props: serde_json::Map<String, serde_json::Value>,
    /// Request path the page was rendered for.
    pub url: &'a str,
    /// Client bundle version.
    pub version: &'a str,
}

/// Static page settings taken from config.
#[derive(Debug, Clone)]
pub struct PageShell {
    title: String,
    asset_version: String,
}

impl PageShell {
    /// Create a page shell with the given document title and bundle version.
    pub fn new(title: impl Into<String>, asset_version: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            asset_version: asset_version.into(),
        }
    }

    /// Document title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Render the HTML document for `component` at `url`.
    pub fn render(&self, component: Component, url: &str) -> String {
        let page = PageObject {
            component: component.into(),
            props: serde_json::Map::new(),
            url,
            version: &self.asset_version,
        };
        // Serializing a map of strings cannot fail.
        let page_json = serde_json::to_string(&page).unwrap_or_else(|_| "{}".to_string());

        format!(
            r#"<!DOCTYPE html>
<html>
  <head>
    <title>{title}</title>
    <meta charset="utf-8" />
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <link rel="shortcut icon" href="/icon/ijn-logo.png" />
    <script type="module" src="/build/app.js"></script>
    <link rel="stylesheet" href="/build/app.css" />
  </head>
  <body>
    <div id="app" data-page="{page}"></div>
  </body>
</html>
"#,
            title = escape_html(&self.title),
            page = escape_html(&page_json),
        )
    }
}

/// Escape text for use in HTML content or a double-quoted attribute.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}
