//! Page rendering module
//!
//! The render engine is an external collaborator consumed behind the
//! [`PageRenderer`] trait: given a page module reference and the request
//! context, it produces a streamed byte body. The built-in [`ShellRenderer`]
//! streams the HTML document shell — stylesheet link, import map, hydration
//! bootstrap with the serialized route state, and the root element — leaving
//! component rendering to the client.

use std::convert::Infallible;
use std::path::Path;

use futures_util::stream;
use http_body_util::{BodyExt, StreamBody};
use hyper::body::{Bytes, Frame};

use crate::http::Body;
use crate::manifest::Manifest;

use super::dispatcher::{DispatchError, RequestContext};

/// Render a page module to a stream of bytes.
pub trait PageRenderer: Send + Sync {
    fn render(&self, page: &Path, context: &RequestContext) -> Result<Body, DispatchError>;
}

/// Built-in renderer producing the client-hydrated document shell.
pub struct ShellRenderer {
    /// Serialized import map `<script type="importmap">` payload.
    import_map: String,
}

impl ShellRenderer {
    #[must_use]
    pub fn new(manifest: &Manifest, production: bool) -> Self {
        let dev_tag = if production { "" } else { "?dev" };
        let mut imports = manifest.import_map(production);
        // Hydration runtime pins, resolved the same way as manifest entries.
        imports
            .entry("react-dom/client".to_string())
            .or_insert_with(|| format!("https://esm.sh/react-dom@18.2.0/client{dev_tag}"));
        imports
            .entry("react/jsx-dev-runtime".to_string())
            .or_insert_with(|| format!("https://esm.sh/react@18.2.0/jsx-dev-runtime{dev_tag}"));

        let import_map = serde_json::json!({ "imports": imports }).to_string();
        Self { import_map }
    }

    /// URL path of the page module as the browser will request it.
    fn module_path(page: &Path) -> String {
        let mut path = String::from("/");
        path.push_str(&page.to_string_lossy().replace('\\', "/"));
        path
    }

    /// The page's stylesheet sits next to the module, same name, `.css`.
    fn stylesheet_path(module_path: &str) -> String {
        match module_path.rsplit_once('.') {
            Some((stem, _ext)) => format!("{stem}.css"),
            None => format!("{module_path}.css"),
        }
    }
}

impl PageRenderer for ShellRenderer {
    fn render(&self, page: &Path, context: &RequestContext) -> Result<Body, DispatchError> {
        let module_path = Self::module_path(page);
        let stylesheet = Self::stylesheet_path(&module_path);
        let state_json =
            serde_json::to_string(context).map_err(|e| DispatchError::RenderFailure {
                path: page.to_path_buf(),
                reason: e.to_string(),
            })?;

        let head = format!(
            "<!DOCTYPE html>\n\
             <html lang=\"en\">\n\
             <head>\n\
             <meta charset=\"utf-8\">\n\
             <link rel=\"stylesheet\" href=\"{stylesheet}\">\n\
             <script type=\"importmap\">{import_map}</script>\n\
             <script type=\"module\" defer>\n\
             window.__INITIAL_ROUTE__ = {state_json};\n\
             import React from \"react\";\n\
             import {{ hydrateRoot }} from \"react-dom/client\";\n\
             import Page from \"{module_path}\";\n\
             hydrateRoot(document.getElementById(\"root\"), React.createElement(Page));\n\
             </script>\n\
             </head>\n",
            import_map = self.import_map,
        );
        let body = "<body>\n<div id=\"root\"></div>\n";
        let tail = "</body>\n</html>\n";

        let chunks = [
            Bytes::from(head),
            Bytes::from_static(body.as_bytes()),
            Bytes::from_static(tail.as_bytes()),
        ];
        let stream = stream::iter(
            chunks
                .into_iter()
                .map(|chunk| Ok::<_, Infallible>(Frame::data(chunk))),
        );
        Ok(StreamBody::new(stream).boxed())
    }
}
