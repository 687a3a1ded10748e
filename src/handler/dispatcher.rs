//! Request dispatch module
//!
//! Entry point for HTTP request processing. Per request, in fixed precedence
//! order: stylesheet extension, script extension, route lookup (static file,
//! then page, then api). Failures are represented as [`DispatchError`]
//! internally and mapped to a status code only at this boundary.

use std::collections::BTreeMap;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use hyper::body::Body as _;
use hyper::{Method, Request, Response};
use serde::Serialize;
use thiserror::Error;

use crate::config::AppState;
use crate::http::{self, Body, RequestBody};
use crate::logger;
use crate::transform::{matches_extension, AssetError, AssetTransformer};

use super::static_files;

/// Why a request could not be served.
///
/// All kinds collapse to 404 externally by default; the distinction is kept
/// for logging, and `http.strict_transform_errors` upgrades transform and
/// render failures to 500.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// No route matched the request path. Expected, not exceptional.
    #[error("no route matched {0}")]
    NoMatch(String),
    /// A referenced file was absent at serve time.
    #[error("file missing at serve time: {0}")]
    NotFound(PathBuf),
    /// An asset transform pipeline rejected the source.
    #[error("transform failed for {path}: {reason}")]
    TransformFailure { path: PathBuf, reason: String },
    /// The page-render collaborator failed.
    #[error("render failed for {path}: {reason}")]
    RenderFailure { path: PathBuf, reason: String },
}

/// Request-derived data handed to the page-render collaborator.
///
/// Created at request arrival, passed explicitly down the render path, and
/// discarded after the response is produced. Never shared across requests.
#[derive(Debug, Clone, Serialize)]
pub struct RequestContext {
    pub pathname: String,
    pub query: BTreeMap<String, String>,
    pub params: BTreeMap<String, String>,
}

/// Main entry point for HTTP request handling.
pub async fn handle_request(
    req: Request<RequestBody>,
    state: Arc<AppState>,
    peer_addr: SocketAddr,
) -> Result<Response<Body>, Infallible> {
    let started = Instant::now();
    let mut entry = logger::AccessLogEntry::new(
        peer_addr.ip().to_string(),
        req.method().to_string(),
        req.uri().path().to_string(),
    );
    entry.query = req.uri().query().map(ToString::to_string);
    entry.http_version = format!("{:?}", req.version())
        .trim_start_matches("HTTP/")
        .to_string();
    entry.referer = header_string(&req, "referer");
    entry.user_agent = header_string(&req, "user-agent");

    // Body size guard
    let response = if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        resp
    } else {
        logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);
        match dispatch(req, &state).await {
            Ok(resp) => resp,
            Err(err) => {
                logger::log_dispatch_error(&err);
                error_response(&err, state.config.http.strict_transform_errors)
            }
        }
    };

    if state
        .cached_access_log
        .load(std::sync::atomic::Ordering::Relaxed)
    {
        entry.status = response.status().as_u16();
        entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
        entry.request_time_us =
            u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(response)
}

/// Select and run one handling path.
///
/// Extension-based transforms win over the route matcher, even when a route
/// with the literal path exists. Within one descriptor, a static reference
/// wins over a page reference, and a page reference wins over an api
/// reference.
async fn dispatch(
    req: Request<RequestBody>,
    state: &Arc<AppState>,
) -> Result<Response<Body>, DispatchError> {
    let path = req.uri().path().to_string();

    // 1. Stylesheet extension check
    if matches_extension(&path, &state.config.transform.stylesheet_extensions) {
        return respond_transformed(&state.stylesheets, &path).await;
    }

    // 2. Script extension check
    if matches_extension(&path, &state.config.transform.script_extensions) {
        return respond_transformed(&state.scripts, &path).await;
    }

    // 3. Route lookup
    let Some(found) = state.matcher.lookup(&path) else {
        return Err(DispatchError::NoMatch(path));
    };

    if let Some(file) = &found.descriptor.file {
        let is_head = req.method() == Method::HEAD;
        let if_none_match = header_string(&req, "if-none-match");
        return static_files::serve(
            state.project_root(),
            file,
            if_none_match.as_deref(),
            is_head,
        )
        .await;
    }

    if let Some(page) = &found.descriptor.page {
        let context = RequestContext {
            pathname: path,
            query: parse_query(req.uri().query()),
            params: found.params,
        };
        let body = state.renderer.render(page, &context)?;
        return Ok(http::build_html_response(body));
    }

    if let Some(api) = &found.descriptor.api {
        return state.api.invoke(api, req);
    }

    Err(DispatchError::NoMatch(path))
}

/// Run one transform adapter and wrap its output, folding adapter failures
/// into the dispatcher's error kinds.
async fn respond_transformed(
    adapter: &AssetTransformer,
    path: &str,
) -> Result<Response<Body>, DispatchError> {
    let text = adapter.transform_path(path).await.map_err(|e| match e {
        AssetError::NotFound(p) => DispatchError::NotFound(p),
        AssetError::Failed { path, reason } => DispatchError::TransformFailure { path, reason },
    })?;
    Ok(http::build_text_response(adapter.content_type(), text))
}

/// Map an internal failure kind to the externally visible status.
fn error_response(err: &DispatchError, strict_transform_errors: bool) -> Response<Body> {
    match err {
        DispatchError::TransformFailure { .. } | DispatchError::RenderFailure { .. }
            if strict_transform_errors =>
        {
            http::build_500_response()
        }
        _ => http::build_404_response(),
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(req: &Request<RequestBody>, max_body_size: u64) -> Option<Response<Body>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

/// Decode the query string into an ordered key/value mapping.
fn parse_query(query: Option<&str>) -> BTreeMap<String, String> {
    query
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default()
}

fn header_string(req: &Request<RequestBody>, name: &str) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::fs;
    use std::path::Path;

    use http_body_util::{BodyExt, Full};
    use hyper::body::Bytes;

    use crate::config::Config;

    fn test_state(root: &Path) -> Arc<AppState> {
        let mut config = Config::load_from("/nonexistent/config").unwrap();
        config.project.root = root.to_str().unwrap().to_string();
        Arc::new(AppState::new(config).unwrap())
    }

    fn test_request(path: &str) -> Request<RequestBody> {
        Request::builder()
            .uri(path)
            .body(Full::new(Bytes::new()).map_err(|never| match never {}).boxed())
            .unwrap()
    }

    fn peer() -> SocketAddr {
        "127.0.0.1:54321".parse().unwrap()
    }

    async fn body_string(body: Body) -> String {
        let bytes = body.collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_parse_query() {
        let query = parse_query(Some("done=true&page=2"));
        assert_eq!(query.get("done").map(String::as_str), Some("true"));
        assert_eq!(query.get("page").map(String::as_str), Some("2"));
        assert!(parse_query(None).is_empty());
    }

    #[test]
    fn test_error_response_statuses() {
        let no_match = DispatchError::NoMatch("/x".to_string());
        let failed = DispatchError::TransformFailure {
            path: PathBuf::from("a.css"),
            reason: "bad".to_string(),
        };
        assert_eq!(error_response(&no_match, false).status(), 404);
        assert_eq!(error_response(&failed, false).status(), 404);
        assert_eq!(error_response(&no_match, true).status(), 404);
        assert_eq!(error_response(&failed, true).status(), 500);
    }

    #[tokio::test]
    async fn test_unmatched_path_yields_404_with_fixed_body() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let resp = handle_request(test_request("/missing"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
        assert_eq!(body_string(resp.into_body()).await, "Not Found");
    }

    #[tokio::test]
    async fn test_static_file_is_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/robots.txt"), "User-agent: *\n").unwrap();
        let state = test_state(dir.path());

        let resp = handle_request(test_request("/robots.txt"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap().to_str().unwrap(),
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_string(resp.into_body()).await, "User-agent: *\n");
    }

    #[tokio::test]
    async fn test_page_route_renders_html_shell() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("routes")).unwrap();
        fs::write(dir.path().join("routes/page.jsx"), "export default 1;").unwrap();
        let state = test_state(dir.path());

        let resp = handle_request(test_request("/"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap().to_str().unwrap(),
            "text/html; charset=utf-8"
        );
        let html = body_string(resp.into_body()).await;
        assert!(html.contains("/routes/page.jsx"));
        assert!(html.contains("<div id=\"root\">"));
    }

    #[tokio::test]
    async fn test_page_route_embeds_params_and_query() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("routes/todos/[id]")).unwrap();
        fs::write(
            dir.path().join("routes/todos/[id]/page.jsx"),
            "export default 1;",
        )
        .unwrap();
        let state = test_state(dir.path());

        let resp = handle_request(test_request("/todos/123?tab=notes"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        let html = body_string(resp.into_body()).await;
        assert!(html.contains("\"id\":\"123\""));
        assert!(html.contains("\"tab\":\"notes\""));
        assert!(html.contains("\"pathname\":\"/todos/123\""));
    }

    #[tokio::test]
    async fn test_stylesheet_extension_wins_over_route_table() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("static")).unwrap();
        fs::write(dir.path().join("static/app.css"), "raw bytes").unwrap();
        fs::write(dir.path().join("app.css"), ".a { color: red }").unwrap();
        let state = test_state(dir.path());

        let resp = handle_request(test_request("/app.css"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 200);
        assert_eq!(
            resp.headers().get("content-type").unwrap().to_str().unwrap(),
            "text/css"
        );
        let css = body_string(resp.into_body()).await;
        assert!(css.contains("red"));
        assert!(!css.contains("raw bytes"));
    }

    #[tokio::test]
    async fn test_api_route_without_runtime_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("routes/todos")).unwrap();
        fs::write(dir.path().join("routes/todos/api.js"), "export default 1;").unwrap();
        let state = test_state(dir.path());

        let resp = handle_request(test_request("/todos"), state, peer())
            .await
            .unwrap();
        assert_eq!(resp.status(), 404);
    }

    #[tokio::test]
    async fn test_oversized_content_length_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path());

        let req = Request::builder()
            .uri("/")
            .header("content-length", "99999999999")
            .body(Full::new(Bytes::new()).map_err(|never| match never {}).boxed())
            .unwrap();
        let resp = handle_request(req, state, peer()).await.unwrap();
        assert_eq!(resp.status(), 413);
    }
}
