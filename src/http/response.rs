//! HTTP response building module
//!
//! Builders for the status codes the dispatcher produces, decoupled from the
//! handling paths that use them.

use hyper::body::Bytes;
use hyper::Response;

use super::{cache, empty, full, Body};
use crate::logger;

/// Build 404 Not Found response.
pub fn build_404_response() -> Response<Body> {
    Response::builder()
        .status(404)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(full("Not Found"))
        .unwrap_or_else(|e| {
            log_build_error("404", &e);
            Response::new(full("Not Found"))
        })
}

/// Build 500 Internal Server Error response.
pub fn build_500_response() -> Response<Body> {
    Response::builder()
        .status(500)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(full("Internal Server Error"))
        .unwrap_or_else(|e| {
            log_build_error("500", &e);
            Response::new(full("Internal Server Error"))
        })
}

/// Build 413 Payload Too Large response.
pub fn build_413_response() -> Response<Body> {
    Response::builder()
        .status(413)
        .header("Content-Type", "text/plain; charset=utf-8")
        .body(full("413 Payload Too Large"))
        .unwrap_or_else(|e| {
            log_build_error("413", &e);
            Response::new(full("413 Payload Too Large"))
        })
}

/// Build 200 response for a streamed HTML page.
pub fn build_html_response(body: Body) -> Response<Body> {
    Response::builder()
        .status(200)
        .header("Content-Type", "text/html; charset=utf-8")
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("HTML", &e);
            Response::new(empty())
        })
}

/// Build 200 response for transformed asset text.
pub fn build_text_response(content_type: &'static str, text: String) -> Response<Body> {
    let content_length = text.len();
    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .body(full(text))
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(empty())
        })
}

/// Build 304 Not Modified response.
pub fn build_304_response(etag: &str) -> Response<Body> {
    Response::builder()
        .status(304)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(empty())
        .unwrap_or_else(|e| {
            log_build_error("304", &e);
            Response::new(empty())
        })
}

/// Build 200 response for static file bytes, with `ETag` revalidation and
/// HEAD support.
pub fn build_static_file_response(
    data: &[u8],
    content_type: &'static str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Body> {
    let etag = cache::generate_etag(data);
    if cache::check_etag_match(if_none_match, &etag) {
        return build_304_response(&etag);
    }

    let content_length = data.len();
    let body = if is_head {
        empty()
    } else {
        full(Bytes::from(data.to_owned()))
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", content_length)
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(body)
        .unwrap_or_else(|e| {
            log_build_error("200", &e);
            Response::new(empty())
        })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        response
            .into_body()
            .collect()
            .await
            .unwrap()
            .to_bytes()
            .to_vec()
    }

    #[tokio::test]
    async fn test_404_body_is_literal_not_found() {
        let response = build_404_response();
        assert_eq!(response.status(), 404);
        assert_eq!(body_bytes(response).await, b"Not Found");
    }

    #[tokio::test]
    async fn test_static_file_response_carries_etag() {
        let response =
            build_static_file_response(b"robots", "text/plain; charset=utf-8", None, false);
        assert_eq!(response.status(), 200);
        assert!(response.headers().contains_key("ETag"));
        assert_eq!(body_bytes(response).await, b"robots");
    }

    #[tokio::test]
    async fn test_matching_etag_yields_304() {
        let etag = cache::generate_etag(b"robots");
        let response =
            build_static_file_response(b"robots", "text/plain; charset=utf-8", Some(&etag), false);
        assert_eq!(response.status(), 304);
    }

    #[tokio::test]
    async fn test_head_omits_body_but_keeps_length() {
        let response =
            build_static_file_response(b"robots", "text/plain; charset=utf-8", None, true);
        let length = response.headers().get("Content-Length").unwrap();
        assert_eq!(length.to_str().unwrap(), "6");
        assert!(body_bytes(response).await.is_empty());
    }
}
