//! HTTP protocol layer module
//!
//! Provides HTTP base functionality shared by every handling path: the
//! boxed body alias, response builders, MIME lookup, and ETag handling.

pub mod cache;
pub mod mime;
pub mod response;

use std::convert::Infallible;

use http_body_util::{BodyExt, Full};
use hyper::body::Bytes;

pub use response::{
    build_404_response, build_413_response, build_500_response, build_html_response,
    build_static_file_response, build_text_response,
};

/// Uniform response body: fixed buffers for most paths, a chunk stream for
/// rendered pages.
pub type Body = http_body_util::combinators::BoxBody<Bytes, Infallible>;

/// Uniform request body handed through the dispatcher.
pub type RequestBody = http_body_util::combinators::BoxBody<Bytes, hyper::Error>;

/// Box a fixed buffer into the uniform body type.
pub fn full(data: impl Into<Bytes>) -> Body {
    Full::new(data.into()).boxed()
}

/// The empty body.
#[must_use]
pub fn empty() -> Body {
    full(Bytes::new())
}
