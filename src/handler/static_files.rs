//! Static file serving module
//!
//! Serves a matched static reference: reads the file, derives the content
//! type from its extension, and builds the response with revalidation
//! headers. A file missing at serve time is a `NotFound`, reported 404.

use std::path::Path;

use hyper::Response;
use tokio::fs;

use crate::http::{self, mime, Body};

use super::dispatcher::DispatchError;

/// Serve the file behind a static route reference.
pub async fn serve(
    project_root: &Path,
    file_ref: &Path,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Result<Response<Body>, DispatchError> {
    let path = project_root.join(file_ref);
    let content = fs::read(&path)
        .await
        .map_err(|_| DispatchError::NotFound(path.clone()))?;

    let content_type = mime::get_content_type(path.extension().and_then(|e| e.to_str()));
    Ok(http::build_static_file_response(
        &content,
        content_type,
        if_none_match,
        is_head,
    ))
}
