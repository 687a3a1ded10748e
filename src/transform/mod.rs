//! Asset transform module
//!
//! Per-request transformation of stylesheet and script sources. The transform
//! engines themselves sit behind the [`TransformEngine`] trait; the adapter
//! reads the requested file from disk, applies a fixed, ordered pipeline of
//! engines, and returns the transformed text.

pub mod script;
pub mod stylesheet;

use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs;

/// Opaque failure from a transform engine. Failures are not distinguished
/// by kind at this boundary.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct TransformError(pub String);

/// A `text -> text` transform step operating on file contents.
pub trait TransformEngine: Send + Sync {
    fn transform(&self, source: &str) -> Result<String, TransformError>;
}

/// Failure modes of one adapter invocation.
#[derive(Debug, Error)]
pub enum AssetError {
    /// The requested source file does not exist or cannot be read.
    #[error("asset not found: {0}")]
    NotFound(PathBuf),
    /// An engine in the pipeline rejected the source.
    #[error("transform failed for {path}: {reason}")]
    Failed { path: PathBuf, reason: String },
}

/// On-demand transformer for one asset class (stylesheets or scripts).
///
/// Resolves request paths against the project root and runs the pipeline
/// steps in order on the file's text.
pub struct AssetTransformer {
    root: PathBuf,
    content_type: &'static str,
    pipeline: Vec<Box<dyn TransformEngine>>,
}

impl AssetTransformer {
    pub fn new(
        root: PathBuf,
        content_type: &'static str,
        pipeline: Vec<Box<dyn TransformEngine>>,
    ) -> Self {
        Self {
            root,
            content_type,
            pipeline,
        }
    }

    /// Content type of the transformed output.
    #[must_use]
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Read the file behind `url_path` and run it through the pipeline.
    pub async fn transform_path(&self, url_path: &str) -> Result<String, AssetError> {
        // Strip the leading slash and neutralize traversal segments before
        // resolving against the project root.
        let clean = url_path.trim_start_matches('/').replace("..", "");
        let path = self.root.join(clean);

        let source = fs::read_to_string(&path)
            .await
            .map_err(|_| AssetError::NotFound(path.clone()))?;

        let mut output = source;
        for engine in &self.pipeline {
            output = engine
                .transform(&output)
                .map_err(|e| AssetError::Failed {
                    path: path.clone(),
                    reason: e.to_string(),
                })?;
        }
        Ok(output)
    }
}

/// True when the path's final extension is in `extensions` (listed without
/// the leading dot).
#[must_use]
pub fn matches_extension(path: &str, extensions: &[String]) -> bool {
    Path::new(path)
        .extension()
        .and_then(std::ffi::OsStr::to_str)
        .is_some_and(|ext| extensions.iter().any(|e| e == ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs as std_fs;
    use tempfile::TempDir;

    struct Upper;
    impl TransformEngine for Upper {
        fn transform(&self, source: &str) -> Result<String, TransformError> {
            Ok(source.to_uppercase())
        }
    }

    struct Reject;
    impl TransformEngine for Reject {
        fn transform(&self, _source: &str) -> Result<String, TransformError> {
            Err(TransformError("nope".to_string()))
        }
    }

    #[tokio::test]
    async fn test_pipeline_runs_in_order() {
        let dir = TempDir::new().unwrap();
        std_fs::write(dir.path().join("a.css"), "body{}").unwrap();
        let adapter = AssetTransformer::new(
            dir.path().to_path_buf(),
            "text/css",
            vec![Box::new(Upper)],
        );
        let out = adapter.transform_path("/a.css").await.unwrap();
        assert_eq!(out, "BODY{}");
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let adapter = AssetTransformer::new(dir.path().to_path_buf(), "text/css", vec![]);
        let err = adapter.transform_path("/missing.css").await.unwrap_err();
        assert!(matches!(err, AssetError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_engine_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        std_fs::write(dir.path().join("a.css"), "body{}").unwrap();
        let adapter = AssetTransformer::new(
            dir.path().to_path_buf(),
            "text/css",
            vec![Box::new(Reject)],
        );
        let err = adapter.transform_path("/a.css").await.unwrap_err();
        assert!(matches!(err, AssetError::Failed { .. }));
    }

    #[test]
    fn test_matches_extension() {
        let exts = vec!["js".to_string(), "jsx".to_string()];
        assert!(matches_extension("/app/page.jsx", &exts));
        assert!(matches_extension("/vendor.js", &exts));
        assert!(!matches_extension("/style.css", &exts));
        assert!(!matches_extension("/no-extension", &exts));
    }
}
