//! Stylesheet transform engine
//!
//! One lightningcss pass over the source: vendor prefixing for the target
//! browsers, `@custom-media` resolution, and nesting flattening, in that
//! internal order.

use lightningcss::stylesheet::{MinifyOptions, ParserFlags, ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use super::{TransformEngine, TransformError};

/// lightningcss-backed stylesheet pipeline.
pub struct StylesheetPipeline {
    browsers: Browsers,
}

impl StylesheetPipeline {
    #[must_use]
    pub fn new() -> Self {
        Self {
            browsers: default_browsers(),
        }
    }

    fn targets(&self) -> Targets {
        self.browsers.into()
    }
}

impl Default for StylesheetPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl TransformEngine for StylesheetPipeline {
    fn transform(&self, source: &str) -> Result<String, TransformError> {
        let mut options = ParserOptions::default();
        options.flags = ParserFlags::CUSTOM_MEDIA;

        let mut stylesheet = StyleSheet::parse(source, options)
            .map_err(|e| TransformError(format!("css parse error: {e:?}")))?;

        stylesheet
            .minify(MinifyOptions {
                targets: self.targets(),
                ..MinifyOptions::default()
            })
            .map_err(|e| TransformError(format!("css minify error: {e:?}")))?;

        let output = stylesheet
            .to_css(PrinterOptions {
                targets: self.targets(),
                ..PrinterOptions::default()
            })
            .map_err(|e| TransformError(format!("css print error: {e:?}")))?;

        Ok(output.code)
    }
}

/// Browser floor used for vendor prefixing. lightningcss encodes versions
/// as `major << 16 | minor << 8 | patch`.
fn default_browsers() -> Browsers {
    Browsers {
        chrome: Some(90 << 16),
        edge: Some(90 << 16),
        firefox: Some(88 << 16),
        safari: Some(14 << 16),
        ios_saf: Some(14 << 16),
        ..Browsers::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flattens_nesting() {
        let out = StylesheetPipeline::new()
            .transform(".todo { color: red; & .done { color: gray; } }")
            .unwrap();
        assert!(out.contains(".todo .done"));
    }

    #[test]
    fn test_resolves_custom_media() {
        let out = StylesheetPipeline::new()
            .transform(
                "@custom-media --narrow (max-width: 30em);\n\
                 @media (--narrow) { body { margin: 0; } }",
            )
            .unwrap();
        assert!(out.contains("max-width: 30em"));
        assert!(!out.contains("--narrow"));
    }

    #[test]
    fn test_vendor_prefixes_for_target_browsers() {
        let out = StylesheetPipeline::new()
            .transform(".toolbar { user-select: none; }")
            .unwrap();
        assert!(out.contains("-webkit-user-select"));
    }

    #[test]
    fn test_invalid_source_fails() {
        let err = StylesheetPipeline::new()
            .transform(".broken { color red }")
            .unwrap_err();
        assert!(err.to_string().contains("css"));
    }
}
