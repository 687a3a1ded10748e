//! Script module transform engine
//!
//! Page modules import their stylesheet for the bundler-less dev flow; once
//! the stylesheet is served as its own transformed asset that import must not
//! survive in the module the browser loads. This engine strips bare `.css`
//! import statements. Transpilation itself is an external engine plugged in
//! through the same trait.

use super::{TransformEngine, TransformError};

/// Removes bare stylesheet import statements from module source.
pub struct StyleImportStripper;

impl TransformEngine for StyleImportStripper {
    fn transform(&self, source: &str) -> Result<String, TransformError> {
        let mut output: String = source
            .lines()
            .filter(|line| !is_style_import(line.trim()))
            .collect::<Vec<_>>()
            .join("\n");
        if source.ends_with('\n') && !output.is_empty() {
            output.push('\n');
        }
        Ok(output)
    }
}

/// True for a side-effect import of a `.css` specifier, e.g.
/// `import "./page.css";` or `import './theme.css'`.
fn is_style_import(line: &str) -> bool {
    let Some(rest) = line.strip_prefix("import") else {
        return false;
    };
    let rest = rest.trim_start();
    let Some(quote) = rest.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return false;
    };
    let Some(end) = rest[1..].find(quote) else {
        return false;
    };
    let specifier = &rest[1..=end];
    let tail = rest[end + 2..].trim();
    specifier.ends_with(".css") && (tail.is_empty() || tail == ";")
}
