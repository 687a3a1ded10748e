//! Dependency manifest module
//!
//! Reads the project's `package.json` dependency table and translates it
//! into an import-resolution map served to the browser: each dependency is
//! pinned to its esm.sh URL, suffixed with `?dev` outside production mode.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::logger;

/// The subset of `package.json` the server consumes.
#[derive(Debug, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub dependencies: BTreeMap<String, String>,
}

impl Manifest {
    /// Load the manifest from disk. A missing or malformed manifest is not
    /// fatal: pages are still served, with an empty import map.
    pub fn load(path: &Path) -> Self {
        let source = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                logger::log_warning(&format!(
                    "dependency manifest not readable '{}': {e}",
                    path.display()
                ));
                return Self::default();
            }
        };
        match serde_json::from_str(&source) {
            Ok(manifest) => manifest,
            Err(e) => {
                logger::log_warning(&format!(
                    "dependency manifest invalid '{}': {e}",
                    path.display()
                ));
                Self::default()
            }
        }
    }

    /// Translate the dependency table into bare-specifier -> URL entries.
    #[must_use]
    pub fn import_map(&self, production: bool) -> BTreeMap<String, String> {
        let dev_tag = if production { "" } else { "?dev" };
        self.dependencies
            .iter()
            .map(|(name, version)| {
                (
                    name.clone(),
                    format!("https://esm.sh/{name}@{version}{dev_tag}"),
                )
            })
            .collect()
    }
}
