//! Route table module
//!
//! Walks the project's page, api, and static directory trees and folds the
//! results into one immutable mapping from route key to route descriptor.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::normalize;
use crate::config::ProjectConfig;
use crate::logger;

/// Handler references recorded for one route key.
///
/// A descriptor may carry any non-empty subset of the three reference kinds.
/// When the same key is produced by more than one source tree the builder
/// merges fields into the existing descriptor instead of overwriting it, so
/// a later-discovered reference of a different kind never erases an earlier
/// one. All paths are relative to the project root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteDescriptor {
    /// Page-render module reference (e.g. `routes/todos/page.jsx`)
    pub page: Option<PathBuf>,
    /// Api module reference (e.g. `routes/todos/api.js`)
    pub api: Option<PathBuf>,
    /// Static file reference (e.g. `static/robots.txt`)
    pub file: Option<PathBuf>,
}

/// Immutable mapping from route key to route descriptor.
///
/// Built once at startup and shared read-only across all in-flight requests.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteDescriptor>,
}

impl RouteTable {
    /// Build the route table from the project's directory trees.
    ///
    /// Enumeration is sorted lexicographically so that a same-kind key
    /// collision (two page files normalizing to one key) resolves
    /// deterministically: the last-sorted file wins. Missing source trees
    /// are skipped with a warning.
    pub fn build(project_root: &Path, project: &ProjectConfig) -> io::Result<Self> {
        let mut table = Self::default();

        let routes_dir = project_root.join(&project.routes_dir);
        table.collect(
            project_root,
            &routes_dir,
            &project.routes_dir,
            &project.page_entry,
            |descriptor, path| descriptor.page = Some(path),
        )?;
        table.collect(
            project_root,
            &routes_dir,
            &project.routes_dir,
            &project.api_entry,
            |descriptor, path| descriptor.api = Some(path),
        )?;

        let static_dir = project_root.join(&project.static_dir);
        if static_dir.is_dir() {
            for entry in sorted_files(&static_dir) {
                let entry = entry?;
                let Some(relative) = relative_str(entry.path(), project_root) else {
                    continue;
                };
                let key = normalize(&relative, &project.static_dir, None);
                table
                    .routes
                    .entry(key)
                    .or_default()
                    .file = Some(PathBuf::from(relative));
            }
        } else {
            logger::log_warning(&format!(
                "static directory not found: {}",
                static_dir.display()
            ));
        }

        Ok(table)
    }

    /// Walk one source tree, keep files matching `entry_file`, and record a
    /// reference via `record` under the normalized key.
    fn collect(
        &mut self,
        project_root: &Path,
        tree: &Path,
        root_marker: &str,
        entry_file: &str,
        record: impl Fn(&mut RouteDescriptor, PathBuf),
    ) -> io::Result<()> {
        if !tree.is_dir() {
            logger::log_warning(&format!("route directory not found: {}", tree.display()));
            return Ok(());
        }

        for entry in sorted_files(tree) {
            let entry = entry?;
            if entry.file_name().to_str() != Some(entry_file) {
                continue;
            }
            let Some(relative) = relative_str(entry.path(), project_root) else {
                continue;
            };
            let key = normalize(&relative, root_marker, Some(entry_file));
            record(
                self.routes.entry(key).or_default(),
                PathBuf::from(relative),
            );
        }
        Ok(())
    }

    /// Insert a descriptor under an exact key.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, key: impl Into<String>, descriptor: RouteDescriptor) {
        self.routes.insert(key.into(), descriptor);
    }

    /// Look up the descriptor for an exact route key.
    pub fn get(&self, key: &str) -> Option<&RouteDescriptor> {
        self.routes.get(key)
    }

    /// Iterate over all (key, descriptor) entries.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &RouteDescriptor)> {
        self.routes.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Recursively enumerate regular files under `tree` in lexicographic order.
fn sorted_files(tree: &Path) -> impl Iterator<Item = io::Result<walkdir::DirEntry>> {
    WalkDir::new(tree)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) if e.file_type().is_file() => Some(Ok(e)),
            Ok(_) => None,
            Err(e) => Some(Err(io::Error::other(e))),
        })
}

/// Project-relative path with `/` separators, or None for foreign paths.
fn relative_str(path: &Path, project_root: &Path) -> Option<String> {
    let relative = path.strip_prefix(project_root).ok()?;
    let mut out = String::new();
    for component in relative.components() {
        if !out.is_empty() {
            out.push('/');
        }
        out.push_str(component.as_os_str().to_str()?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    fn project() -> ProjectConfig {
        ProjectConfig::default()
    }

    #[test]
    fn test_build_records_pages_apis_and_static_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "routes/page.jsx");
        touch(dir.path(), "routes/about/page.jsx");
        touch(dir.path(), "routes/todos/page.jsx");
        touch(dir.path(), "routes/todos/api.js");
        touch(dir.path(), "static/robots.txt");

        let table = RouteTable::build(dir.path(), &project()).unwrap();
        assert_eq!(table.len(), 4);

        let root = table.get("/").unwrap();
        assert_eq!(root.page.as_deref(), Some(Path::new("routes/page.jsx")));
        assert!(root.api.is_none());

        assert!(table.get("/about").unwrap().page.is_some());

        let robots = table.get("/robots.txt").unwrap();
        assert_eq!(robots.file.as_deref(), Some(Path::new("static/robots.txt")));
        assert!(robots.page.is_none());
    }

    #[test]
    fn test_page_and_api_merge_into_one_descriptor() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "routes/todos/page.jsx");
        touch(dir.path(), "routes/todos/api.js");

        let table = RouteTable::build(dir.path(), &project()).unwrap();
        let todos = table.get("/todos").unwrap();
        assert_eq!(todos.page.as_deref(), Some(Path::new("routes/todos/page.jsx")));
        assert_eq!(todos.api.as_deref(), Some(Path::new("routes/todos/api.js")));
        assert!(todos.file.is_none());
    }

    #[test]
    fn test_param_directories_normalize_to_param_keys() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "routes/todos/[id]/page.jsx");

        let table = RouteTable::build(dir.path(), &project()).unwrap();
        assert!(table.get("/todos/:id").unwrap().page.is_some());
    }

    #[test]
    fn test_missing_trees_yield_empty_table() {
        let dir = TempDir::new().unwrap();
        let table = RouteTable::build(dir.path(), &project()).unwrap();
        assert!(table.is_empty());
    }
}
