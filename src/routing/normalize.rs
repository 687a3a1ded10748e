//! Path normalization module
//!
//! Turns a raw filesystem path into a canonical route key.

/// Normalize a project-relative file path into a route key.
///
/// The path is split on `/`, the leading `root_marker` segment (the `routes`
/// or `static` directory name) is dropped, and a trailing `entry_file`
/// segment (`page.jsx` / `api.js`) is dropped when given. Bracketed directory
/// segments (`[id]`) become parameter segments (`:id`). An empty result maps
/// to `/`; the returned key always starts with `/`.
///
/// There are no error conditions: a degenerate input simply normalizes
/// to `/`. The function is idempotent over its own output.
///
/// # Examples
/// ```
/// use crumpet::routing::normalize;
/// assert_eq!(normalize("routes/page.jsx", "routes", Some("page.jsx")), "/");
/// assert_eq!(normalize("routes/todos/[id]/page.jsx", "routes", Some("page.jsx")), "/todos/:id");
/// assert_eq!(normalize("static/robots.txt", "static", None), "/robots.txt");
/// ```
pub fn normalize(raw: &str, root_marker: &str, entry_file: Option<&str>) -> String {
    let mut segments: Vec<&str> = raw
        .trim_start_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    if segments.first() == Some(&root_marker) {
        segments.remove(0);
    }

    if let Some(entry) = entry_file {
        if segments.last() == Some(&entry) {
            segments.pop();
        }
    }

    if segments.is_empty() {
        return "/".to_string();
    }

    let mut key = String::new();
    for segment in segments {
        key.push('/');
        key.push_str(&param_segment(segment));
    }
    key
}

/// Rewrite a bracketed directory segment to a parameter segment.
fn param_segment(segment: &str) -> String {
    segment
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .map_or_else(|| segment.to_string(), |name| format!(":{name}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_entry_maps_to_slash() {
        assert_eq!(normalize("routes/page.jsx", "routes", Some("page.jsx")), "/");
        assert_eq!(normalize("routes", "routes", None), "/");
        assert_eq!(normalize("", "routes", None), "/");
    }

    #[test]
    fn test_strips_marker_and_entry() {
        assert_eq!(
            normalize("routes/todos/page.jsx", "routes", Some("page.jsx")),
            "/todos"
        );
        assert_eq!(
            normalize("routes/todos/api.js", "routes", Some("api.js")),
            "/todos"
        );
    }

    #[test]
    fn test_static_paths_keep_filename() {
        assert_eq!(normalize("static/robots.txt", "static", None), "/robots.txt");
        assert_eq!(
            normalize("static/img/logo.png", "static", None),
            "/img/logo.png"
        );
    }

    #[test]
    fn test_bracket_segments_become_params() {
        assert_eq!(
            normalize("routes/todos/[id]/page.jsx", "routes", Some("page.jsx")),
            "/todos/:id"
        );
    }

    #[test]
    fn test_idempotent() {
        for raw in [
            "routes/todos/[id]/page.jsx",
            "static/robots.txt",
            "routes/page.jsx",
            "",
        ] {
            let once = normalize(raw, "routes", Some("page.jsx"));
            let twice = normalize(&once, "routes", Some("page.jsx"));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_entry_only_stripped_at_tail() {
        // A directory that happens to share the entry name stays in the key.
        assert_eq!(
            normalize("routes/page.jsx/nested/page.jsx", "routes", Some("page.jsx")),
            "/page.jsx/nested"
        );
    }
}
