//! Route matching module
//!
//! Compiles the route table into a radix trie and resolves incoming paths to
//! a descriptor plus extracted parameters.

use std::collections::BTreeMap;

use super::table::{RouteDescriptor, RouteTable};

/// Result of a successful lookup: the matched descriptor and the values
/// extracted for any `:name` parameter segments in the matched key.
#[derive(Debug)]
pub struct RouteMatch<'a> {
    pub descriptor: &'a RouteDescriptor,
    pub params: BTreeMap<String, String>,
}

/// Prefix/segment-aware lookup structure built once from the route table.
///
/// Wraps a [`matchit::Router`]; supports exact static segments and
/// single-segment `:name` parameters. Trailing-slash semantics are strict by
/// default: `/todos/` does not match a `/todos` entry. With strict matching
/// disabled, a miss is retried with the trailing slash toggled.
pub struct RouteMatcher {
    inner: matchit::Router<RouteDescriptor>,
    strict_trailing_slash: bool,
}

impl RouteMatcher {
    /// Compile a matcher from the route table.
    ///
    /// Fails only when two table keys conflict inside the trie (e.g. a
    /// parameter and a wildcard at the same position).
    pub fn compile(
        table: &RouteTable,
        strict_trailing_slash: bool,
    ) -> Result<Self, matchit::InsertError> {
        let mut inner = matchit::Router::new();
        for (key, descriptor) in table.iter() {
            inner.insert(to_pattern(key), descriptor.clone())?;
        }
        Ok(Self {
            inner,
            strict_trailing_slash,
        })
    }

    /// Resolve a request path to a descriptor plus parameters.
    ///
    /// A miss is a normal outcome (it drives a 404), not an error.
    pub fn lookup(&self, path: &str) -> Option<RouteMatch<'_>> {
        if let Ok(found) = self.inner.at(path) {
            return Some(into_match(found));
        }
        if self.strict_trailing_slash {
            return None;
        }
        let toggled = if let Some(trimmed) = path.strip_suffix('/') {
            if trimmed.is_empty() {
                return None;
            }
            trimmed.to_string()
        } else {
            format!("{path}/")
        };
        self.inner.at(&toggled).ok().map(into_match)
    }
}

fn into_match<'r>(found: matchit::Match<'r, '_, &'r RouteDescriptor>) -> RouteMatch<'r> {
    RouteMatch {
        descriptor: found.value,
        params: found
            .params
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect(),
    }
}

/// Translate `:name` parameter segments to matchit's `{name}` syntax.
fn to_pattern(key: &str) -> String {
    if !key.contains(':') {
        return key.to_string();
    }
    let mut pattern = String::new();
    for segment in key.split('/').skip(1) {
        pattern.push('/');
        match segment.strip_prefix(':') {
            Some(name) => {
                pattern.push('{');
                pattern.push_str(name);
                pattern.push('}');
            }
            None => pattern.push_str(segment),
        }
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn table_with(keys: &[&str]) -> RouteTable {
        let mut table = RouteTable::default();
        for key in keys {
            table.insert(
                *key,
                RouteDescriptor {
                    page: Some(PathBuf::from("routes/page.jsx")),
                    ..RouteDescriptor::default()
                },
            );
        }
        table
    }

    #[test]
    fn test_root_lookup_has_no_params() {
        let matcher = RouteMatcher::compile(&table_with(&["/"]), true).unwrap();
        let found = matcher.lookup("/").unwrap();
        assert!(found.params.is_empty());
        assert!(found.descriptor.page.is_some());
    }

    #[test]
    fn test_param_extraction() {
        let matcher = RouteMatcher::compile(&table_with(&["/todos/:id"]), true).unwrap();
        let found = matcher.lookup("/todos/123").unwrap();
        assert_eq!(found.params.get("id").map(String::as_str), Some("123"));
    }

    #[test]
    fn test_miss_is_none() {
        let matcher = RouteMatcher::compile(&table_with(&["/about"]), true).unwrap();
        assert!(matcher.lookup("/does-not-exist").is_none());
    }

    #[test]
    fn test_strict_trailing_slash() {
        let matcher = RouteMatcher::compile(&table_with(&["/about"]), true).unwrap();
        assert!(matcher.lookup("/about").is_some());
        assert!(matcher.lookup("/about/").is_none());
    }

    #[test]
    fn test_relaxed_trailing_slash_retries() {
        let matcher = RouteMatcher::compile(&table_with(&["/about"]), false).unwrap();
        assert!(matcher.lookup("/about/").is_some());
    }

    #[test]
    fn test_to_pattern() {
        assert_eq!(to_pattern("/todos/:id"), "/todos/{id}");
        assert_eq!(to_pattern("/todos/:id/edit"), "/todos/{id}/edit");
        assert_eq!(to_pattern("/about"), "/about");
    }
}
