//! URL fragment parsing and hash URL normalization.

use crate::routing::route::RouteParams;

/// A fragment split into its routable path and query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub path: &'a str,
    pub query: Option<&'a str>,
}

impl<'a> Fragment<'a> {
    /// Split `#/path/?query` (or `#!/path`) into path and query.
    ///
    /// Returns `None` when `hash` does not start with `#`. One trailing slash
    /// is dropped from the path.
    pub fn parse(hash: &'a str) -> Option<Self> {
        let rest = hash.strip_prefix('#')?;
        let rest = rest.strip_prefix('!').unwrap_or(rest);

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };

        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        Some(Self { path, query })
    }

    /// Decoded query string entries. Later duplicates win.
    pub fn query_params(&self) -> RouteParams {
        self.query
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .into_owned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// True for fragments that denote the application root.
pub fn is_root(hash: &str) -> bool {
    matches!(hash, "" | "#" | "#!" | "#/" | "#!/")
}

/// Normalize a path into `/#/...` form.
pub fn normalize(path: &str) -> String {
    let path = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{path}")
    };
    if path.starts_with("/#") {
        path
    } else {
        format!("/#{path}")
    }
}

/// Normalize a path into the `#/...` fragment assigned to the location.
pub fn to_fragment(path: &str) -> String {
    let normalized = normalize(path);
    normalized[1..].to_string()
}
