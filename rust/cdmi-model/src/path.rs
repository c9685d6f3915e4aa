/// Normalize a request path to its canonical store key: a single leading
/// slash, no trailing slash. The root container normalizes to `"/"`.
pub fn normalize_path(path: &str) -> String {
    let trimmed = path.trim().trim_matches('/');

    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

/// Split a normalized path into its parent URI and final segment name.
///
/// The root path yields itself for both halves, matching the reference
/// representation of the root container.
pub fn split_path(path: &str) -> (String, String) {
    let path = normalize_path(path);

    if path == "/" {
        return ("/".to_string(), "/".to_string());
    }

    match path.rsplit_once('/') {
        Some(("", name)) => ("/".to_string(), name.to_string()),
        Some((parent, name)) => (parent.to_string(), name.to_string()),
        None => ("/".to_string(), path),
    }
}
