//! Canonical cache key helpers

/// True if `name` starts with a `scheme://` virtual root such as `assets://`
pub fn has_virtual_root(name: &str) -> bool {
    match name.find("://") {
        Some(idx) if idx > 0 => name[..idx]
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
        _ => false,
    }
}

/// Normalize a default path so it ends with exactly one separator.
///
/// An empty path stays empty, which disables default path handling.
pub fn normalize_default_path(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }

    let (root, rest) = match path.find("://") {
        Some(idx) if has_virtual_root(path) => path.split_at(idx + 3),
        _ => ("", path),
    };

    let trimmed = rest.trim_end_matches(['/', '\\']);
    if trimmed.is_empty() {
        return if root.is_empty() {
            "/".to_string()
        } else {
            root.to_string()
        };
    }

    format!("{root}{trimmed}/")
}

/// Prepend `default_path` unless `name` is absolute, already rooted, or no
/// default path is configured. `default_path` must already be normalized.
pub fn add_default_path_if_needed(name: &str, default_path: &str) -> String {
    if name.starts_with('/') || has_virtual_root(name) || default_path.is_empty() {
        name.to_string()
    } else {
        format!("{default_path}{name}")
    }
}
