use std::path::{Component, Path, PathBuf};

/// Returns true if path is allowed given allow/deny lists.
/// If allow list is non-empty, path must match at least one allowed prefix.
/// Deny list always overrides. Both sides are compared in normalized form.
pub fn is_allowed(path: &Path, allow: &[String], deny: &[String]) -> bool {
    let path = normalize(path);
    let under = |prefix: &String| path.starts_with(normalize(Path::new(prefix)));
    if deny.iter().any(under) {
        return false;
    }
    if allow.is_empty() {
        return true;
    }
    allow.iter().any(under)
}

/// Lexically normalized form: `.` dropped, `..` folded into its parent.
/// Does not touch the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}
