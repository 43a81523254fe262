use std::borrow::Cow;
use std::path::{Component, Path};

/// Separator used in every matching key.
pub const SEPARATOR: char = '/';

/// Rewrites backslashes to `/`, borrowing when nothing changes.
#[must_use]
pub fn normalize_separators(key: &str) -> Cow<'_, str> {
    if key.contains('\\') {
        Cow::Owned(key.replace('\\', "/"))
    } else {
        Cow::Borrowed(key)
    }
}

/// Renders `relative` as a matching key.
///
/// Normal components are joined with `/`; `.` components and any root or
/// prefix are dropped. Directories gain a trailing `/` so rules can tell
/// `dir1/` from a file named `dir1`. An empty path yields an empty key.
#[must_use]
pub fn relative_key(relative: &Path, is_dir: bool) -> String {
    let mut key = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            if !key.is_empty() {
                key.push(SEPARATOR);
            }
            key.push_str(&part.to_string_lossy());
        }
    }
    if is_dir && !key.is_empty() {
        key.push(SEPARATOR);
    }
    normalize_separators(&key).into_owned()
}
