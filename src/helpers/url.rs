//! URL helper functions

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept verbatim in a post id path segment
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.');

/// Prefix a root-relative path with the configured root. Relative paths,
/// protocol-relative and scheme-bearing URLs, queries and fragments are
/// returned unchanged.
///
/// # Examples
/// ```ignore
/// url_for("/blog", "/posts/a.html") // -> "/blog/posts/a.html"
/// url_for("/blog", "other.html")    // -> "other.html"
/// ```
pub fn url_for(root: &str, path: &str) -> String {
    if !is_root_relative(path) {
        return path.to_string();
    }

    let root = root.trim_end_matches('/');
    if root.is_empty() {
        return path.to_string();
    }

    format!("{}{}", root, path)
}

/// `/path` but not `//host/path`
fn is_root_relative(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//")
}

/// Site-relative URL of a post detail page
pub fn post_path(id: &str) -> String {
    format!("/posts/{}.html", utf8_percent_encode(id, SEGMENT))
}

/// Decode a request path into the on-disk form it was encoded from
pub fn decode_path(path: &str) -> String {
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}
