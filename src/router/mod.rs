//! Navigation hooks used by link components
//!
//! Links never build hrefs themselves: they ask the router for the path
//! prefix and notify it about targets they render. The generated site uses
//! [`SiteRouter`]; the story catalog installs a mock that records navigation.

use crate::helpers::url_for;

/// Hooks a link component calls while rendering
pub trait RouterHooks: Send + Sync {
    /// Prefix prepended to every internal path (empty for a root deployment)
    fn path_prefix(&self) -> &str;

    /// A link to `path` was rendered and may be prefetched
    fn enqueue(&self, path: &str);

    /// The pointer is resting on a link to `path`
    fn hovering(&self, path: &str);

    /// Client-side navigation to `path` was requested
    fn navigate(&self, path: &str);

    /// Resolve a site-relative target into the href that lands in markup
    fn resolve(&self, to: &str) -> String {
        url_for(self.path_prefix(), to)
    }
}

/// Router for the generated static site
#[derive(Debug, Clone, Default)]
pub struct SiteRouter {
    prefix: String,
}

impl SiteRouter {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl RouterHooks for SiteRouter {
    fn path_prefix(&self) -> &str {
        &self.prefix
    }

    fn enqueue(&self, path: &str) {
        tracing::trace!("Link rendered: {}", path);
    }

    fn hovering(&self, _path: &str) {}

    fn navigate(&self, path: &str) {
        // Static pages navigate with plain anchors
        tracing::debug!("Navigate: {}", path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_with_prefix() {
        let router = SiteRouter::new("/blog");
        assert_eq!(router.resolve("/posts/a.html"), "/blog/posts/a.html");
        assert_eq!(router.resolve("https://example.com"), "https://example.com");
    }

    #[test]
    fn test_resolve_without_prefix() {
        let router = SiteRouter::default();
        assert_eq!(router.resolve("/posts/a.html"), "/posts/a.html");
    }
}
