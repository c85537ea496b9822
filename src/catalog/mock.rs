//! Router hooks for rendering components outside the generated site
//!
//! Links rendered in the catalog must not depend on the site's path prefix,
//! and clicking them must not leave the catalog. Navigation requests are
//! recorded as actions instead.

use serde::Serialize;
use std::sync::Mutex;

use crate::router::RouterHooks;

/// Name under which navigation requests are recorded
pub const NAVIGATE_ACTION: &str = "NavigateTo:";

/// A recorded interaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Action {
    pub name: String,
    pub payload: String,
}

/// Router stub: empty path prefix, no-op loader hooks, recorded navigation
#[derive(Debug, Default)]
pub struct MockRouter {
    actions: Mutex<Vec<Action>>,
}

impl MockRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an action under `name`
    pub fn action(&self, name: &str, payload: &str) {
        tracing::info!("{} {}", name, payload);
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(Action {
                name: name.to_string(),
                payload: payload.to_string(),
            });
    }

    /// Actions recorded so far, oldest first
    pub fn actions(&self) -> Vec<Action> {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn clear(&self) {
        self.actions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clear();
    }
}

impl RouterHooks for MockRouter {
    fn path_prefix(&self) -> &str {
        ""
    }

    fn enqueue(&self, _path: &str) {}

    fn hovering(&self, _path: &str) {}

    fn navigate(&self, path: &str) {
        self.action(NAVIGATE_ACTION, path);
    }
}
