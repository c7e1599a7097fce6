//! Request matching logic.
//!
//! # Responsibilities
//! - Match comma-separated header tokens (case-insensitive)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Header tokens are compared case-insensitively (RFC 9110)
//! - A missing header never matches
//! - No regex to guarantee O(n) matching

use axum::http::{header, HeaderName, Request};

/// Trait for matching requests against conditions.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the request matches this condition.
    fn matches<B>(&self, req: &Request<B>) -> bool;
}

/// Matches when a header lists the expected token.
///
/// `Connection: keep-alive, Upgrade` matches the token `upgrade`.
#[derive(Debug, Clone)]
pub struct HeaderTokenMatcher {
    header: HeaderName,
    token: String,
}

impl HeaderTokenMatcher {
    /// Create a new token matcher.
    /// The token is normalized to lowercase for case-insensitive matching.
    pub fn new(header: HeaderName, token: impl Into<String>) -> Self {
        Self {
            header,
            token: token.into().to_lowercase(),
        }
    }
}

impl Matcher for HeaderTokenMatcher {
    fn matches<B>(&self, req: &Request<B>) -> bool {
        req.headers()
            .get_all(&self.header)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .flat_map(|v| v.split(','))
            .any(|t| t.trim().eq_ignore_ascii_case(&self.token))
    }
}

/// Matches a WebSocket upgrade handshake: `Connection: upgrade` and
/// `Upgrade: websocket`.
#[derive(Debug, Clone)]
pub struct UpgradeMatcher {
    connection: HeaderTokenMatcher,
    upgrade: HeaderTokenMatcher,
}

impl UpgradeMatcher {
    pub fn new(protocol: impl Into<String>) -> Self {
        Self {
            connection: HeaderTokenMatcher::new(header::CONNECTION, "upgrade"),
            upgrade: HeaderTokenMatcher::new(header::UPGRADE, protocol),
        }
    }
}

impl Default for UpgradeMatcher {
    fn default() -> Self {
        Self::new("websocket")
    }
}

impl Matcher for UpgradeMatcher {
    fn matches<B>(&self, req: &Request<B>) -> bool {
        // Both must pass (AND)
        self.connection.matches(req) && self.upgrade.matches(req)
    }
}
