//! Top-level request classification.
//!
//! # Responsibilities
//! - Decide whether a request opens a duplex channel or renders the document
//! - Log the decision
//!
//! # Design Decisions
//! - Immutable after construction (thread-safe without locks)
//! - Asset prefixes are separate axum routes and never reach this point
//! - Explicit `Route` rather than a boolean

use axum::http::Request;

use crate::routing::matcher::{Matcher, UpgradeMatcher};

/// Where a request is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Protocol upgrade to a duplex channel.
    Upgrade,
    /// Render the host document.
    Document,
}

impl Route {
    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Upgrade => "upgrade",
            Route::Document => "document",
        }
    }
}

/// Classifies requests that fall through the asset routes.
#[derive(Debug, Clone, Default)]
pub struct Dispatcher {
    upgrade: UpgradeMatcher,
}

impl Dispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classify<B>(&self, req: &Request<B>) -> Route {
        let route = if self.upgrade.matches(req) {
            Route::Upgrade
        } else {
            Route::Document
        };
        tracing::debug!(
            method = %req.method(),
            path = %req.uri().path(),
            route = route.as_str(),
            "Request classified"
        );
        route
    }
}
