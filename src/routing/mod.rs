//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, headers)
//!     → asset prefixes (axum nest_service, handled elsewhere)
//!     → router.rs (upgrade or document)
//!     → matcher.rs (evaluate header conditions)
//! ```
//!
//! # Design Decisions
//! - Classification is stateless and deterministic
//! - Upgrade detection requires both `Connection: upgrade` and
//!   `Upgrade: websocket`; anything else renders the document

pub mod matcher;
pub mod router;

pub use router::{Dispatcher, Route};
