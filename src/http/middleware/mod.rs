//! Middleware applied to subsets of routes.

pub mod cors;

pub use cors::{cors_middleware, CorsPolicy};
