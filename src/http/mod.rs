//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → assets.rs (under /out or /extensions, behind middleware/cors.rs)
//!     → otherwise dispatch:
//!         upgrade headers → websocket.rs (echo channel for its lifetime)
//!         anything else   → template renderer → HTML document
//! ```

pub mod assets;
pub mod error;
pub mod middleware;
pub mod request;
pub mod server;
pub mod websocket;

pub use error::{AppError, AssetNotFound, HandshakeError, TransportError};
pub use request::X_REQUEST_ID;
pub use server::{AppState, HttpServer};
