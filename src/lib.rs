//! Workbench host: serves a browser editor's bootstrap page, its static
//! assets, and an echoing duplex channel from a single HTTP port.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod template;

pub use config::schema::ServerConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
