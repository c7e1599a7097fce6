//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize, defaults fill gaps)
//!     → validation.rs (semantic checks)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with the HTTP layer
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; no hot reload
//! - All fields have defaults, so running without a file reproduces the
//!   built-in constants
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod workbench;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    AssetsConfig, CorsConfig, ListenerConfig, ObservabilityConfig, ServerConfig, TemplateConfig,
    WebSocketConfig,
};
pub use workbench::WorkbenchConfiguration;
