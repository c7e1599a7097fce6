//! Host document rendering.
//!
//! # Data Flow
//! ```text
//! template file (re-read per request)
//!     → parser.rs (literal text + {{NAME}} placeholders)
//!     → bindings.rs (NAME → lazy producer)
//!     → renderer.rs (resolve all, evaluate, substitute)
//!     → document bytes
//! ```
//!
//! # Design Decisions
//! - No caching across requests: each render starts from the file
//! - Every placeholder is resolved before any producer runs, so a render
//!   either yields the whole document or an error, never partial output
//! - Substituted values are not re-scanned

pub mod bindings;
pub mod parser;
pub mod renderer;

use std::path::PathBuf;

use thiserror::Error;

pub use bindings::{Bindings, Producer};
pub use parser::{Segment, Template};
pub use renderer::TemplateRenderer;

/// Failure to produce the host document.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("template {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("template line {line}: unclosed placeholder")]
    Unclosed { line: usize },

    #[error("template line {line}: invalid placeholder {text:?}")]
    InvalidPlaceholder { line: usize, text: String },

    #[error("template line {line}: no binding for {name:?}")]
    Unbound { line: usize, name: String },

    #[error("binding {name:?}: {source}")]
    Produce {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}
