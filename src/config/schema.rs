//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files, and
//! every default reproduces the values the server ships with when no file is
//! given.

use serde::{Deserialize, Serialize};

use crate::config::workbench::WorkbenchConfiguration;

/// Root configuration for the workbench host.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServerConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Static asset roots and the URL prefixes they are mounted under.
    pub assets: AssetsConfig,

    /// Cross-origin policy applied to asset responses.
    pub cors: CorsConfig,

    /// Duplex channel (WebSocket) settings.
    pub websocket: WebSocketConfig,

    /// Host document template and its placeholder values.
    pub template: TemplateConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Runtime configuration injected into the rendered document.
    pub workbench: WorkbenchConfiguration,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Static asset roots.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AssetsConfig {
    /// URL prefix for compiled editor output.
    pub out_prefix: String,

    /// Directory served under `out_prefix`.
    pub out_root: String,

    /// URL prefix for bundled extensions.
    pub extensions_prefix: String,

    /// Directory served under `extensions_prefix`.
    pub extensions_root: String,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            out_prefix: "/out".to_string(),
            out_root: "../lib/vscode/out".to_string(),
            extensions_prefix: "/extensions".to_string(),
            extensions_root: "../lib/vscode/extensions".to_string(),
        }
    }
}

/// Cross-origin policy for asset routes.
///
/// The defaults allow every origin. Narrow `allow_origin` for deployments
/// that are reachable from untrusted pages.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CorsConfig {
    /// Value of `Access-Control-Allow-Origin`.
    pub allow_origin: String,

    /// Methods listed in `Access-Control-Allow-Methods`.
    pub allow_methods: Vec<String>,

    /// Headers listed in `Access-Control-Allow-Headers`.
    pub allow_headers: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allow_origin: "*".to_string(),
            allow_methods: vec!["GET".into(), "POST".into(), "OPTIONS".into()],
            allow_headers: vec!["Origin".into(), "Content-Type".into(), "Accept".into()],
        }
    }
}

/// Duplex channel configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct WebSocketConfig {
    /// Origins allowed to open a channel. Empty accepts any origin.
    pub allowed_origins: Vec<String>,
}

impl WebSocketConfig {
    /// Returns true if a handshake carrying `origin` may proceed.
    pub fn permits_origin(&self, origin: Option<&str>) -> bool {
        if self.allowed_origins.is_empty() {
            return true;
        }
        match origin {
            Some(origin) => self
                .allowed_origins
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(origin)),
            None => false,
        }
    }
}

/// Host document template configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateConfig {
    /// Path to the template file. Re-read on every render.
    pub path: String,

    /// Value bound to `BASE`.
    pub base: String,

    /// Value bound to `VS_BASE`.
    pub vs_base: String,

    /// Value bound to `WORKBENCH_AUTH_SESSION`.
    pub auth_session: String,

    /// Serialized localization bundle bound to `NLS_CONFIGURATION`.
    pub nls_configuration: String,

    /// Externally reachable base URL bound to `WORKBENCH_WEB_BASE_URL`.
    pub web_base_url: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            path: "../lib/vscode/out/vs/code/browser/workbench/workbench.html".to_string(),
            base: "/base".to_string(),
            vs_base: "/vs-base".to_string(),
            auth_session: String::new(),
            nls_configuration: "{}".to_string(),
            web_base_url: "http://localhost:8080".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
