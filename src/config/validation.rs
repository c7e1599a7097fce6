//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate addresses, URL prefixes, CORS tokens and URLs
//! - Keep quotes and markup out of template values bound into HTML
//! - Check that endpoint paths in the workbench configuration stay relative
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServerConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use axum::http::{HeaderName, HeaderValue, Method};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use url::Url;

use crate::config::schema::ServerConfig;
use crate::config::workbench::WorkbenchConfiguration;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("{field}: prefix {value:?} must be a literal sub-path starting with '/'")]
    InvalidPrefix { field: &'static str, value: String },

    #[error("assets: prefixes must differ, both are {0:?}")]
    DuplicatePrefix(String),

    #[error("assets: prefix {inner:?} lies under {outer:?}")]
    NestedPrefix { outer: String, inner: String },

    #[error("{field}: {value:?} may not contain '\"', '\'', '<', '>' or '&'")]
    UnsafeMarkup { field: &'static str, value: String },

    #[error("cors.allow_methods: {0:?} is not an HTTP method")]
    InvalidMethod(String),

    #[error("cors.allow_headers: {0:?} is not a header name")]
    InvalidHeader(String),

    #[error("cors.allow_origin: {0:?} is not a valid header value")]
    InvalidOrigin(String),

    #[error("{field}: {value:?} is not an absolute URL")]
    InvalidUrl { field: &'static str, value: String },

    #[error("{field}: {value:?} must be relative to the document base")]
    AbsoluteEndpoint { field: &'static str, value: String },

    #[error("workbench.productConfiguration.proxyEndpointTemplate: {0:?} lacks {{{{port}}}}")]
    MissingPortPlaceholder(String),

    #[error("template.nls_configuration: not valid JSON")]
    InvalidNlsConfiguration,

    #[error("observability.log_level: {0:?} is not a valid filter")]
    InvalidLogLevel(String),
}

/// Validate a parsed configuration, collecting every problem found.
pub fn validate_config(config: &ServerConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(&mut errors, "listener.bind_address", &config.listener.bind_address);
    if config.observability.metrics_enabled {
        check_address(
            &mut errors,
            "observability.metrics_address",
            &config.observability.metrics_address,
        );
    }

    check_prefix(&mut errors, "assets.out_prefix", &config.assets.out_prefix);
    check_prefix(
        &mut errors,
        "assets.extensions_prefix",
        &config.assets.extensions_prefix,
    );
    let out = config.assets.out_prefix.trim_end_matches('/');
    let extensions = config.assets.extensions_prefix.trim_end_matches('/');
    if out == extensions {
        errors.push(ValidationError::DuplicatePrefix(config.assets.out_prefix.clone()));
    } else if is_nested(out, extensions) || is_nested(extensions, out) {
        errors.push(ValidationError::NestedPrefix {
            outer: out.min(extensions).to_string(),
            inner: out.max(extensions).to_string(),
        });
    }

    if HeaderValue::from_str(&config.cors.allow_origin).is_err() {
        errors.push(ValidationError::InvalidOrigin(config.cors.allow_origin.clone()));
    }
    for method in &config.cors.allow_methods {
        if Method::from_bytes(method.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidMethod(method.clone()));
        }
    }
    for header in &config.cors.allow_headers {
        if HeaderName::from_bytes(header.as_bytes()).is_err() {
            errors.push(ValidationError::InvalidHeader(header.clone()));
        }
    }

    check_url(&mut errors, "template.web_base_url", &config.template.web_base_url);
    let template = &config.template;
    for (field, value) in [
        ("template.base", &template.base),
        ("template.vs_base", &template.vs_base),
        ("template.auth_session", &template.auth_session),
        ("template.web_base_url", &template.web_base_url),
    ] {
        if value.contains(['"', '\'', '<', '>', '&']) {
            errors.push(ValidationError::UnsafeMarkup {
                field,
                value: value.clone(),
            });
        }
    }
    if serde_json::from_str::<serde_json::Value>(&config.template.nls_configuration).is_err() {
        errors.push(ValidationError::InvalidNlsConfiguration);
    }

    if EnvFilter::try_new(&config.observability.log_level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    check_workbench(&mut errors, &config.workbench);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_workbench(errors: &mut Vec<ValidationError>, workbench: &WorkbenchConfiguration) {
    let product = &workbench.product_configuration;
    let endpoints = [
        ("workbench.webviewEndpoint", &workbench.webview_endpoint),
        ("workbench.productConfiguration.rootEndpoint", &product.root_endpoint),
        ("workbench.productConfiguration.updateEndpoint", &product.update_endpoint),
        ("workbench.productConfiguration.logoutEndpoint", &product.logout_endpoint),
        (
            "workbench.productConfiguration.proxyEndpointTemplate",
            &product.proxy_endpoint_template,
        ),
        (
            "workbench.productConfiguration.serviceWorker.scope",
            &product.service_worker.scope,
        ),
        (
            "workbench.productConfiguration.serviceWorker.path",
            &product.service_worker.path,
        ),
    ];
    for (field, value) in endpoints {
        if !is_relative(value) {
            errors.push(ValidationError::AbsoluteEndpoint {
                field,
                value: value.clone(),
            });
        }
    }

    if !product.proxy_endpoint_template.contains("{{port}}") {
        errors.push(ValidationError::MissingPortPlaceholder(
            product.proxy_endpoint_template.clone(),
        ));
    }

    let gallery = &product.extensions_gallery;
    let urls = [
        ("workbench.extensionsGallery.serviceUrl", &gallery.service_url),
        ("workbench.extensionsGallery.itemUrl", &gallery.item_url),
        (
            "workbench.extensionsGallery.resourceUrlTemplate",
            &gallery.resource_url_template,
        ),
        ("workbench.extensionsGallery.controlUrl", &gallery.control_url),
        (
            "workbench.extensionsGallery.recommendationsUrl",
            &gallery.recommendations_url,
        ),
    ];
    for (field, value) in urls {
        if !value.is_empty() {
            check_url(errors, field, value);
        }
    }
}

fn check_address(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

/// A prefix is mounted with `nest_service`, so every segment must be a plain
/// literal: no `:name`/`*name` captures, no braces, no empty segments.
fn check_prefix(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    let literal = value
        .strip_prefix('/')
        .map(|rest| rest.trim_end_matches('/'))
        .filter(|rest| !rest.is_empty())
        .is_some_and(|rest| {
            rest.split('/').all(|segment| {
                !segment.is_empty()
                    && !segment.starts_with([':', '*'])
                    && !segment.contains(['{', '}', '*'])
            })
        });
    if !literal {
        errors.push(ValidationError::InvalidPrefix {
            field,
            value: value.to_string(),
        });
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}

fn is_nested(outer: &str, inner: &str) -> bool {
    !outer.is_empty()
        && inner
        .strip_prefix(outer)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn is_relative(path: &str) -> bool {
    !path.starts_with('/') && !path.contains("://")
}
