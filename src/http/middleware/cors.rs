//! Cross-origin wrapper for asset routes.
//!
//! Every response gets the configured `Access-Control-Allow-*` headers. An
//! `OPTIONS` request is answered right here with an empty 200 and never
//! reaches the file responder.
//!
//! The shipped policy allows any origin. It is a plain value built from
//! `CorsConfig`, so deployments can narrow it without code changes.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Request, State},
    http::{header, header::InvalidHeaderValue, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::config::CorsConfig;
use crate::observability::metrics;

/// Header values applied to every asset response.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    allow_origin: HeaderValue,
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, InvalidHeaderValue> {
        Ok(Self {
            allow_origin: HeaderValue::from_str(&config.allow_origin)?,
            allow_methods: HeaderValue::from_str(&config.allow_methods.join(", "))?,
            allow_headers: HeaderValue::from_str(&config.allow_headers.join(", "))?,
        })
    }

    /// Any origin; GET, POST and OPTIONS; Origin, Content-Type and Accept.
    pub fn permissive() -> Self {
        Self {
            allow_origin: HeaderValue::from_static("*"),
            allow_methods: HeaderValue::from_static("GET, POST, OPTIONS"),
            allow_headers: HeaderValue::from_static("Origin, Content-Type, Accept"),
        }
    }

    pub fn apply(&self, headers: &mut HeaderMap) {
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.clone());
        headers.insert(header::ACCESS_CONTROL_ALLOW_METHODS, self.allow_methods.clone());
        headers.insert(header::ACCESS_CONTROL_ALLOW_HEADERS, self.allow_headers.clone());
    }
}

impl Default for CorsPolicy {
    fn default() -> Self {
        Self::permissive()
    }
}

pub async fn cors_middleware(
    State(policy): State<Arc<CorsPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();

    // Preflight short-circuits before any file lookup.
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        policy.apply(response.headers_mut());
        metrics::record_request("preflight", StatusCode::OK.as_u16(), start);
        return response;
    }

    let mut response = next.run(request).await;
    policy.apply(response.headers_mut());
    metrics::record_request("asset", response.status().as_u16(), start);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_equal_permissive_policy() {
        let from_config = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let mut a = HeaderMap::new();
        let mut b = HeaderMap::new();
        from_config.apply(&mut a);
        CorsPolicy::permissive().apply(&mut b);
        assert_eq!(a, b);
        assert_eq!(a[header::ACCESS_CONTROL_ALLOW_METHODS], "GET, POST, OPTIONS");
    }

    #[test]
    fn apply_overwrites_existing_values() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("https://a"));
        CorsPolicy::permissive().apply(&mut headers);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers.get_all(header::ACCESS_CONTROL_ALLOW_ORIGIN).iter().count(), 1);
    }

    #[test]
    fn narrowed_policy_is_honored() {
        let config = CorsConfig {
            allow_origin: "https://editor.example".into(),
            allow_methods: vec!["GET".into()],
            allow_headers: vec!["Accept".into()],
        };
        let mut headers = HeaderMap::new();
        CorsPolicy::from_config(&config).unwrap().apply(&mut headers);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://editor.example");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "GET");
    }

    #[test]
    fn control_characters_are_rejected() {
        let config = CorsConfig {
            allow_origin: "bad\nvalue".into(),
            ..CorsConfig::default()
        };
        assert!(CorsPolicy::from_config(&config).is_err());
    }
}
