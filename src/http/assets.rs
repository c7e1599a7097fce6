//! Static asset responder.
//!
//! Each asset root is mounted under its URL prefix with the prefix stripped
//! before lookup. `ServeDir` rejects paths that escape the root and answers
//! directories with their `index.html`. Every method other than `HEAD` is
//! looked up as `GET`; `OPTIONS` never gets this far.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request},
    handler::HandlerWithoutStateExt,
    http::Method,
    middleware, Router,
};
use tower_http::services::ServeDir;

use crate::config::AssetsConfig;
use crate::http::error::{AppError, AssetNotFound};
use crate::http::middleware::{cors_middleware, CorsPolicy};

/// Router serving both asset roots behind the cross-origin wrapper.
pub fn router<S>(config: &AssetsConfig, cors: CorsPolicy) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    tracing::debug!(
        out_root = %config.out_root,
        extensions_root = %config.extensions_root,
        "Mounting asset roots"
    );

    let out = ServeDir::new(&config.out_root).not_found_service(asset_not_found.into_service());
    let extensions = ServeDir::new(&config.extensions_root)
        .not_found_service(asset_not_found.into_service());

    Router::new()
        .nest_service(mount_point(&config.out_prefix), out)
        .nest_service(mount_point(&config.extensions_prefix), extensions)
        .layer(middleware::map_request(read_as_get))
        .layer(middleware::from_fn_with_state(Arc::new(cors), cors_middleware))
}

async fn read_as_get(mut request: Request) -> Request {
    if request.method() != Method::HEAD && request.method() != Method::GET {
        *request.method_mut() = Method::GET;
    }
    request
}

async fn asset_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    tracing::debug!(path = %uri.path(), "Asset not found");
    AppError::from(AssetNotFound {
        path: uri.path().to_string(),
    })
}

fn mount_point(prefix: &str) -> &str {
    prefix.trim_end_matches('/')
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn fixture() -> (tempfile::TempDir, AssetsConfig) {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let extensions = dir.path().join("extensions");
        std::fs::create_dir_all(out.join("vs")).unwrap();
        std::fs::create_dir_all(extensions.join("theme")).unwrap();
        std::fs::write(out.join("vs/code.js"), "console.log('code');").unwrap();
        std::fs::write(extensions.join("theme/package.json"), "{\"name\":\"theme\"}").unwrap();
        std::fs::write(dir.path().join("secret.txt"), "secret").unwrap();

        let config = AssetsConfig {
            out_root: out.to_string_lossy().into_owned(),
            extensions_root: extensions.to_string_lossy().into_owned(),
            ..AssetsConfig::default()
        };
        (dir, config)
    }

    async fn send(router: Router, method: Method, uri: &str) -> axum::response::Response {
        router
            .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn serves_file_with_prefix_stripped() {
        let (_dir, config) = fixture();
        let response = send(router(&config, CorsPolicy::permissive()), Method::GET, "/out/vs/code.js").await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert!(response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .contains("javascript"));
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "console.log('code');");
    }

    #[tokio::test]
    async fn serves_extensions_root() {
        let (_dir, config) = fixture();
        let response = send(
            router(&config, CorsPolicy::permissive()),
            Method::GET,
            "/extensions/theme/package.json",
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "{\"name\":\"theme\"}");
    }

    #[tokio::test]
    async fn missing_file_is_not_found_with_cors() {
        let (_dir, config) = fixture();
        let response = send(router(&config, CorsPolicy::permissive()), Method::GET, "/out/vs/nope.js").await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(body, "/out/vs/nope.js: asset not found");
    }

    #[tokio::test]
    async fn traversal_outside_root_is_rejected() {
        let (_dir, config) = fixture();
        for uri in ["/out/../secret.txt", "/out/%2e%2e/secret.txt", "/out/vs/..%2f..%2fsecret.txt"] {
            let response = send(router(&config, CorsPolicy::permissive()), Method::GET, uri).await;
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
        }
    }

    #[tokio::test]
    async fn preflight_never_touches_the_filesystem() {
        let config = AssetsConfig {
            out_root: "/nonexistent/out".into(),
            extensions_root: "/nonexistent/extensions".into(),
            ..AssetsConfig::default()
        };
        for uri in ["/out/vs/code.js", "/extensions/anything"] {
            let response = send(router(&config, CorsPolicy::permissive()), Method::OPTIONS, uri).await;
            assert_eq!(response.status(), StatusCode::OK);
            assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_HEADERS], "Origin, Content-Type, Accept");
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert!(body.is_empty());
        }
    }

    #[tokio::test]
    async fn any_method_reads_the_file() {
        let (_dir, config) = fixture();
        for method in [Method::POST, Method::PUT, Method::DELETE] {
            let response = send(
                router(&config, CorsPolicy::permissive()),
                method.clone(),
                "/out/vs/code.js",
            )
            .await;
            assert_eq!(response.status(), StatusCode::OK, "{method}");
            assert_eq!(response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
            let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            assert_eq!(body, "console.log('code');");
        }
    }

    #[tokio::test]
    async fn head_keeps_an_empty_body() {
        let (_dir, config) = fixture();
        let response = send(router(&config, CorsPolicy::permissive()), Method::HEAD, "/out/vs/code.js").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn custom_prefixes_are_honored() {
        let (_dir, mut config) = fixture();
        config.out_prefix = "/static/".into();
        let response = send(router(&config, CorsPolicy::permissive()), Method::GET, "/static/vs/code.js").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
