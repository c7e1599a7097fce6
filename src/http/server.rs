//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create Axum Router with asset routes and the dispatch fallback
//! - Wire up middleware (tracing, request ID, cross-origin wrapper)
//! - Bind server to listener and shut down on signal
//! - Dispatch each remaining request to the duplex channel or the renderer

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::InvalidHeaderValue,
    response::{Html, IntoResponse, Response},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::{ServerConfig, WorkbenchConfiguration};
use crate::http::error::AppError;
use crate::http::middleware::CorsPolicy;
use crate::http::request::{propagate_request_id, request_id, set_request_id};
use crate::http::{assets, websocket};
use crate::net::ChannelTracker;
use crate::observability::metrics;
use crate::routing::{Dispatcher, Route};
use crate::template::{Bindings, TemplateRenderer};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub workbench: Arc<WorkbenchConfiguration>,
    pub renderer: TemplateRenderer,
    pub dispatcher: Dispatcher,
    pub channels: ChannelTracker,
}

/// HTTP server for the workbench host.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
    channels: ChannelTracker,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    ///
    /// Fails only if the CORS policy cannot be expressed as header values.
    pub fn new(config: ServerConfig) -> Result<Self, InvalidHeaderValue> {
        let cors = CorsPolicy::from_config(&config.cors)?;
        let config = Arc::new(config);
        let channels = ChannelTracker::new();

        let state = AppState {
            workbench: Arc::new(config.workbench.clone()),
            renderer: TemplateRenderer::new(&config.template.path),
            dispatcher: Dispatcher::new(),
            channels: channels.clone(),
            config: config.clone(),
        };

        let router = Self::build_router(&config, state, cors);
        Ok(Self {
            router,
            config,
            channels,
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState, cors: CorsPolicy) -> Router {
        Router::new()
            .merge(assets::router(&config.assets, cors))
            .fallback(dispatch)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(set_request_id())
                    .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                        tracing::info_span!(
                            "request",
                            method = %request.method(),
                            path = %request.uri().path(),
                            request_id = %request_id(request),
                        )
                    }))
                    .layer(propagate_request_id()),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            out_root = %self.config.assets.out_root,
            extensions_root = %self.config.assets.extensions_root,
            template = %self.config.template.path,
            "HTTP server starting"
        );

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();

        // Serve with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The assembled router, for driving the server without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Live duplex channel counter.
    pub fn channels(&self) -> ChannelTracker {
        self.channels.clone()
    }
}

/// Entry point for every request outside the asset prefixes.
async fn dispatch(State(state): State<AppState>, request: Request) -> Response {
    let start = Instant::now();

    match state.dispatcher.classify(&request) {
        Route::Upgrade => {
            let response = match websocket::upgrade(&state, request).await {
                Ok(response) => response,
                Err(e) => {
                    tracing::warn!(error = %e, "Upgrade handshake failed");
                    AppError::from(e).into_response()
                }
            };
            metrics::record_request("upgrade", response.status().as_u16(), start);
            response
        }
        Route::Document => {
            let response = match render_document(&state).await {
                Ok(document) => document.into_response(),
                Err(e) => {
                    tracing::error!(
                        template = %state.renderer.path().display(),
                        error = %e,
                        "Render failed"
                    );
                    e.into_response()
                }
            };
            metrics::record_request("document", response.status().as_u16(), start);
            response
        }
    }
}

async fn render_document(state: &AppState) -> Result<Html<String>, AppError> {
    let bindings = Bindings::workbench(&state.config.template, state.workbench.clone());
    let document = state.renderer.render(&bindings).await?;
    Ok(Html(document))
}
