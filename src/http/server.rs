//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with both handlers
//! - Wire up middleware (request ID, access log, default headers,
//!   compression, body limit)
//! - Bind server to listener and shut down gracefully

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderName, HeaderValue},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    compression::{
        predicate::{DefaultPredicate, Predicate, SizeAbove},
        CompressionLayer,
    },
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use crate::config::AppConfig;
use crate::http::handlers;
use crate::http::middleware::rank_encodings;
use crate::lifecycle::signals::shutdown_signal;
use crate::optimizer::{ImageOptimizer, JpegOptimizer};

/// Header carried by every response.
pub const X_ENGINE: HeaderName = HeaderName::from_static("x-engine");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub optimizer: Arc<dyn ImageOptimizer>,
}

/// HTTP server for the demo.
pub struct HttpServer {
    router: Router,
    config: Arc<AppConfig>,
}

impl HttpServer {
    /// Create a server backed by the default [`JpegOptimizer`].
    pub fn new(config: AppConfig) -> Self {
        Self::with_optimizer(config, Arc::new(JpegOptimizer::new()))
    }

    /// Create a server backed by the given optimizer.
    pub fn with_optimizer(config: AppConfig, optimizer: Arc<dyn ImageOptimizer>) -> Self {
        let config = Arc::new(config);
        let state = AppState {
            config: config.clone(),
            optimizer,
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    ///
    /// Layers run outermost-last: the deflate layer sees the response
    /// first, so gzip only applies when deflate did not. `rank_encodings`
    /// hides deflate from that layer when the client ranks gzip higher.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let engine = HeaderValue::from_str(&config.http.engine_header).unwrap_or_else(|_| {
            tracing::warn!(
                value = %config.http.engine_header,
                "Invalid X-Engine header value, using default"
            );
            HeaderValue::from_static("axum")
        });

        let deflate = CompressionLayer::new()
            .no_gzip()
            .compress_when(DefaultPredicate::new().and(SizeAbove::new(config.http.deflate_min_size)));
        let gzip = CompressionLayer::new().no_deflate();

        Router::new()
            .route("/", get(handlers::index))
            .route("/optimize", post(handlers::optimize))
            .with_state(state)
            .layer(DefaultBodyLimit::max(config.http.max_body_size))
            .layer(deflate)
            .layer(middleware::from_fn(rank_encodings))
            .layer(gzip)
            .layer(SetResponseHeaderLayer::overriding(X_ENGINE, engine))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
    }

    /// The fully layered router, for in-process testing.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener until an
    /// OS signal arrives or `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            mode = ?self.config.page.mode,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal(shutdown))
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
