use crate::config::VisionQaConfig;
use crate::error::ApiError;
use crate::handlers;
use crate::middleware::track_http_metrics;
use crate::services::UploadStore;
use crate::services::providers::{OpenAiConfig, OpenAiVisionProvider, VisionProvider};
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Process-wide request body cap, enforced by the transport layer before any
/// handler validation runs.
pub const MAX_REQUEST_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub config: VisionQaConfig,
    pub store: Arc<UploadStore>,
    pub provider: Arc<dyn VisionProvider>,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
}

impl Application {
    /// Build the application with the OpenAI-backed provider.
    pub async fn build(config: VisionQaConfig) -> Result<Self, ApiError> {
        let provider: Arc<dyn VisionProvider> = Arc::new(OpenAiVisionProvider::new(OpenAiConfig {
            api_key: config.openai.api_key.clone(),
            model: config.openai.model.clone(),
            max_tokens: config.openai.max_tokens,
        }));

        Self::build_with_provider(config, provider).await
    }

    /// Build the application around an explicit provider. Tests use this to
    /// substitute a mock for the completion service.
    pub async fn build_with_provider(
        config: VisionQaConfig,
        provider: Arc<dyn VisionProvider>,
    ) -> Result<Self, ApiError> {
        let store = Arc::new(
            UploadStore::new(&config.storage.upload_dir)
                .await
                .map_err(|e| {
                    tracing::error!(
                        "Failed to initialize upload storage at {}: {}",
                        config.storage.upload_dir,
                        e
                    );
                    ApiError::from(e)
                })?,
        );

        tracing::info!(
            upload_dir = %store.base_path().display(),
            model = %config.openai.model,
            "Upload storage initialized"
        );

        let state = AppState {
            config: config.clone(),
            store,
            provider,
        };

        let app = Router::new()
            .route("/health", get(handlers::health_check))
            .route("/metrics", get(handlers::metrics_endpoint))
            .route("/upload", post(handlers::upload_image))
            .fallback_service(ServeDir::new(&config.static_assets.public_dir))
            .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
            .layer(from_fn(track_http_metrics))
            .layer(TraceLayer::new_for_http())
            .with_state(state);

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            ApiError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}
