#![allow(clippy::missing_errors_doc)]

mod cors;
mod health;
mod session;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use clipscribe_config::Config;
use tower_http::trace::TraceLayer;
use transcribe::{Transcriber, TranscriptionServiceBuilder};

/// Assembled server with all routes and middleware
pub struct Server {
    router: Router,
    listen_address: SocketAddr,
}

impl Server {
    /// Build the server from configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the session resolver or the transcription
    /// provider cannot be initialized
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let service = transcribe::build_service(&config.transcription)?;
        Self::assemble(config, service)
    }

    /// Build the server around a custom transcription provider
    ///
    /// The `[transcription.provider]` section is ignored.
    pub fn with_transcriber(config: &Config, transcriber: Arc<dyn Transcriber>) -> anyhow::Result<Self> {
        let service = TranscriptionServiceBuilder::new(&config.transcription)
            .transcriber(transcriber)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to initialize transcription service: {e}"))?;

        Self::assemble(config, Arc::new(service))
    }

    fn assemble(config: &Config, service: Arc<transcribe::TranscriptionService>) -> anyhow::Result<Self> {
        let listen_address = config
            .server
            .listen_address
            .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 3000)));

        let resolver = clipscribe_session::build_resolver(&config.session)?;

        tracing::debug!(
            provider = service.provider_name(),
            path = %config.transcription.path,
            "transcription endpoint configured"
        );

        let mut app = Router::new();

        // Health check
        if config.server.health.enabled {
            app = app.route(&config.server.health.path, axum::routing::get(health::health_handler));
        }

        // Transcription
        app = app.merge(transcribe::endpoint_router(&config.transcription).with_state(service));

        // Apply middleware layers (innermost first)

        // Session resolution
        let cookie_name: Arc<str> = Arc::from(config.session.cookie_name.as_str());
        let public_paths: Arc<[String]> = Arc::from(config.session.public_paths.clone());
        app = app.layer(axum::middleware::from_fn(move |req, next| {
            let resolver = Arc::clone(&resolver);
            let cookie_name = Arc::clone(&cookie_name);
            let public_paths = Arc::clone(&public_paths);
            async move { session::session_middleware(resolver, cookie_name, public_paths, req, next).await }
        }));

        // Tracing
        app = app.layer(TraceLayer::new_for_http());

        // CORS, outermost so preflight requests never reach session resolution
        if let Some(ref cors_config) = config.server.cors {
            app = app.layer(cors::cors_layer(cors_config));
        }

        Ok(Self {
            router: app,
            listen_address,
        })
    }

    /// Get the configured listen address
    #[must_use]
    pub const fn listen_address(&self) -> SocketAddr {
        self.listen_address
    }

    /// Override the listen address
    #[must_use]
    pub const fn with_listen_address(mut self, listen_address: SocketAddr) -> Self {
        self.listen_address = listen_address;
        self
    }

    /// Consume the server and return the inner router
    ///
    /// Useful for testing when the caller manages the listener
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Start serving requests
    ///
    /// Blocks until the cancellation token is triggered.
    ///
    /// # Errors
    ///
    /// Returns an error if binding the TCP listener or serving fails
    pub async fn serve(self, shutdown: tokio_util::sync::CancellationToken) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.listen_address).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!(%local_addr, "server listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                shutdown.cancelled().await;
                tracing::info!("graceful shutdown initiated");
            })
            .await?;

        Ok(())
    }
}
