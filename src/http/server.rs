//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the plugin context and install the landing page
//! - Load plugins before anything is served
//! - Wire up middleware (tracing, request ID, timeout, panic capture, metrics)
//! - Bind server to listener and shut down gracefully

use std::sync::Arc;
use std::time::Duration;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::http::pages::{self, LandingPage};
use crate::http::request::UuidRequestId;
use crate::http::response;
use crate::observability::metrics;
use crate::plugin::{LoadReport, PluginContext, PluginLoader, PluginRegistry};

/// The plugin host's HTTP server.
pub struct HttpServer {
    router: Router,
    config: Arc<ServerConfig>,
    report: LoadReport,
}

impl HttpServer {
    /// Create a server, loading every admitted plugin from `registry`.
    pub fn new(config: ServerConfig, registry: &PluginRegistry) -> Self {
        let config = Arc::new(config);

        let mut context = PluginContext::new(config.clone());
        pages::register(&mut context, LandingPage::load(&config.pages.index_file));

        let report = PluginLoader::new(&config.plugins).load(registry, &mut context);

        let router = Self::build_router(&config, context.finish());
        Self {
            router,
            config,
            report,
        }
    }

    /// Wrap the assembled routes in the middleware stack.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, routes: Router) -> Router {
        routes
            .layer(middleware::from_fn(metrics::track_requests))
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(CatchPanicLayer::custom(response::panic_responder(
                        config.debug,
                    )))
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.listener.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            debug = self.config.debug,
            plugins = self.report.loaded().count(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// What happened to each plugin at startup.
    pub fn report(&self) -> &LoadReport {
        &self.report
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}
