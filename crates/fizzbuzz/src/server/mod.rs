mod cli;
mod error;
mod request;
mod routes;

pub use cli::{Environment, ServeOptions};

use error::ApiError;

use crate::prelude::{eprintln, *};
use crate::service::{FizzBuzzService, StatisticsService};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    pub service: FizzBuzzService,
    pub environment: Environment,
}

impl AppState {
    pub fn new(service: FizzBuzzService, environment: Environment) -> Self {
        Self {
            service,
            environment,
        }
    }

    /// Wrap an unexpected failure, with debug details outside production.
    pub fn internal(&self, source: Error) -> ApiError {
        ApiError::Internal {
            source,
            debug: self.environment.is_dev(),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/fizzbuzz",
            post(routes::fizzbuzz_handler).fallback(routes::method_not_allowed),
        )
        .route(
            "/api/fizzbuzz/stats",
            get(routes::stats_handler).fallback(routes::method_not_allowed),
        )
        .fallback(routes::not_found)
        .layer(cors)
        .with_state(state)
}

pub async fn run(options: ServeOptions, global: crate::Global) -> Result<()> {
    let statistics = StatisticsService::open(global.stats_file.clone(), global.cache_ttl());
    let state = AppState::new(FizzBuzzService::new(statistics), options.environment);

    let addr = f!("{}:{}", options.host, options.port);

    if global.verbose {
        eprintln!("Statistics file: {}", global.stats_file.display());
        eprintln!("POST endpoint: http://{}/api/fizzbuzz", addr);
        eprintln!("Stats endpoint: http://{}/api/fizzbuzz/stats", addr);
    }

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| eyre!("Failed to bind to {}: {}", addr, e))?;

    log::info!(
        "fizzbuzz listening on http://{addr} ({:?} environment)",
        options.environment
    );

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| eyre!("Server error: {e}"))?;

    log::info!("fizzbuzz server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
