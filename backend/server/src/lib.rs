//! Documentation of a review sentiment backend.
//!
//!
//!
//! # General Infrastructure
//! - Web client posts reviews to this server as JSON
//! - Server asks the inference container (fine-tuned DistilBERT) for a sentiment label
//! - Sentences are filed under aspects by keyword lookup, each aspect gets its own label
//! - Result is written to Redis and returned to the client
//! - Containers talk to each other using internal names (`redis`, `inference`)
//!
//!
//!
//! # Endpoints
//! - `GET /health`: liveness plus datastore check
//! - `POST /analyze`: analyse one review, stored unless `persist` is false
//! - `POST /analyze/batch`: analyse and store many, all or nothing on validation
//! - `GET /reviews`: newest first, `?offset=&limit=`
//! - `GET /reviews/{id}`, `DELETE /reviews/{id}`
//! - `GET /stats`: counts and percentages from the counter hash
//!
//!
//!
//! # Notes
//!
//! ## Neutral
//! The model is binary. Anything under `NEUTRAL_THRESHOLD` confidence is reported
//! as neutral instead of forcing a side.
//!
//! ## Stats
//! Stats are never computed by scanning rows. Every write bumps counters in the same
//! transaction, `/stats` reads one hash.
//!
//! ## Offline
//! `STORE=memory CLASSIFIER=lexicon` runs without Redis or the model, handy for the
//! frontend folks.
//!
//!
//!
//! # Setup
//!
//! View current docs.
//! ```sh
//! cargo doc --open
//! ```
//!
//! Run locally without dependencies.
//! ```sh
//! STORE=memory CLASSIFIER=lexicon RUST_LOG=info cargo run -p backend
//! ```
use std::{sync::Arc, time::Duration};

use anyhow::Error;
use axum::{
    Router,
    http::{Method, header::CONTENT_TYPE},
    routing::{get, post},
};

use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{self, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

pub mod analysis;
pub mod aspects;
pub mod config;
pub mod database;
pub mod error;
pub mod lexicon;
pub mod memory;
pub mod routes;
pub mod sentiment;
pub mod state;
pub mod stats;
pub mod utils;

use config::{AllowedOrigin, Config};
use routes::{
    analyze_handler, batch_handler, delete_handler, health_handler, review_handler,
    reviews_handler, stats_handler,
};
use state::State;

pub async fn start_server() -> Result<(), Error> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Loading config...");
    let config = Config::load()?;

    info!("Initializing state...");
    let state = State::new(config).await?;

    info!("Starting server...");

    let app = app(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn app(state: Arc<State>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze", post(analyze_handler))
        .route("/analyze/batch", post(batch_handler))
        .route("/reviews", get(reviews_handler))
        .route("/reviews/{id}", get(review_handler).delete(delete_handler))
        .route("/stats", get(stats_handler))
        .layer(cors(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors(config: &Config) -> CorsLayer {
    let origin = match &config.allowed_origin {
        AllowedOrigin::Any => cors::AllowOrigin::any(),
        AllowedOrigin::Exact(value) => cors::AllowOrigin::exact(value.clone()),
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                warn!("Failed to install signal handler: {e}");
                std::future::pending::<()>().await;
            }
        }

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
