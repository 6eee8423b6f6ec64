//! HTTP layer exposing question answering, voice queries and raw SQL.

pub mod routes;
pub mod types;

use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::{
    config::Settings,
    data::SqliteStore,
    nlp::QueryEngine,
    speech::{GoogleSpeechClient, Transcriber},
};

/// Largest accepted request body; sized for short voice recordings.
pub const MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<QueryEngine>,
    pub store: Arc<SqliteStore>,
    pub transcriber: Arc<dyn Transcriber>,
}

impl AppState {
    /// Wire the shared engine, the on-disk store and the configured recogniser.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let engine = QueryEngine::shared(settings)?;
        let store = SqliteStore::open(&settings.database_path)
            .with_context(|| format!("opening {}", settings.database_path.display()))?;
        let transcriber = GoogleSpeechClient::from_settings(settings)?;
        Ok(Self {
            engine,
            store: Arc::new(store),
            transcriber: Arc::new(transcriber),
        })
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(routes::health))
        .route("/api/query", post(routes::process_query))
        .route("/api/voice", post(routes::process_voice))
        .route("/api/schema", get(routes::get_schema))
        .route("/api/sql", post(routes::execute_sql))
        .route("/api/examples", get(routes::examples))
        .fallback(routes::not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(settings: Settings, host: String, port: u16) -> Result<()> {
    let state = AppState::from_settings(&settings)?;
    if settings.speech_api_key.is_none() {
        info!("SPEECH_API_KEY not set; voice queries will be rejected");
    }

    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    info!(%addr, "serving query-assistant API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router(state).into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown requested");
    }
}
