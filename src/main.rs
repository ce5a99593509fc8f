mod config;
mod dispatch;
mod error;
mod handlers;
mod journal;
mod media;
mod middleware;
mod render;
mod response;
mod session;
mod webhook;

use crate::config::Config;
use crate::dispatch::ProgressSettings;
use crate::media::DriveClient;
use crate::session::SessionStore;
use crate::webhook::WebhookClient;
use anyhow::Context;
use axum::{
    routing::{get, post},
    Extension, Router,
};
use envconfig::Envconfig;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::init_from_env().context("Failed to load config")?;

    let webhook = WebhookClient::new(config.webhook_url.clone(), config.webhook_timeout())?;
    let drive = DriveClient::new(&config.drive_base_url, config.webhook_timeout())?;

    let sessions = SessionStore::default();
    sessions.spawn_pruner(config.session_idle());

    let app = router(webhook, drive, config.progress(), sessions);

    info!("Forwarding analyses to {}", config.webhook_url);
    info!("Listening on {}", config.listen_address);

    axum::Server::bind(
        &config
            .listen_address
            .parse()
            .context("Invalid listen address")?,
    )
    .serve(app.into_make_service())
    .await?;

    Ok(())
}

fn router(
    webhook: WebhookClient,
    drive: DriveClient,
    progress: ProgressSettings,
    sessions: SessionStore,
) -> Router {
    let journal = Router::new()
        .route("/journal", get(handlers::journal))
        .route("/journal/answer", post(handlers::journal_answer))
        .route("/journal/mood", post(handlers::journal_mood))
        .route("/journal/back", post(handlers::journal_back))
        .route("/journal/reset", post(handlers::journal_reset))
        .layer(axum::middleware::from_fn(middleware::session));

    Router::new()
        .route("/", get(handlers::index).post(handlers::analyze_form))
        .route("/api/analyze", post(handlers::analyze_api))
        .route("/audio/:file_id", get(handlers::download_audio))
        .merge(journal)
        .layer(TraceLayer::new_for_http())
        .layer(Extension(webhook))
        .layer(Extension(drive))
        .layer(Extension(progress))
        .layer(Extension(sessions))
}
