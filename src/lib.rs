mod config;
mod data_formats;
mod db_helpers;
mod errors;
mod extract;
mod handlers;
mod models;
mod pagination;
mod timeout;
mod validation;

use std::{str::FromStr, sync::Arc, time::Duration};

use anyhow::Context;
pub use anyhow::Result;
use axum::http::StatusCode;
use axum::{middleware, routing::*, Extension, Json, Router};
use handlers::*;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use config::Config;
pub use data_formats::*;
pub use errors::{RequestError, RequestErrorJson};
pub use models::*;
pub use pagination::calc_offset;
pub use timeout::enforce_timeout;
pub use validation::{is_positive_integer, TextRules};

pub type JsonResponse<T> = (StatusCode, Json<T>);

/// How long a write waits for another connection's lock before failing.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Everything a handler needs, shared across requests.
pub struct AppState {
    pub pool: SqlitePool,
    pub text_rules: TextRules,
}

pub async fn run_app(config: Config) -> Result<()> {
    let pool = init_db(&config.database_url).await?;
    let state = Arc::new(AppState {
        pool,
        text_rules: config.text_rules,
    });
    let app = make_router(state, config.request_timeout);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind to {}", config.bind_address))?;
    tracing::info!(address = %config.bind_address, "server started");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

pub fn connect_options(db_url: &str) -> Result<SqliteConnectOptions> {
    let options = SqliteConnectOptions::from_str(db_url)
        .with_context(|| format!("Invalid database url {db_url}"))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(BUSY_TIMEOUT);
    Ok(options)
}

pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    tracing::info!(db_url, "connecting to database");
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options(db_url)?)
        .await
        .context("Failed to connect to database")?;
    migrate(&pool).await?;
    Ok(pool)
}

pub async fn migrate(pool: &SqlitePool) -> Result<()> {
    tracing::info!("running migrations");
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .context("Failed to run migrations")?;
    Ok(())
}

pub fn make_router(state: Arc<AppState>, request_timeout: Duration) -> Router {
    Router::new()
        .route("/api", get(get_api))
        .route("/api/topics", get(get_topics).post(post_topic))
        .route("/api/articles", get(get_articles).post(post_article))
        .route(
            "/api/articles/{article_id}",
            get(get_article).patch(patch_article).delete(delete_article),
        )
        .route(
            "/api/articles/{article_id}/comments",
            get(get_article_comments).post(post_article_comment),
        )
        .route(
            "/api/comments/{comment_id}",
            patch(patch_comment).delete(delete_comment),
        )
        .route("/api/users", get(get_users))
        .route("/api/users/{username}", get(get_user))
        .fallback(not_found)
        .layer(Extension(state))
        .layer(middleware::from_fn_with_state(
            request_timeout,
            enforce_timeout,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        tracing::error!(%error, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
