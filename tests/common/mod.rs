#![allow(dead_code)]

use std::{sync::Arc, time::Duration};

use nc_news::{connect_options, make_router, migrate, AppState, TextRules};
use reqwest::{Client, Response};
use serde_json::Value;
use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
use tempfile::TempDir;

const SEED: &str = include_str!("../fixtures/seed.sql");

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub pool: SqlitePool,
    _db_dir: Option<TempDir>,
}

/// Serves the router on a random local port, backed by a freshly seeded
/// in-memory database.
pub async fn spawn_app() -> TestApp {
    // One connection, kept open: every new connection to `sqlite::memory:`
    // would be a different, empty database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("open in-memory database");
    serve(pool, None).await
}

/// Like [`spawn_app`], but on a database file shared by several pooled
/// connections, so requests really do hit the database concurrently.
pub async fn spawn_app_on_file() -> TestApp {
    let dir = tempfile::tempdir().expect("create temp dir");
    let url = format!("sqlite://{}", dir.path().join("nc_news.db").display());
    let pool = SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(connect_options(&url).expect("connect options"))
        .await
        .expect("open database file");
    serve(pool, Some(dir)).await
}

async fn serve(pool: SqlitePool, db_dir: Option<TempDir>) -> TestApp {
    migrate(&pool).await.expect("run migrations");
    sqlx::raw_sql(SEED).execute(&pool).await.expect("seed database");

    let state = Arc::new(AppState {
        pool: pool.clone(),
        text_rules: TextRules::default(),
    });
    let app = make_router(state, Duration::from_secs(5));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind random port");
    let address = format!("http://{}", listener.local_addr().expect("local address"));
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server error");
    });

    TestApp {
        address,
        client: Client::new(),
        pool,
        _db_dir: db_dir,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("send request")
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("send request")
    }

    pub async fn patch(&self, path: &str, body: &Value) -> Response {
        self.client
            .patch(self.url(path))
            .json(body)
            .send()
            .await
            .expect("send request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("send request")
    }
}

pub async fn json(response: Response) -> Value {
    response.json().await.expect("json body")
}

/// Asserts the status and returns the `msg` of an error body.
pub async fn error_msg(response: Response, status: u16) -> String {
    assert_eq!(response.status().as_u16(), status);
    let body = json(response).await;
    body["msg"].as_str().expect("msg field").to_owned()
}
