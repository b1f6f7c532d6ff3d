mod common;

use std::collections::HashSet;

use common::{json, spawn_app_on_file, TestApp};
use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::task::JoinSet;

enum Method {
    Post,
    Patch,
}

/// Fires `count` identical requests at once and returns every status and body.
async fn send_all(
    app: &TestApp,
    method: Method,
    path: &str,
    body: Value,
    count: usize,
) -> Vec<(StatusCode, Value)> {
    let mut requests = JoinSet::new();
    for _ in 0..count {
        let request = match method {
            Method::Post => app.client.post(app.url(path)),
            Method::Patch => app.client.patch(app.url(path)),
        };
        let body = body.clone();
        requests.spawn(async move {
            let response = request.json(&body).send().await.expect("send request");
            let status = response.status();
            (status, response.json::<Value>().await.expect("json body"))
        });
    }

    let mut results = Vec::with_capacity(count);
    while let Some(result) = requests.join_next().await {
        results.push(result.expect("request task"));
    }
    results
}

#[tokio::test]
async fn concurrent_article_votes_all_apply() {
    let app = spawn_app_on_file().await;
    let vote = json!({ "inc_votes": 1 });
    let results = send_all(&app, Method::Patch, "/api/articles/3", vote, 40).await;

    for (status, body) in &results {
        assert_eq!(*status, StatusCode::OK, "{body}");
    }
    let body = json(app.get("/api/articles/3").await).await;
    assert_eq!(body["articles"]["votes"], json!(40));
}

#[tokio::test]
async fn concurrent_comment_votes_all_apply() {
    let app = spawn_app_on_file().await;
    let vote = json!({ "inc_votes": -1 });
    let results = send_all(&app, Method::Patch, "/api/comments/1", vote, 30).await;

    for (status, body) in &results {
        assert_eq!(*status, StatusCode::OK, "{body}");
    }
    let votes: i64 = sqlx::query_scalar("SELECT votes FROM comments WHERE comment_id = 1")
        .fetch_one(&app.pool)
        .await
        .unwrap();
    assert_eq!(votes, 16 - 30);
}

#[tokio::test]
async fn concurrent_comment_posts_are_all_created() {
    let app = spawn_app_on_file().await;
    let comment = json!({ "username": "lurker", "body": "Same thought, many times" });
    let results = send_all(&app, Method::Post, "/api/articles/1/comments", comment, 20).await;

    let mut ids = HashSet::new();
    for (status, body) in &results {
        assert_eq!(*status, StatusCode::CREATED, "{body}");
        ids.insert(body["comment"]["comment_id"].as_i64().expect("comment_id"));
    }
    assert_eq!(ids.len(), 20);

    let body = json(app.get("/api/articles/1").await).await;
    assert_eq!(body["articles"]["comment_count"], json!(11 + 20));
}

#[tokio::test]
async fn concurrent_duplicate_topics_create_exactly_one() {
    let app = spawn_app_on_file().await;
    let topic = json!({ "slug": "dogs", "description": "Not cats" });
    let results = send_all(&app, Method::Post, "/api/topics", topic, 10).await;

    let count = |wanted: StatusCode| results.iter().filter(|(status, _)| *status == wanted).count();
    let (created, rejected) = (count(StatusCode::CREATED), count(StatusCode::BAD_REQUEST));
    assert_eq!((created, rejected), (1, 9));
}
