use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::{errors::RequestError, models::Topic};

use super::begin_write;

pub async fn get_topics_in_db(pool: &SqlitePool) -> Result<Vec<Topic>, RequestError> {
    let topics = sqlx::query_as::<Sqlite, Topic>("SELECT slug, description FROM topics")
        .fetch_all(pool)
        .await?;
    Ok(topics)
}

pub async fn topic_exists(conn: &mut SqliteConnection, slug: &str) -> Result<bool, RequestError> {
    let found = sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM topics WHERE slug = ? LIMIT 1")
        .bind(slug)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}

pub async fn insert_topic_in_db(
    pool: &SqlitePool,
    slug: &str,
    description: &str,
) -> Result<Topic, RequestError> {
    let mut tx = begin_write(pool).await?;

    if topic_exists(&mut *tx, slug).await? {
        return Err(RequestError::BadInput("topic already exists"));
    }

    let topic = sqlx::query_as::<Sqlite, Topic>(
        r#"
        INSERT INTO topics (slug, description)
        VALUES (?, ?)
        RETURNING slug, description
        "#,
    )
    .bind(slug)
    .bind(description)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(topic)
}
