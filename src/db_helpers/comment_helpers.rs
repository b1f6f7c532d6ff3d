use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::{errors::RequestError, models::Comment, pagination::Page};

use super::{article_exists, begin_write, user_exists};

const COMMENT_COLUMNS: &str = "comment_id, body, author, article_id, created_at, votes";

fn article_not_found(article_id: i64) -> RequestError {
    RequestError::not_found(format!("article id {article_id}"))
}

fn comment_not_found(comment_id: i64) -> RequestError {
    RequestError::not_found(format!("comment id {comment_id}"))
}

async fn comment_exists(
    conn: &mut SqliteConnection,
    comment_id: i64,
) -> Result<bool, RequestError> {
    let found =
        sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM comments WHERE comment_id = ? LIMIT 1")
            .bind(comment_id)
            .fetch_optional(conn)
            .await?;
    Ok(found.is_some())
}

/// Comments on an article, oldest comment id first.
pub async fn get_comments_for_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
    page: Page,
) -> Result<Vec<Comment>, RequestError> {
    let mut tx = pool.begin().await?;

    if !article_exists(&mut *tx, article_id).await? {
        return Err(article_not_found(article_id));
    }

    let row_count =
        sqlx::query_scalar::<Sqlite, i64>("SELECT COUNT(*) FROM comments WHERE article_id = ?")
            .bind(article_id)
            .fetch_one(&mut *tx)
            .await?;

    let query = format!(
        r#"
        SELECT {COMMENT_COLUMNS}
        FROM comments
        WHERE article_id = ?
        ORDER BY comment_id ASC
        LIMIT ? OFFSET ?
        "#
    );
    let comments = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(article_id)
        .bind(page.limit)
        .bind(page.offset(row_count))
        .fetch_all(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(comments)
}

pub async fn add_comment_to_article_in_db(
    pool: &SqlitePool,
    article_id: i64,
    username: &str,
    body: &str,
) -> Result<Comment, RequestError> {
    let mut tx = begin_write(pool).await?;

    if !article_exists(&mut *tx, article_id).await? {
        return Err(article_not_found(article_id));
    }
    if !user_exists(&mut *tx, username).await? {
        return Err(RequestError::not_found(username));
    }

    let query = format!(
        r#"
        INSERT INTO comments (votes, body, author, article_id, created_at)
        VALUES (0, ?, ?, ?, ?)
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(body)
        .bind(username)
        .bind(article_id)
        .bind(Utc::now())
        .fetch_one(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(comment)
}

/// Adds `inc_votes` to the comment's votes in one statement. No returned row
/// means no such comment.
pub async fn update_comment_votes_in_db(
    pool: &SqlitePool,
    comment_id: i64,
    inc_votes: i64,
) -> Result<Comment, RequestError> {
    let mut tx = begin_write(pool).await?;

    let query = format!(
        r#"
        UPDATE comments
        SET votes = votes + ?
        WHERE comment_id = ?
        RETURNING {COMMENT_COLUMNS}
        "#
    );
    let comment = sqlx::query_as::<Sqlite, Comment>(&query)
        .bind(inc_votes)
        .bind(comment_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| comment_not_found(comment_id))?;

    tx.commit().await?;
    Ok(comment)
}

pub async fn delete_comment_in_db(pool: &SqlitePool, comment_id: i64) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;

    if !comment_exists(&mut *tx, comment_id).await? {
        return Err(comment_not_found(comment_id));
    }

    sqlx::query("DELETE FROM comments WHERE comment_id = ?")
        .bind(comment_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
