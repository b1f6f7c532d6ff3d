use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::{errors::RequestError, models::User};

pub async fn get_users_in_db(pool: &SqlitePool) -> Result<Vec<User>, RequestError> {
    let users = sqlx::query_as::<Sqlite, User>("SELECT username, name, avatar_url FROM users")
        .fetch_all(pool)
        .await?;
    Ok(users)
}

pub async fn get_user_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<User>, RequestError> {
    let user = sqlx::query_as::<Sqlite, User>(
        r#"
        SELECT username, name, avatar_url FROM users WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn user_exists(conn: &mut SqliteConnection, username: &str) -> Result<bool, RequestError> {
    let found = sqlx::query_scalar::<Sqlite, i64>("SELECT 1 FROM users WHERE username = ? LIMIT 1")
        .bind(username)
        .fetch_optional(conn)
        .await?;
    Ok(found.is_some())
}
