use std::str::FromStr;

use chrono::Utc;
use sqlx::{Sqlite, SqliteConnection, SqlitePool};

use crate::data_formats::ArticleQueryParams;
use crate::errors::RequestError;
use crate::models::Article;
use crate::pagination::Page;

use super::{begin_write, bind_params, topic_exists, user_exists, QueryBuilder, QueryParam};

const ARTICLE_FROM: &str = r#"
        FROM articles
            LEFT JOIN comments
                ON comments.article_id = articles.article_id"#;

/// Columns an article listing may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    ArticleId,
    Topic,
    Votes,
    CommentCount,
    #[default]
    CreatedAt,
    Title,
    Author,
}

impl SortColumn {
    fn as_sql(self) -> &'static str {
        match self {
            SortColumn::ArticleId => "articles.article_id",
            SortColumn::Topic => "articles.topic",
            SortColumn::Votes => "articles.votes",
            SortColumn::CommentCount => "comment_count",
            SortColumn::CreatedAt => "articles.created_at",
            SortColumn::Title => "articles.title",
            SortColumn::Author => "articles.author",
        }
    }
}

impl FromStr for SortColumn {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "article_id" => Ok(SortColumn::ArticleId),
            "topic" => Ok(SortColumn::Topic),
            "votes" => Ok(SortColumn::Votes),
            "comment_count" => Ok(SortColumn::CommentCount),
            "created_at" => Ok(SortColumn::CreatedAt),
            "title" => Ok(SortColumn::Title),
            "author" => Ok(SortColumn::Author),
            _ => Err(RequestError::BadInput("sort_by")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

impl FromStr for SortOrder {
    type Err = RequestError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        if value.eq_ignore_ascii_case("asc") {
            Ok(SortOrder::Asc)
        } else if value.eq_ignore_ascii_case("desc") {
            Ok(SortOrder::Desc)
        } else {
            Err(RequestError::BadInput("order_by"))
        }
    }
}

/// A validated article lookup: either one article by id (with its body) or a
/// filtered, sorted page of articles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArticleQuery {
    pub article_id: Option<i64>,
    pub topic: Option<String>,
    pub sort_by: SortColumn,
    pub order: SortOrder,
    pub page: Page,
}

impl ArticleQuery {
    pub fn from_params(
        article_id: Option<i64>,
        ArticleQueryParams {
            topic,
            sort_by,
            order_by,
            limit,
            p,
        }: ArticleQueryParams,
    ) -> Result<Self, RequestError> {
        let page = Page::from_params(limit.as_deref(), p.as_deref())?;
        let sort_by = sort_by
            .as_deref()
            .map(SortColumn::from_str)
            .transpose()?
            .unwrap_or_default();
        let order = order_by
            .as_deref()
            .map(SortOrder::from_str)
            .transpose()?
            .unwrap_or_default();
        Ok(Self {
            article_id,
            topic,
            sort_by,
            order,
            page,
        })
    }

    pub fn single(article_id: i64) -> Self {
        Self {
            article_id: Some(article_id),
            topic: None,
            sort_by: SortColumn::default(),
            order: SortOrder::default(),
            page: Page::default(),
        }
    }

    fn filters(&self, builder: QueryBuilder) -> QueryBuilder {
        builder
            .filter(
                "articles.article_id",
                self.article_id.map(QueryParam::Int),
            )
            .filter(
                "articles.topic",
                self.topic.clone().map(QueryParam::Text),
            )
    }

    /// Counts every article the filters match, ignoring pagination.
    pub fn count_query(&self) -> (String, Vec<QueryParam>) {
        self.filters(QueryBuilder::new("SELECT COUNT(*) FROM articles"))
            .build()
    }

    pub fn select_query(&self, offset: i64) -> (String, Vec<QueryParam>) {
        let body = if self.article_id.is_some() {
            "articles.body"
        } else {
            "NULL"
        };
        let select = format!(
            r#"
        SELECT articles.article_id,
               articles.title,
               articles.author,
               {body} AS body,
               articles.topic,
               articles.created_at,
               articles.votes,
               COUNT(comments.comment_id) AS comment_count{ARTICLE_FROM}"#
        );
        let order_by = format!(
            " ORDER BY {} {}",
            self.sort_by.as_sql(),
            self.order.as_sql()
        );
        self.filters(QueryBuilder::new(select))
            .push(" GROUP BY articles.article_id")
            .push(&order_by)
            .bind(" LIMIT ?", QueryParam::Int(self.page.limit))
            .bind(" OFFSET ?", QueryParam::Int(offset))
            .build()
    }
}

pub async fn article_exists(
    conn: &mut SqliteConnection,
    article_id: i64,
) -> Result<bool, RequestError> {
    let found = sqlx::query_scalar::<Sqlite, i64>(
        "SELECT 1 FROM articles WHERE article_id = ? LIMIT 1",
    )
    .bind(article_id)
    .fetch_optional(conn)
    .await?;
    Ok(found.is_some())
}

async fn count_articles(
    conn: &mut SqliteConnection,
    query: &ArticleQuery,
) -> Result<i64, RequestError> {
    let (sql, params) = query.count_query();
    let (count,) = bind_params(sqlx::query_as::<Sqlite, (i64,)>(&sql), params)
        .fetch_one(conn)
        .await?;
    Ok(count)
}

async fn fetch_articles(
    conn: &mut SqliteConnection,
    query: &ArticleQuery,
    offset: i64,
) -> Result<Vec<Article>, RequestError> {
    let (sql, params) = query.select_query(offset);
    let rows = bind_params(sqlx::query_as::<Sqlite, Article>(&sql), params)
        .fetch_all(conn)
        .await?;
    Ok(rows)
}

async fn get_article_in_db(
    conn: &mut SqliteConnection,
    article_id: i64,
) -> Result<Option<Article>, RequestError> {
    let rows = fetch_articles(conn, &ArticleQuery::single(article_id), 0).await?;
    Ok(rows.into_iter().next())
}

/// Runs an article query and returns the page of rows together with the
/// number of articles matched before pagination.
pub async fn list_articles_in_db(
    pool: &SqlitePool,
    query: &ArticleQuery,
) -> Result<(Vec<Article>, i64), RequestError> {
    let mut tx = pool.begin().await?;

    if let Some(topic) = &query.topic {
        if !topic_exists(&mut *tx, topic).await? {
            return Err(RequestError::not_found(topic));
        }
    }

    let total_count = count_articles(&mut *tx, query).await?;
    let offset = query.page.offset(total_count);
    let rows = fetch_articles(&mut *tx, query, offset).await?;

    tx.commit().await?;
    Ok((rows, total_count))
}

pub struct NewArticle<'a> {
    pub author: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub topic: &'a str,
}

pub async fn create_article_in_db(
    pool: &SqlitePool,
    NewArticle {
        author,
        title,
        body,
        topic,
    }: NewArticle<'_>,
) -> Result<Article, RequestError> {
    let mut tx = begin_write(pool).await?;

    if !user_exists(&mut *tx, author).await? {
        return Err(RequestError::not_found(author));
    }

    let article_id = sqlx::query_scalar::<Sqlite, i64>(
        r#"
        INSERT INTO articles (votes, author, title, body, topic, created_at)
        VALUES (0, ?, ?, ?, ?, ?)
        RETURNING article_id
        "#,
    )
    .bind(author)
    .bind(title)
    .bind(body)
    .bind(topic)
    .bind(Utc::now())
    .fetch_one(&mut *tx)
    .await?;

    let article = get_article_in_db(&mut *tx, article_id)
        .await?
        .ok_or_else(|| RequestError::not_found(format!("article id {article_id}")))?;

    tx.commit().await?;
    Ok(article)
}

/// Adds `inc_votes` to the article's votes in one statement, so concurrent
/// updates cannot overwrite each other. No returned row means no such article.
pub async fn update_article_votes_in_db(
    pool: &SqlitePool,
    article_id: i64,
    inc_votes: i64,
) -> Result<Article, RequestError> {
    let mut tx = begin_write(pool).await?;
    let not_found = || RequestError::not_found(format!("article id {article_id}"));

    sqlx::query_scalar::<Sqlite, i64>(
        r#"
        UPDATE articles
        SET votes = votes + ?
        WHERE article_id = ?
        RETURNING votes
        "#,
    )
    .bind(inc_votes)
    .bind(article_id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(not_found)?;

    let article = get_article_in_db(&mut *tx, article_id)
        .await?
        .ok_or_else(not_found)?;

    tx.commit().await?;
    Ok(article)
}

/// Deletes an article; its comments go with it.
pub async fn delete_article_in_db(pool: &SqlitePool, article_id: i64) -> Result<(), RequestError> {
    let mut tx = begin_write(pool).await?;

    if !article_exists(&mut *tx, article_id).await? {
        return Err(RequestError::not_found(format!("article id {article_id}")));
    }

    sqlx::query("DELETE FROM articles WHERE article_id = ?")
        .bind(article_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(())
}
