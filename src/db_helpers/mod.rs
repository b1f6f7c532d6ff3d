use sqlx::{query::QueryAs, sqlite::SqliteArguments, Sqlite, SqlitePool, Transaction};

use crate::errors::RequestError;

mod article_helpers;
mod comment_helpers;
mod topic_helpers;
mod user_helpers;

pub use article_helpers::*;
pub use comment_helpers::*;
pub use topic_helpers::*;
pub use user_helpers::*;

/// Opens a transaction that holds the write lock from `BEGIN`. A deferred
/// transaction that reads before writing gets `SQLITE_BUSY` on the lock
/// upgrade when another writer is active, without waiting on `busy_timeout`.
async fn begin_write(pool: &SqlitePool) -> Result<Transaction<'static, Sqlite>, RequestError> {
    Ok(pool.begin_with("BEGIN IMMEDIATE").await?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryParam {
    Int(i64),
    Text(String),
}

/// Builds a statement whose `WHERE` clause depends on which filters were
/// supplied. Values always go through `?` placeholders.
struct QueryBuilder {
    query: String,
    params: Vec<QueryParam>,
    separator: &'static str,
    counter: usize,
}

impl QueryBuilder {
    fn new(initial: impl Into<String>) -> Self {
        Self {
            query: initial.into(),
            params: vec![],
            separator: " AND ",
            counter: 0,
        }
    }

    /// Adds `column = ?` when `param` is present.
    fn filter(mut self, column: &str, param: Option<QueryParam>) -> Self {
        if let Some(value) = param {
            let joiner = if self.counter == 0 {
                " WHERE "
            } else {
                self.separator
            };
            self.query.push_str(joiner);
            self.query.push_str(column);
            self.query.push_str(" = ?");
            self.params.push(value);
            self.counter += 1;
        }
        self
    }

    /// Appends trusted SQL. Only ever called with fragments chosen from fixed
    /// tables, never with request text.
    fn push(mut self, sql: &str) -> Self {
        self.query.push_str(sql);
        self
    }

    fn bind(mut self, sql: &str, param: QueryParam) -> Self {
        self.query.push_str(sql);
        self.params.push(param);
        self
    }

    fn build(self) -> (String, Vec<QueryParam>) {
        (self.query, self.params)
    }
}

fn bind_params<'q, O>(
    mut query: QueryAs<'q, Sqlite, O, SqliteArguments<'q>>,
    params: Vec<QueryParam>,
) -> QueryAs<'q, Sqlite, O, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            QueryParam::Int(value) => query.bind(value),
            QueryParam::Text(value) => query.bind(value),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_filters_means_no_where_clause() {
        let (query, params) = QueryBuilder::new("SELECT * FROM articles")
            .filter("articles.topic", None)
            .build();
        assert_eq!(query, "SELECT * FROM articles");
        assert!(params.is_empty());
    }

    #[test]
    fn filters_are_joined_with_and() {
        let (query, params) = QueryBuilder::new("SELECT * FROM articles")
            .filter("articles.article_id", Some(QueryParam::Int(3)))
            .filter("articles.topic", Some(QueryParam::Text("mitch".into())))
            .bind(" LIMIT ?", QueryParam::Int(10))
            .build();
        assert_eq!(
            query,
            "SELECT * FROM articles WHERE articles.article_id = ? AND articles.topic = ? LIMIT ?"
        );
        assert_eq!(
            params,
            vec![
                QueryParam::Int(3),
                QueryParam::Text("mitch".into()),
                QueryParam::Int(10)
            ]
        );
    }
}
