use serde::{Deserialize, Serialize};

use crate::{errors::RequestError, models::Article};

/// `articles` is a single object when one article was asked for by id and a
/// list otherwise.
#[derive(Deserialize, Serialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum ArticleListing {
    One(Article),
    Many(Vec<Article>),
}

#[derive(Deserialize, Serialize, Debug, PartialEq)]
pub struct ArticlesResponse {
    pub articles: ArticleListing,
    /// Number of matches before pagination. Only sent with lists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<i64>,
}

impl ArticlesResponse {
    /// Shapes the rows of an article query. An empty list is a valid answer
    /// to a filtered listing; an id lookup with no row is not.
    pub fn new(
        article_id: Option<i64>,
        rows: Vec<Article>,
        total_count: i64,
    ) -> Result<Self, RequestError> {
        match article_id {
            Some(id) => {
                let article = rows
                    .into_iter()
                    .next()
                    .ok_or_else(|| RequestError::not_found(format!("article id {id}")))?;
                Ok(ArticlesResponse {
                    articles: ArticleListing::One(article),
                    total_count: None,
                })
            }
            None => Ok(ArticlesResponse {
                articles: ArticleListing::Many(rows),
                total_count: Some(total_count),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    use super::*;

    fn article(article_id: i64) -> Article {
        Article {
            article_id,
            title: "Sony_Vaio".to_string(),
            author: "icellusedkars".to_string(),
            body: None,
            topic: "mitch".to_string(),
            created_at: Utc.with_ymd_and_hms(2020, 10, 16, 5, 3, 0).unwrap(),
            votes: 0,
            comment_count: 0,
        }
    }

    #[test]
    fn id_lookup_returns_an_object() {
        let response = ArticlesResponse::new(Some(2), vec![article(2)], 1).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["articles"]["article_id"], json!(2));
        assert!(value.get("total_count").is_none());
    }

    #[test]
    fn id_lookup_without_rows_is_not_found() {
        let err = ArticlesResponse::new(Some(20), vec![], 0).unwrap_err();
        assert_eq!(err.to_string(), "article id 20 not found");
    }

    #[test]
    fn listing_with_one_row_stays_a_list() {
        let response = ArticlesResponse::new(None, vec![article(5)], 1).unwrap();
        let value = serde_json::to_value(&response).unwrap();
        assert!(value["articles"].is_array());
        assert_eq!(value["total_count"], json!(1));
    }

    #[test]
    fn empty_listing_is_an_empty_list() {
        let response = ArticlesResponse::new(None, vec![], 0).unwrap();
        assert_eq!(response.articles, ArticleListing::Many(vec![]));
        assert_eq!(response.total_count, Some(0));
    }
}
