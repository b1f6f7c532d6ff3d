use serde::{Deserialize, Serialize};

// Fields are optional so that missing keys reach validation and come back as
// "bad request" rather than as an extractor rejection.

// ----------------- Query Params -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct ArticleQueryParams {
    pub topic: Option<String>,
    pub sort_by: Option<String>,
    pub order_by: Option<String>,
    pub limit: Option<String>,
    pub p: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct PageQueryParams {
    pub limit: Option<String>,
    pub p: Option<String>,
}

// ----------------- Topic Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreateTopicRequest {
    pub slug: Option<String>,
    pub description: Option<String>,
}

// ----------------- Article Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CreateArticleRequest {
    pub author: Option<String>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub topic: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct VoteRequest {
    pub inc_votes: Option<i64>,
}

// ----------------- Comment Request -----------------
#[derive(Deserialize, Serialize, Debug, Default)]
#[serde(default)]
pub struct CommentRequest {
    pub username: Option<String>,
    pub body: Option<String>,
}
