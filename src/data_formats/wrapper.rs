use serde::{Deserialize, Serialize};

use crate::models::{Article, Comment, Topic, User};

#[derive(Debug, Deserialize, Serialize)]
pub struct TopicWrapper {
    pub topic: Topic,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleTopicsWrapper {
    pub topics: Vec<Topic>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct UserWrapper {
    pub user: User,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleUsersWrapper {
    pub users: Vec<User>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ArticleWrapper {
    pub article: Article,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentWrapper {
    pub comment: Comment,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MultipleCommentsWrapper {
    pub comments: Vec<Comment>,
}
