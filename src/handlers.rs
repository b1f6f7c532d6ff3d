use std::sync::Arc;

use axum::{
    extract::Path,
    http::{header, StatusCode, Uri},
    response::IntoResponse,
    Extension, Json,
};

use crate::{
    data_formats::{
        ArticleQueryParams, ArticleWrapper, ArticlesResponse, CommentRequest, CommentWrapper,
        CreateArticleRequest, CreateTopicRequest, MultipleCommentsWrapper, MultipleTopicsWrapper,
        MultipleUsersWrapper, PageQueryParams, TopicWrapper, UserWrapper, VoteRequest,
    },
    db_helpers::{
        add_comment_to_article_in_db, create_article_in_db, delete_article_in_db,
        delete_comment_in_db, get_comments_for_article_in_db, get_topics_in_db,
        get_user_by_username, get_users_in_db, insert_topic_in_db, list_articles_in_db,
        update_article_votes_in_db, update_comment_votes_in_db, ArticleQuery, NewArticle,
    },
    errors::RequestError,
    extract::{ValidJson, ValidQuery},
    pagination::Page,
    validation::require_positive_integer,
    AppState,
};

type JsonResult<T> = Result<Json<T>, RequestError>;
type CreatedResult<T> = Result<(StatusCode, Json<T>), RequestError>;

const ENDPOINTS: &str = include_str!("../endpoints.json");

// ----------------- Helper Handlers -----------------
pub async fn get_api() -> impl IntoResponse {
    ([(header::CONTENT_TYPE, "application/json")], ENDPOINTS)
}

pub async fn not_found(uri: Uri) -> RequestError {
    tracing::debug!(path = uri.path(), "no route");
    RequestError::not_found("path")
}

fn require_inc_votes(inc_votes: Option<i64>) -> Result<i64, RequestError> {
    inc_votes.ok_or(RequestError::BadInput("inc_votes"))
}

// ----------------- Topic Handlers -----------------
pub async fn get_topics(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResult<MultipleTopicsWrapper> {
    let topics = get_topics_in_db(&state.pool).await?;
    Ok(Json(MultipleTopicsWrapper { topics }))
}

pub async fn post_topic(
    Extension(state): Extension<Arc<AppState>>,
    ValidJson(CreateTopicRequest { slug, description }): ValidJson<CreateTopicRequest>,
) -> CreatedResult<TopicWrapper> {
    let rules = &state.text_rules;
    let slug = rules.check_name(slug.as_deref(), "slug")?;
    let description = rules.check_body(description.as_deref(), "description")?;

    let topic = insert_topic_in_db(&state.pool, slug, description).await?;
    Ok((StatusCode::CREATED, Json(TopicWrapper { topic })))
}

// ----------------- Article Handlers -----------------
pub async fn get_articles(
    Extension(state): Extension<Arc<AppState>>,
    ValidQuery(params): ValidQuery<ArticleQueryParams>,
) -> JsonResult<ArticlesResponse> {
    let query = ArticleQuery::from_params(None, params)?;
    let (rows, total_count) = list_articles_in_db(&state.pool, &query).await?;
    Ok(Json(ArticlesResponse::new(None, rows, total_count)?))
}

pub async fn get_article(
    Extension(state): Extension<Arc<AppState>>,
    Path(article_id): Path<String>,
    ValidQuery(params): ValidQuery<ArticleQueryParams>,
) -> JsonResult<ArticlesResponse> {
    let article_id = require_positive_integer(&article_id, "article_id")?;
    let query = ArticleQuery::from_params(Some(article_id), params)?;
    let (rows, total_count) = list_articles_in_db(&state.pool, &query).await?;
    Ok(Json(ArticlesResponse::new(
        Some(article_id),
        rows,
        total_count,
    )?))
}

pub async fn post_article(
    Extension(state): Extension<Arc<AppState>>,
    ValidJson(CreateArticleRequest {
        author,
        title,
        body,
        topic,
    }): ValidJson<CreateArticleRequest>,
) -> CreatedResult<ArticleWrapper> {
    let rules = &state.text_rules;
    let author = rules.check_name(author.as_deref(), "author")?;
    let title = rules.check_name(title.as_deref(), "title")?;
    let body = rules.check_body(body.as_deref(), "body")?;
    let topic = topic
        .as_deref()
        .filter(|topic| !topic.is_empty())
        .ok_or(RequestError::BadInput("topic"))?;

    let article = create_article_in_db(
        &state.pool,
        NewArticle {
            author,
            title,
            body,
            topic,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(ArticleWrapper { article })))
}

pub async fn patch_article(
    Extension(state): Extension<Arc<AppState>>,
    Path(article_id): Path<String>,
    ValidJson(VoteRequest { inc_votes }): ValidJson<VoteRequest>,
) -> JsonResult<ArticleWrapper> {
    let article_id = require_positive_integer(&article_id, "article_id")?;
    let inc_votes = require_inc_votes(inc_votes)?;

    let article = update_article_votes_in_db(&state.pool, article_id, inc_votes).await?;
    Ok(Json(ArticleWrapper { article }))
}

pub async fn delete_article(
    Extension(state): Extension<Arc<AppState>>,
    Path(article_id): Path<String>,
) -> Result<StatusCode, RequestError> {
    let article_id = require_positive_integer(&article_id, "article_id")?;
    delete_article_in_db(&state.pool, article_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- Comment Handlers -----------------
pub async fn get_article_comments(
    Extension(state): Extension<Arc<AppState>>,
    Path(article_id): Path<String>,
    ValidQuery(PageQueryParams { limit, p }): ValidQuery<PageQueryParams>,
) -> JsonResult<MultipleCommentsWrapper> {
    let article_id = require_positive_integer(&article_id, "article_id")?;
    let page = Page::from_params(limit.as_deref(), p.as_deref())?;

    let comments = get_comments_for_article_in_db(&state.pool, article_id, page).await?;
    Ok(Json(MultipleCommentsWrapper { comments }))
}

pub async fn post_article_comment(
    Extension(state): Extension<Arc<AppState>>,
    Path(article_id): Path<String>,
    ValidJson(CommentRequest { username, body }): ValidJson<CommentRequest>,
) -> CreatedResult<CommentWrapper> {
    let article_id = require_positive_integer(&article_id, "article_id")?;
    let (Some(username), Some(body)) = (username, body) else {
        return Err(RequestError::BadInput("username and body are required"));
    };
    if body.is_empty() {
        return Err(RequestError::BadInput("body"));
    }

    let comment = add_comment_to_article_in_db(&state.pool, article_id, &username, &body).await?;
    Ok((StatusCode::CREATED, Json(CommentWrapper { comment })))
}

pub async fn patch_comment(
    Extension(state): Extension<Arc<AppState>>,
    Path(comment_id): Path<String>,
    ValidJson(VoteRequest { inc_votes }): ValidJson<VoteRequest>,
) -> JsonResult<CommentWrapper> {
    let comment_id = require_positive_integer(&comment_id, "comment_id")?;
    let inc_votes = require_inc_votes(inc_votes)?;

    let comment = update_comment_votes_in_db(&state.pool, comment_id, inc_votes).await?;
    Ok(Json(CommentWrapper { comment }))
}

pub async fn delete_comment(
    Extension(state): Extension<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> Result<StatusCode, RequestError> {
    let comment_id = require_positive_integer(&comment_id, "comment_id")?;
    delete_comment_in_db(&state.pool, comment_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ----------------- User Handlers -----------------
pub async fn get_users(
    Extension(state): Extension<Arc<AppState>>,
) -> JsonResult<MultipleUsersWrapper> {
    let users = get_users_in_db(&state.pool).await?;
    Ok(Json(MultipleUsersWrapper { users }))
}

pub async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    Path(username): Path<String>,
) -> JsonResult<UserWrapper> {
    let username = state
        .text_rules
        .check_name(Some(username.as_str()), "username")?;
    let user = get_user_by_username(&state.pool, username)
        .await?
        .ok_or_else(|| RequestError::not_found(username))?;
    Ok(Json(UserWrapper { user }))
}
