use axum::{http::StatusCode, response::IntoResponse, Json};

use crate::JsonResponse;

#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Malformed or disallowed request input. The reason is only logged,
    /// clients always see "bad request".
    #[error("bad input: {0}")]
    BadInput(&'static str),
    #[error("{0}")]
    NotFound(String),
    #[error("request timed out")]
    Timeout,
    #[error("database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RequestErrorJson {
    pub msg: String,
}

impl RequestErrorJson {
    pub fn new(msg: &str) -> RequestErrorJson {
        RequestErrorJson {
            msg: msg.to_string(),
        }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> axum::response::Response {
        self.to_json_response().into_response()
    }
}

impl RequestError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{what} not found"))
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::BadInput(_) => StatusCode::BAD_REQUEST,
            RequestError::NotFound(_) => StatusCode::NOT_FOUND,
            RequestError::Timeout => StatusCode::REQUEST_TIMEOUT,
            RequestError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_json_response(&self) -> JsonResponse<RequestErrorJson> {
        let json = match self {
            RequestError::BadInput(reason) => {
                tracing::debug!(reason, "rejected request");
                RequestErrorJson::new("bad request")
            }
            RequestError::NotFound(message) => RequestErrorJson::new(message),
            RequestError::Timeout => RequestErrorJson::new("request timed out"),
            RequestError::DatabaseError(e) => {
                tracing::error!(error = %e, "database error");
                RequestErrorJson::new("internal server error")
            }
        };
        (self.status_code(), Json(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_input_hides_reason_from_client() {
        let (status, Json(body)) = RequestError::BadInput("limit is not a number").to_json_response();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.msg, "bad request");
    }

    #[test]
    fn not_found_interpolates_key() {
        let (status, Json(body)) = RequestError::not_found("coding").to_json_response();
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body.msg, "coding not found");
    }

    #[test]
    fn database_errors_are_generic() {
        let (status, Json(body)) = RequestError::from(sqlx::Error::RowNotFound).to_json_response();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body.msg, "internal server error");
    }

    #[test]
    fn timeouts_keep_the_msg_body() {
        let (status, Json(body)) = RequestError::Timeout.to_json_response();
        assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
        assert_eq!(body.msg, "request timed out");
    }
}
