use std::time::Duration;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::errors::RequestError;

/// Middleware that answers with a `{msg}` 408 once `limit` has passed.
/// The handler future is dropped, which cancels any query it is awaiting.
pub async fn enforce_timeout(
    State(limit): State<Duration>,
    request: Request,
    next: Next,
) -> Result<Response, RequestError> {
    let path = request.uri().path().to_owned();
    tokio::time::timeout(limit, next.run(request))
        .await
        .map_err(|_| {
            tracing::warn!(%path, ?limit, "request timed out");
            RequestError::Timeout
        })
}
