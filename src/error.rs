use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::db::DbError;
use crate::models::ErrorResponse;

/// Failure of a single aggregation endpoint.
///
/// Rendered as a 500 whose body carries the endpoint's fixed message plus the
/// driver's error text. That text can reveal hostnames and server details to
/// clients.
#[derive(Debug, Error)]
#[error("{message}: {source}")]
pub struct ApiError {
    pub message: &'static str,
    #[source]
    pub source: DbError,
}

impl ApiError {
    pub fn new(message: &'static str, source: DbError) -> Self {
        Self { message, source }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);

        let body = Json(ErrorResponse {
            message: self.message.to_string(),
            error: self.source.to_string(),
        });

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
