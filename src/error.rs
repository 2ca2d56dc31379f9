use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::token_manager::TokenError;

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Top-level application error. Bootstrap failures (`Internal`) and the
/// Token Manager's own taxonomy both end up here; the HTTP layer maps
/// each `TokenError` variant to a status code per spec §7, by exact
/// identity — never by unwrapping a chain.
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("internal server error")]
    Internal,
}

impl From<anyhow::Error> for AppError {
    fn from(e: anyhow::Error) -> Self {
        tracing::error!(error = %e, "unhandled bootstrap error");
        AppError::Internal
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Token(TokenError::MissingAccessToken)
            | AppError::Token(TokenError::MissingRefreshToken) => StatusCode::UNAUTHORIZED,

            AppError::Token(TokenError::TokenExpired) => StatusCode::FORBIDDEN,

            AppError::Token(TokenError::InvalidToken)
            | AppError::Token(TokenError::InvalidGuid)
            | AppError::Token(TokenError::NotFound) => StatusCode::BAD_REQUEST,

            AppError::Token(TokenError::SignFailure)
            | AppError::Token(TokenError::GenerateFailure)
            | AppError::Token(TokenError::CantHashToken)
            | AppError::Token(TokenError::RepositoryFailure)
            | AppError::Token(TokenError::AlreadyExists)
            | AppError::Token(TokenError::Cancelled)
            | AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };

        tracing::debug!(status = %status, error = %self, "request failed");

        let body = ErrorBody {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}
