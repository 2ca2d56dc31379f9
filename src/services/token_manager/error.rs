use thiserror::Error;

use crate::repos::RepoError;

/// Error taxonomy for the Token Manager core.
///
/// The HTTP layer switches on these variants by exact identity (see
/// `crate::error::AppError`'s `From<TokenError>`), never by unwrapping a
/// chain, so every fallible path here must resolve to one of these kinds.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("the access token was not provided")]
    MissingAccessToken,

    #[error("the refresh token was not provided")]
    MissingRefreshToken,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,

    #[error("invalid guid")]
    InvalidGuid,

    #[error("not found")]
    NotFound,

    #[error("can't sign token")]
    SignFailure,

    #[error("can't generate token")]
    GenerateFailure,

    #[error("can't hash token")]
    CantHashToken,

    #[error("repository failure")]
    RepositoryFailure,

    #[error("already exists")]
    AlreadyExists,

    #[error("operation cancelled")]
    Cancelled,
}

impl From<RepoError> for TokenError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => TokenError::NotFound,
            RepoError::AlreadyExists => TokenError::AlreadyExists,
            RepoError::Cancelled => TokenError::Cancelled,
            RepoError::Db(_) => TokenError::RepositoryFailure,
        }
    }
}
