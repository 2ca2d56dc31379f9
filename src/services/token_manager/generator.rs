use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use uuid::Uuid;

use super::error::TokenError;

/// Claims carried by an access token: exactly `guid` and `exp`, per spec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessClaims {
    pub guid: String,
    pub exp: i64,
}

/// Stateless producer of signed access JWTs and opaque refresh token ids.
///
/// Safe for concurrent use: every call takes whatever it needs (key, ttl)
/// as an argument rather than reading from `self`.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait Generator: Send + Sync {
    async fn issue_access(
        &self,
        cancel: &CancellationToken,
        guid: &str,
        key: &[u8],
        ttl_seconds: i64,
    ) -> Result<(String, i64), TokenError>;

    async fn issue_refresh(
        &self,
        cancel: &CancellationToken,
        ttl_seconds: i64,
    ) -> Result<(String, i64), TokenError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TokenGenerator;

#[async_trait::async_trait]
impl Generator for TokenGenerator {
    async fn issue_access(
        &self,
        cancel: &CancellationToken,
        guid: &str,
        key: &[u8],
        ttl_seconds: i64,
    ) -> Result<(String, i64), TokenError> {
        if cancel.is_cancelled() {
            return Err(TokenError::Cancelled);
        }

        if guid.is_empty() {
            return Err(TokenError::InvalidGuid);
        }

        let exp = now_unix() + ttl_seconds;

        let claims = AccessClaims {
            guid: guid.to_string(),
            exp,
        };

        let header = Header::new(Algorithm::HS512);
        let token = jsonwebtoken::encode(&header, &claims, &EncodingKey::from_secret(key))
            .map_err(|e| {
                error!(error = %e, "failed to sign access token");
                TokenError::SignFailure
            })?;

        Ok((token, exp))
    }

    async fn issue_refresh(
        &self,
        cancel: &CancellationToken,
        ttl_seconds: i64,
    ) -> Result<(String, i64), TokenError> {
        if cancel.is_cancelled() {
            return Err(TokenError::Cancelled);
        }

        let token = Uuid::new_v4().to_string();
        let exp = now_unix() + ttl_seconds;

        Ok((token, exp))
    }
}

fn now_unix() -> i64 {
    chrono::Utc::now().timestamp()
}

/// Decode an access token's claims without requiring `exp` to still be
/// valid. Used by rotation (§4.4.2) to recover the subject bound to a
/// presented, possibly-expired, access token.
pub fn decode_guid_ignoring_exp(token: &str, key: &[u8]) -> Result<String, TokenError> {
    let mut validation = jsonwebtoken::Validation::new(Algorithm::HS512);
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = jsonwebtoken::decode::<AccessClaims>(
        token,
        &jsonwebtoken::DecodingKey::from_secret(key),
        &validation,
    )
    .map_err(|e| {
        warn!(error = %e, "access token signature/claims invalid during rotation");
        TokenError::InvalidToken
    })?;

    if data.claims.guid.is_empty() {
        return Err(TokenError::InvalidToken);
    }

    Ok(data.claims.guid)
}
