use std::sync::Arc;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use tokio_util::sync::CancellationToken;

use crate::repos::{NewTokenRecord, RepoError, TokenRepository};

use super::error::TokenError;
use super::generator::{Generator, decode_guid_ignoring_exp};
use super::hasher::Hasher;

/// Orchestrates issuance and rotation; owns the TTL policy, the pairing
/// invariant, and the error taxonomy (spec §4.4).
///
/// Otherwise stateless across requests — all per-session state lives in
/// the `TokenRepository`.
pub struct TokenManager {
    repo: Arc<dyn TokenRepository>,
    generator: Arc<dyn Generator>,
    hasher: Arc<dyn Hasher>,
    key: Vec<u8>,
    access_ttl_seconds: i64,
    refresh_ttl_seconds: i64,
}

impl TokenManager {
    /// Fails if either TTL string is unparseable or resolves to a
    /// non-positive duration.
    pub fn new(
        repo: Arc<dyn TokenRepository>,
        generator: Arc<dyn Generator>,
        hasher: Arc<dyn Hasher>,
        key: Vec<u8>,
        access_ttl: &str,
        refresh_ttl: &str,
    ) -> anyhow::Result<Self> {
        let access_ttl_seconds = humantime::parse_duration(access_ttl)?.as_secs() as i64;
        let refresh_ttl_seconds = humantime::parse_duration(refresh_ttl)?.as_secs() as i64;

        if access_ttl_seconds <= 0 {
            anyhow::bail!("jwt.access_ttl must be a positive duration");
        }
        if refresh_ttl_seconds <= 0 {
            anyhow::bail!("jwt.refresh_ttl must be a positive duration");
        }

        Ok(Self {
            repo,
            generator,
            hasher,
            key,
            access_ttl_seconds,
            refresh_ttl_seconds,
        })
    }

    /// Issues a fresh access/refresh pair for `guid` (§4.4.1).
    pub async fn get_tokens(
        &self,
        cancel: &CancellationToken,
        guid: &str,
    ) -> Result<(String, String), TokenError> {
        let (access, access_exp) = self
            .generator
            .issue_access(cancel, guid, &self.key, self.access_ttl_seconds)
            .await?;

        let (refresh, refresh_exp) = self
            .generator
            .issue_refresh(cancel, self.refresh_ttl_seconds)
            .await?;

        let refresh_hash = self.hasher.hash(&refresh)?;

        self.repo
            .save(
                cancel,
                NewTokenRecord {
                    guid: guid.to_string(),
                    refresh_hash,
                    refresh_exp,
                    access_exp,
                },
            )
            .await?;

        Ok((STANDARD.encode(access), STANDARD.encode(refresh)))
    }

    /// Rotates a presented pair (§4.4.2). The refresh candidate is matched
    /// only among records belonging to the subject named in the presented
    /// access token — binding the two without requiring the access token
    /// to still be valid.
    pub async fn refresh_tokens(
        &self,
        cancel: &CancellationToken,
        old_access_b64: &str,
        old_refresh_b64: &str,
    ) -> Result<(String, String), TokenError> {
        if old_access_b64.is_empty() {
            return Err(TokenError::MissingAccessToken);
        }
        if old_refresh_b64.is_empty() {
            return Err(TokenError::MissingRefreshToken);
        }

        let access_token = decode_b64_to_string(old_access_b64)?;
        let raw_refresh = decode_b64_to_string(old_refresh_b64)?;

        let guid = decode_guid_ignoring_exp(&access_token, &self.key)?;

        let candidates = self.repo.find_by_guid(cancel, &guid).await?;

        let now = chrono::Utc::now().timestamp();
        let mut expired_match = false;

        for record in candidates {
            if !self.hasher.verify(&record.refresh_hash, &raw_refresh) {
                continue;
            }

            if record.refresh_exp < now {
                expired_match = true;
                continue;
            }

            return match self.repo.delete(cancel, &guid, &record.refresh_hash).await {
                Ok(()) => self.get_tokens(cancel, &guid).await,
                // Another request consumed this exact record first; report
                // the same error a never-issued token would produce (§5).
                Err(RepoError::NotFound) => Err(TokenError::InvalidToken),
                Err(e) => Err(e.into()),
            };
        }

        if expired_match {
            return Err(TokenError::TokenExpired);
        }

        Err(TokenError::InvalidToken)
    }
}

fn decode_b64_to_string(b64: &str) -> Result<String, TokenError> {
    let bytes = STANDARD.decode(b64).map_err(|_| TokenError::InvalidToken)?;
    String::from_utf8(bytes).map_err(|_| TokenError::InvalidToken)
}
