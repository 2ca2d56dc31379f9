use sqlx::PgPool;
use tokio_util::sync::CancellationToken;
use tracing::error;

use super::error::{RepoError, RepoResult};

/// One outstanding refresh token, as persisted. Immutable once written
/// (I5): rotation deletes and re-inserts, it never updates a row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TokenRecord {
    pub guid: String,
    pub refresh_hash: String,
    pub refresh_exp: i64,
    pub access_exp: i64,
}

/// Input to `Save` — same shape as `TokenRecord`, kept as a separate type
/// so callers can't accidentally construct one from a row they read back.
#[derive(Debug, Clone)]
pub struct NewTokenRecord {
    pub guid: String,
    pub refresh_hash: String,
    pub refresh_exp: i64,
    pub access_exp: i64,
}

/// Durable storage of `TokenRecord`s, keyed by `guid` with an additional
/// lookup-by-guid used to walk a user's outstanding sessions (§4.3).
///
/// The backing store is opaque to the Token Manager; this crate ships a
/// Postgres implementation (`PgTokenRepository`), but anything behind
/// this trait — including a document store, as in the Go reference —
/// satisfies the contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TokenRepository: Send + Sync {
    async fn save(
        &self,
        cancel: &CancellationToken,
        record: NewTokenRecord,
    ) -> RepoResult<()>;

    async fn find_by_guid(
        &self,
        cancel: &CancellationToken,
        guid: &str,
    ) -> RepoResult<Vec<TokenRecord>>;

    async fn delete(
        &self,
        cancel: &CancellationToken,
        guid: &str,
        refresh_hash: &str,
    ) -> RepoResult<()>;
}

#[derive(Clone)]
pub struct PgTokenRepository {
    pool: PgPool,
}

impl PgTokenRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn check_cancelled(cancel: &CancellationToken) -> RepoResult<()> {
    if cancel.is_cancelled() {
        return Err(RepoError::Cancelled);
    }
    Ok(())
}

const UNIQUE_VIOLATION: &str = "23505";

#[async_trait::async_trait]
impl TokenRepository for PgTokenRepository {
    async fn save(&self, cancel: &CancellationToken, record: NewTokenRecord) -> RepoResult<()> {
        check_cancelled(cancel)?;

        let result = sqlx::query(
            r#"
            INSERT INTO token_records (guid, refresh_hash, refresh_exp, access_exp)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&record.guid)
        .bind(&record.refresh_hash)
        .bind(record.refresh_exp)
        .bind(record.access_exp)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) => {
                Err(RepoError::AlreadyExists)
            }
            Err(e) => {
                error!(error = %e, guid = %record.guid, "failed to save token record");
                Err(RepoError::Db(e))
            }
        }
    }

    async fn find_by_guid(
        &self,
        cancel: &CancellationToken,
        guid: &str,
    ) -> RepoResult<Vec<TokenRecord>> {
        check_cancelled(cancel)?;

        let rows = sqlx::query_as::<_, TokenRecord>(
            r#"
            SELECT guid, refresh_hash, refresh_exp, access_exp
            FROM token_records
            WHERE guid = $1
            "#,
        )
        .bind(guid)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, guid = %guid, "failed to query token records");
            RepoError::Db(e)
        })?;

        if rows.is_empty() {
            return Err(RepoError::NotFound);
        }

        Ok(rows)
    }

    async fn delete(
        &self,
        cancel: &CancellationToken,
        guid: &str,
        refresh_hash: &str,
    ) -> RepoResult<()> {
        check_cancelled(cancel)?;

        let result = sqlx::query(
            r#"
            DELETE FROM token_records
            WHERE guid = $1 AND refresh_hash = $2
            "#,
        )
        .bind(guid)
        .bind(refresh_hash)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            error!(error = %e, guid = %guid, "failed to delete token record");
            RepoError::Db(e)
        })?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}

