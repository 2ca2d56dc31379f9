use axum::Json;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use tokio_util::sync::CancellationToken;

use crate::api::v1::dto::{
    issue_request::IssueTokensQuery, refresh_request::RefreshRequest, token_response::TokenResponse,
};
use crate::error::AppError;
use crate::state::AppState;

pub async fn get_tokens(
    State(state): State<AppState>,
    Query(query): Query<IssueTokensQuery>,
) -> Result<Json<TokenResponse>, AppError> {
    let cancel = CancellationToken::new();

    let (access_token, refresh_token) = state.tokens.get_tokens(&cancel, &query.guid).await?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
    }))
}

pub async fn refresh_tokens(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<RefreshRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let cancel = CancellationToken::new();

    let access_b64 = bearer_token(&headers).unwrap_or_default();

    let (access_token, refresh_token) = state
        .tokens
        .refresh_tokens(&cancel, &access_b64, &body.refresh_token)
        .await?;

    Ok(Json(TokenResponse {
        access_token,
        refresh_token,
    }))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(axum::http::header::AUTHORIZATION)?.to_str().ok()?;
    Some(
        value
            .strip_prefix("Bearer ")
            .unwrap_or(value)
            .to_string(),
    )
}
