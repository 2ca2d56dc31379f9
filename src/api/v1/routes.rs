use axum::{Router, routing::get, routing::post};

use crate::api::v1::handlers::tokens::{get_tokens, refresh_tokens};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", get(get_tokens))
        .route("/refresh", post(refresh_tokens))
}
