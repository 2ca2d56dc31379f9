use std::sync::Arc;

use crate::services::token_manager::TokenManager;

#[derive(Clone)]
pub struct AppState {
    pub tokens: Arc<TokenManager>,
}

impl AppState {
    pub fn new(tokens: Arc<TokenManager>) -> Self {
        Self { tokens }
    }
}
