use serde::Deserialize;

/// Body of `POST /v1/refresh`. The access token rides in the
/// `Authorization: Bearer` header instead.
#[derive(Debug, Clone, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub refresh_token: String,
}
