use serde::Deserialize;

/// Query params for `GET /v1/tokens`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueTokensQuery {
    #[serde(default)]
    pub guid: String,
}
