#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde_json::Value;
use sqlx::PgPool;
use tokio::net::TcpListener;

pub const TEST_KEY: &[u8] = b"integration-test-signing-key";

/// Spawns the real token-manager router against a migrated per-test
/// database and returns its address, mirroring the `spawn_app` helper
/// shape used by this crate's own example pack for axum integration tests.
pub async fn spawn_app(pool: PgPool) -> String {
    spawn_app_with_ttls(pool, "1m", "1h").await
}

pub async fn spawn_app_with_ttls(pool: PgPool, access_ttl: &str, refresh_ttl: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind random port");
    let port = listener.local_addr().unwrap().port();

    let app = token_manager::app::test_router(pool, TEST_KEY.to_vec(), access_ttl, refresh_ttl);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://127.0.0.1:{port}")
}

pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

pub async fn issue(client: &reqwest::Client, address: &str, guid: &str) -> (reqwest::StatusCode, Value) {
    let response = client
        .get(format!("{address}/v1/tokens"))
        .query(&[("guid", guid)])
        .send()
        .await
        .expect("request to /v1/tokens failed");

    let status = response.status();
    let body = response.json().await.expect("non-JSON response body");
    (status, body)
}

pub async fn refresh(
    client: &reqwest::Client,
    address: &str,
    access_token: &str,
    refresh_token: &str,
) -> (reqwest::StatusCode, Value) {
    let response = client
        .post(format!("{address}/v1/refresh"))
        .bearer_auth(access_token)
        .json(&serde_json::json!({ "refresh_token": refresh_token }))
        .send()
        .await
        .expect("request to /v1/refresh failed");

    let status = response.status();
    let body = response.json().await.expect("non-JSON response body");
    (status, body)
}

pub fn pair_from(body: &Value) -> TokenPair {
    TokenPair {
        access_token: body["access_token"].as_str().unwrap().to_string(),
        refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
    }
}

pub fn decode_access_jwt(access_token_b64: &str) -> String {
    let bytes = STANDARD.decode(access_token_b64).unwrap();
    String::from_utf8(bytes).unwrap()
}
