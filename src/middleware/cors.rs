//! CORS policy. This service has no browser-facing Non-goals excluding
//! it, and no per-environment origin allowlist in `Config` (§6.2 lists no
//! such option), so the policy is permissive-without-credentials: any
//! origin may call `/v1/tokens` and `/v1/refresh`, but responses never
//! carry `Access-Control-Allow-Credentials`.

use axum::Router;
use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};

pub fn apply(router: Router) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
        ]);

    router.layer(cors)
}
