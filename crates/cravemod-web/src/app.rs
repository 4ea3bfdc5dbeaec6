use axum::http::{header, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::middleware::require_auth;
use crate::middleware::canonical_host::canonical_host;
use crate::middleware::security_headers::{security_headers, security_headers_with_hsts};
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

/// Full application router. Outermost first: tracing, CORS, body limit,
/// security headers, canonical-host redirect, auth guard, routes.
pub fn build_router(state: AppState) -> Router {
    // CORS: same-origin only by default (no cross-origin requests allowed)
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let base_router = Router::new()
        .nest("/api", api::auth_router().merge(api::protected_router()))
        .fallback(api::not_found)
        .layer(from_fn_with_state(state.clone(), require_auth))
        .layer(from_fn_with_state(state.clone(), canonical_host));

    let with_headers = if state.config.tls_enabled() {
        base_router.layer(from_fn(security_headers_with_hsts))
    } else {
        base_router.layer(from_fn(security_headers))
    };

    with_headers
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
