//! Moves visitors off the hosting platform's default domain.

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use crate::config::ServerConfig;
use crate::state::AppState;

pub async fn canonical_host(State(state): State<AppState>, req: Request, next: Next) -> Response {
    match redirect_target(&state.config, &req) {
        Some(target) => {
            tracing::debug!("Redirecting to canonical host: {target}");
            Redirect::permanent(&target).into_response()
        }
        None => next.run(req).await,
    }
}

/// Where to send `req`, if it arrived on a platform host that is not the
/// configured canonical one.
fn redirect_target(config: &ServerConfig, req: &Request) -> Option<String> {
    let canonical = config.canonical_host.as_deref()?;

    let host = req
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .or_else(|| req.uri().host())?;
    let hostname = host
        .split(':')
        .next()
        .unwrap_or(host)
        .trim_end_matches('.')
        .to_ascii_lowercase();

    if hostname.eq_ignore_ascii_case(canonical) {
        return None;
    }
    let on_platform_domain = config
        .redirect_host_suffixes
        .iter()
        .any(|suffix| is_within_domain(&hostname, suffix));
    if !on_platform_domain {
        return None;
    }

    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    Some(format!("https://{canonical}{path_and_query}"))
}

/// `hostname` (already lowercase) is `domain` itself or one of its subdomains.
fn is_within_domain(hostname: &str, domain: &str) -> bool {
    let domain = domain.trim_start_matches('.').to_ascii_lowercase();
    hostname == domain
        || hostname
            .strip_suffix(domain.as_str())
            .is_some_and(|rest| rest.ends_with('.'))
}
