use std::time::{Duration, Instant};

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::auth::middleware::AuthUser;
use crate::auth::{client_ip, cookie, password, token};
use crate::dto::*;
use crate::error::AppError;
use crate::state::AppState;

/// Admin login. The limiter is consulted before the body is even parsed, so
/// malformed requests count against the client like wrong passwords do.
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let client_id = client_ip::client_id(&headers);

    if !state
        .login_limiter
        .check_and_record_attempt(&client_id, Instant::now())
    {
        tracing::warn!("Rate limited login for client: {client_id}");
        return Err(AppError::RateLimited(retry_message(
            state.login_limiter.config().window(),
        )));
    }

    let request: LoginRequest = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid request body".to_string()))?;

    let password = request
        .password
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AppError::BadRequest("Password is required".to_string()))?;

    let hash = state.config.auth.password_hash.clone();
    let valid = tokio::task::spawn_blocking(move || password::verify_password(&hash, &password))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    if !valid {
        tracing::warn!("Failed login attempt for client: {client_id}");
        return Err(AppError::Auth("Invalid password".to_string()));
    }

    state.login_limiter.reset_on_success(&client_id);
    tracing::info!("Login successful for client: {client_id}");

    let ttl = state.config.session_ttl();
    let (token, expires_at) =
        token::create_token(&state.config.auth.jwt_secret, ttl, token::ADMIN_SUBJECT)?;
    let set_cookie = cookie::session_cookie(&token, ttl, state.config.secure_cookies());

    Ok((
        [(header::SET_COOKIE, set_cookie)],
        Json(LoginResponse {
            success: true,
            expires_at,
        }),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>) -> Response {
    let set_cookie = cookie::clear_session_cookie(state.config.secure_cookies());
    (
        [(header::SET_COOKIE, set_cookie)],
        Json(serde_json::json!({ "success": true })),
    )
        .into_response()
}

pub async fn session(user: AuthUser) -> Json<SessionResponse> {
    Json(SessionResponse {
        authenticated: true,
        user: user.sub,
        expires_at: user.expires_at,
    })
}

/// 429 message naming the window, rounded up to whole minutes.
fn retry_message(window: Duration) -> String {
    let minutes = window.as_secs().div_ceil(60).max(1);
    let unit = if minutes == 1 { "minute" } else { "minutes" };
    format!("Too many login attempts. Please try again in {minutes} {unit}.")
}
