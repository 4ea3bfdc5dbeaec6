use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};

use super::cookie::session_token;
use super::token::verify_token;
use crate::error::AppError;
use crate::state::AppState;

/// Paths reachable without a session.
const PUBLIC_PATHS: &[&str] = &["/login", "/api/auth/login", "/api/auth/logout"];

pub const LOGIN_PAGE: &str = "/login";

/// The verified session behind a request.
pub struct AuthUser {
    pub sub: String,
    pub expires_at: u64,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = session_token(&parts.headers)
            .ok_or_else(|| AppError::Auth("Authentication required".to_string()))?;

        let claims = verify_token(&state.config.auth.jwt_secret, token)
            .map_err(|_| AppError::Auth("Invalid or expired session".to_string()))?;

        Ok(AuthUser {
            sub: claims.sub,
            expires_at: claims.exp,
        })
    }
}

/// Gate for the whole router: API calls without a valid session get a 401,
/// anything else is sent to the login page.
pub async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();
    let is_public = PUBLIC_PATHS.contains(&path);
    let is_api = path.starts_with("/api/");

    if is_public {
        return next.run(req).await;
    }

    let authenticated = session_token(req.headers())
        .is_some_and(|token| verify_token(&state.config.auth.jwt_secret, token).is_ok());

    if authenticated {
        next.run(req).await
    } else if is_api {
        AppError::Auth("Authentication required".to_string()).into_response()
    } else {
        Redirect::to(LOGIN_PAGE).into_response()
    }
}
