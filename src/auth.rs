use crate::error::AppError;
use crate::state::AppState;
use crate::utils::get_header;
use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;

pub const AUTH_COOKIE: &str = "auth_token";

/// Bearer header first, then the auth cookie.
pub fn session_token(headers: &HeaderMap) -> Option<&str> {
    let bearer = get_header(AUTHORIZATION.as_str(), headers)
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty());
    bearer.or_else(|| {
        headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| get_cookie(header, AUTH_COOKIE))
    })
}

fn get_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|part| part.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}

pub async fn require_session(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<impl IntoResponse, AppError> {
    let claims = session_token(request.headers())
        .and_then(|token| state.tokens.verify(token))
        .ok_or(AppError::Unauthorized)?;
    tracing::debug!("Authenticated user {}", claims.user_id);
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}
