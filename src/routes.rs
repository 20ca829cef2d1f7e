use crate::auth::require_session;
use crate::error::AppError;
use crate::links::{is_valid_code, resolve, short_url, shorten};
use crate::model::{SessionClaims, ShortenRequest, ShortenResponse};
use crate::state::AppState;
use crate::utils::parse_url;
use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::http::header::{CACHE_CONTROL, LOCATION};
use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use tower_http::trace::TraceLayer;

const CACHE_CONTROL_HEADER_VALUE: &str = "no-store";

pub fn create_router(state: AppState) -> Router {
    let authenticated = Router::new()
        .route("/api/short-links", post(create_short_link))
        .route("/api/session", get(current_session))
        .route_layer(from_fn_with_state(state.clone(), require_session));

    Router::new()
        .merge(authenticated)
        .route("/p/:code", get(redirect))
        .route("/p", get(missing_code))
        .route("/p/", get(missing_code))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn create_short_link(
    State(state): State<AppState>,
    Extension(claims): Extension<SessionClaims>,
    Json(request): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    let original_url = parse_url(&request.original_url)?;
    let code = shorten(state.store.as_ref(), original_url.as_str()).await?;
    tracing::info!("User {} shortened {} to {}", claims.user_id, original_url, code);
    Ok(Json(ShortenResponse {
        short_url: short_url(&state.public_base_url, &code),
        code,
    }))
}

pub async fn redirect(
    State(state): State<AppState>,
    code: Result<Path<String>, PathRejection>,
) -> Result<Response, AppError> {
    let Ok(Path(code)) = code else {
        return Err(AppError::InvalidCode);
    };
    if !is_valid_code(&code) {
        return Err(AppError::InvalidCode);
    }
    let original_url = resolve(state.store.as_ref(), &code, true)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok((
        StatusCode::FOUND,
        [
            (LOCATION, original_url),
            (CACHE_CONTROL, CACHE_CONTROL_HEADER_VALUE.to_string()),
        ],
    )
        .into_response())
}

pub async fn missing_code() -> AppError {
    AppError::MissingCode
}

pub async fn current_session(Extension(claims): Extension<SessionClaims>) -> Json<SessionClaims> {
    Json(claims)
}

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
