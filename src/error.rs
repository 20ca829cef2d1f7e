use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// The link store could not answer.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database call timed out after {0} ms")]
    Timeout(u64),
}

#[derive(Error, Debug)]
pub enum AllocationError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Exhausted {attempts} attempts of generating a unique code")]
    Exhausted { attempts: usize },

    #[error("Short link for {normalized_url} missing right after insert")]
    Missing { normalized_url: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid short link code")]
    MissingCode,

    #[error("Invalid short link format")]
    InvalidCode,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Short link not found")]
    NotFound,

    #[error("Internal server error")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        AppError::Internal(Box::new(err))
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        AppError::Internal(Box::new(err))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::MissingCode | AppError::InvalidCode | AppError::InvalidUrl => {
                StatusCode::BAD_REQUEST
            }
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::Internal(cause) => {
                tracing::error!("{}", cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, self.to_string()).into_response()
    }
}
