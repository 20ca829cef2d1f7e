use crate::error::{AppError, StoreError};
use axum::http::HeaderMap;
use std::future::Future;
use std::time::Duration;
use tokio::time::timeout;
use url::Url;

pub async fn with_timeout<T, F>(duration_in_mills: u64, task: F) -> Result<T, StoreError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    timeout(Duration::from_millis(duration_in_mills), task)
        .await
        .map_err(|_| StoreError::Timeout(duration_in_mills))?
        .map_err(StoreError::from)
}

pub fn get_header<'a>(name: &str, headers: &'a HeaderMap) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Accepts only absolute http(s) urls with a host.
pub fn parse_url(text: &str) -> Result<Url, AppError> {
    let url = Url::parse(text.trim()).map_err(|_| AppError::InvalidUrl)?;
    match url.scheme() {
        "http" | "https" if url.host().is_some() => Ok(url),
        _ => Err(AppError::InvalidUrl),
    }
}
