//! Short-link allocation and resolution.
//!
//! A long url is first normalized; the normalized form is the deduplication key,
//! so every url that normalizes identically maps to one code. Races between
//! concurrent shorten calls are settled by the store's uniqueness constraint on
//! the normalized url followed by a re-read.

use crate::dao::{InsertOutcome, LinkStore};
use crate::error::{AllocationError, StoreError};
use rand::rngs::OsRng;
use rand::Rng;
use url::Url;

pub const CODE_LENGTH: usize = 8;
pub const MAX_ALLOCATION_ATTEMPTS: usize = 10;
pub const MAX_CODE_LENGTH: usize = 24;

/// Alphanumerics without the look-alikes `0 O 1 I l`.
pub const CODE_ALPHABET: &[u8] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Strips trailing slashes from the path (the root `/` stays), leaving scheme,
/// host, query and fragment alone. Unparsable input gets a plain trailing-slash
/// strip. `normalize_url(normalize_url(x)) == normalize_url(x)`.
pub fn normalize_url(raw: &str) -> String {
    let mut normalized = strip_path_slashes(raw);
    // Serialization can re-shape the path (`foo:/.//`), so run to a fixed point.
    loop {
        let next = strip_path_slashes(&normalized);
        if next == normalized {
            return normalized;
        }
        normalized = next;
    }
}

fn strip_path_slashes(raw: &str) -> String {
    match Url::parse(raw) {
        Ok(mut url) => {
            let path = url.path();
            if path.len() > 1 && path.ends_with('/') {
                let trimmed = match path.trim_end_matches('/') {
                    "" => "/".to_string(),
                    trimmed => trimmed.to_string(),
                };
                url.set_path(&trimmed);
            }
            url.to_string()
        }
        Err(_) => raw.trim_end_matches('/').to_string(),
    }
}

pub fn generate_code() -> String {
    let mut rng = OsRng;
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}

/// `^[A-Za-z0-9]{1,24}$`
pub fn is_valid_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code.bytes().all(|byte| byte.is_ascii_alphanumeric())
}

pub fn short_url(public_base_url: &str, code: &str) -> String {
    format!("{}/p/{}", public_base_url.trim_end_matches('/'), code)
}

/// Returns the code for `original_url`, reusing the one issued for the same
/// normalized url if there is one.
pub async fn shorten(store: &dyn LinkStore, original_url: &str) -> Result<String, AllocationError> {
    let normalized_url = normalize_url(original_url);
    if let Some(existing) = store.find_by_normalized_url(&normalized_url).await? {
        tracing::debug!("Reusing code {} for {}", existing.code, normalized_url);
        return Ok(existing.code);
    }

    for attempt in 1..=MAX_ALLOCATION_ATTEMPTS {
        let code = generate_code();
        match store.insert(&code, original_url, &normalized_url).await? {
            InsertOutcome::CodeTaken => {
                tracing::debug!("Code {} already taken (attempt {})", code, attempt);
                continue;
            }
            InsertOutcome::Inserted | InsertOutcome::UrlTaken => {
                // The stored row wins, whether it is ours or a concurrent request's.
                return store
                    .find_by_normalized_url(&normalized_url)
                    .await?
                    .map(|link| link.code)
                    .ok_or(AllocationError::Missing { normalized_url });
            }
        }
    }

    tracing::error!(
        "Could not persist short link for {}. Exhausted all retries of generating a unique code",
        normalized_url
    );
    Err(AllocationError::Exhausted {
        attempts: MAX_ALLOCATION_ATTEMPTS,
    })
}

pub async fn resolve(
    store: &dyn LinkStore,
    code: &str,
    count_click: bool,
) -> Result<Option<String>, StoreError> {
    store.resolve(code, count_click).await
}
