#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use nobull_links::dao::{InsertOutcome, LinkStore};
use nobull_links::error::StoreError;
use nobull_links::model::ShortLink;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

/// In-process `LinkStore` with knobs for the failure paths.
#[derive(Default)]
pub struct MemoryStore {
    links: Mutex<HashMap<String, ShortLink>>,
    unavailable: AtomicBool,
    forced_collisions: AtomicUsize,
    concurrent_winner: Mutex<Option<String>>,
    pub insert_calls: AtomicUsize,
    pub resolve_calls: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// The next `count` inserts report a code collision.
    pub fn force_collisions(&self, count: usize) {
        self.forced_collisions.store(count, Ordering::SeqCst);
    }

    /// The next insert loses a race: a row with `code` and the same normalized
    /// url lands first.
    pub fn lose_next_insert_to(&self, code: &str) {
        *self.concurrent_winner.lock().unwrap() = Some(code.to_string());
    }

    pub fn seed(&self, code: &str, original_url: &str, normalized_url: &str) {
        self.links
            .lock()
            .unwrap()
            .insert(code.to_string(), link(code, original_url, normalized_url));
    }

    pub fn get(&self, code: &str) -> Option<ShortLink> {
        self.links.lock().unwrap().get(code).cloned()
    }

    pub fn len(&self) -> usize {
        self.links.lock().unwrap().len()
    }

    pub fn clicks(&self, code: &str) -> Option<i64> {
        self.links
            .lock()
            .unwrap()
            .get(code)
            .map(|link| link.click_count)
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            Err(StoreError::Timeout(300))
        } else {
            Ok(())
        }
    }
}

fn link(code: &str, original_url: &str, normalized_url: &str) -> ShortLink {
    let now = Utc::now();
    ShortLink {
        code: code.to_string(),
        original_url: original_url.to_string(),
        normalized_url: normalized_url.to_string(),
        click_count: 0,
        created_at: now,
        updated_at: now,
    }
}

#[async_trait]
impl LinkStore for MemoryStore {
    async fn find_by_normalized_url(
        &self,
        normalized_url: &str,
    ) -> Result<Option<ShortLink>, StoreError> {
        self.check_available()?;
        Ok(self
            .links
            .lock()
            .unwrap()
            .values()
            .find(|link| link.normalized_url == normalized_url)
            .cloned())
    }

    async fn insert(
        &self,
        code: &str,
        original_url: &str,
        normalized_url: &str,
    ) -> Result<InsertOutcome, StoreError> {
        self.check_available()?;
        self.insert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(winner) = self.concurrent_winner.lock().unwrap().take() {
            self.seed(&winner, original_url, normalized_url);
        }
        if self
            .forced_collisions
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok()
        {
            return Ok(InsertOutcome::CodeTaken);
        }
        let mut links = self.links.lock().unwrap();
        if links.values().any(|link| link.normalized_url == normalized_url) {
            return Ok(InsertOutcome::UrlTaken);
        }
        if links.contains_key(code) {
            return Ok(InsertOutcome::CodeTaken);
        }
        links.insert(code.to_string(), link(code, original_url, normalized_url));
        Ok(InsertOutcome::Inserted)
    }

    async fn resolve(&self, code: &str, count_click: bool) -> Result<Option<String>, StoreError> {
        self.check_available()?;
        self.resolve_calls.fetch_add(1, Ordering::SeqCst);
        let mut links = self.links.lock().unwrap();
        Ok(links.get_mut(code).map(|link| {
            if count_click {
                link.click_count += 1;
                link.updated_at = Utc::now();
            }
            link.original_url.clone()
        }))
    }
}
