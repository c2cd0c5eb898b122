//! Storage abstraction for URL mappings.
//!
//! The [`UrlStore`] trait is the only way the services touch persistence. Two
//! implementations exist: [`crate::db::Repository`] for PostgreSQL and
//! [`MemoryStore`] for running without a database.

use crate::error::{AppError, AppResult};
use crate::models::{NewUrlMapping, UrlMapping};
use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicI64, Ordering};

/// Persistence interface for short code mappings.
///
/// Implementations must enforce short code uniqueness themselves: `insert`
/// returns [`AppError::ShortCodeExists`] when the code is already taken, no
/// matter how many callers race on it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UrlStore: Send + Sync {
    /// Insert a new mapping.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::ShortCodeExists`] on a uniqueness violation, and a
    /// storage-class error for anything else.
    async fn insert(&self, mapping: NewUrlMapping) -> AppResult<UrlMapping>;

    /// Look up a mapping by short code.
    async fn find_by_code(&self, short_code: &str) -> AppResult<Option<UrlMapping>>;

    /// Check if a short code is already taken.
    async fn code_exists(&self, short_code: &str) -> AppResult<bool>;

    /// Verify the backend is reachable.
    async fn ping(&self) -> AppResult<()>;
}

/// In-process store backed by a concurrent map
#[derive(Debug, Default)]
pub struct MemoryStore {
    urls: DashMap<String, UrlMapping>,
    next_id: AtomicI64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

#[async_trait]
impl UrlStore for MemoryStore {
    async fn insert(&self, mapping: NewUrlMapping) -> AppResult<UrlMapping> {
        // The entry guard holds the shard lock, so check and insert are one step.
        match self.urls.entry(mapping.short_code.clone()) {
            Entry::Occupied(_) => Err(AppError::ShortCodeExists(mapping.short_code)),
            Entry::Vacant(slot) => {
                let stored = UrlMapping {
                    id: self.next_id.fetch_add(1, Ordering::Relaxed) + 1,
                    short_code: mapping.short_code,
                    original_url: mapping.original_url,
                    is_custom: mapping.is_custom,
                    created_at: Utc::now(),
                };
                slot.insert(stored.clone());
                Ok(stored)
            }
        }
    }

    async fn find_by_code(&self, short_code: &str) -> AppResult<Option<UrlMapping>> {
        Ok(self.urls.get(short_code).map(|entry| entry.value().clone()))
    }

    async fn code_exists(&self, short_code: &str) -> AppResult<bool> {
        Ok(self.urls.contains_key(short_code))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
