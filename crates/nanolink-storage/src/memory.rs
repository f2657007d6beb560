use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use nanolink_core::repository::{ReadRepository, Repository, Result};
use nanolink_core::{ShortCode, ShortLink, StorageError};
use std::sync::atomic::{AtomicI64, Ordering};

/// In-memory storage entry for a link.
#[derive(Debug, Clone)]
struct StoredLink {
    id: i64,
    original_url: String,
}

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap provides better concurrency than RwLock<HashMap> because it
/// uses sharded locks, allowing concurrent reads and writes to different
/// buckets without blocking. Inserts go through the entry API, which holds
/// the shard lock across the vacancy check and the write.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    links: DashMap<String, StoredLink>,
    last_id: AtomicI64,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            links: DashMap::with_capacity(capacity),
            last_id: AtomicI64::new(0),
        }
    }

    /// Number of stored links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, code: &ShortCode) -> Result<Option<ShortLink>> {
        Ok(self.links.get(code.as_str()).map(|stored| ShortLink {
            id: stored.id,
            original_url: stored.original_url.clone(),
            short_code: code.clone(),
        }))
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, code: &ShortCode, original_url: &str) -> Result<ShortLink> {
        match self.links.entry(code.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(code.to_string())),
            Entry::Vacant(slot) => {
                let id = self.last_id.fetch_add(1, Ordering::SeqCst) + 1;
                slot.insert(StoredLink {
                    id,
                    original_url: original_url.to_owned(),
                });
                Ok(ShortLink {
                    id,
                    original_url: original_url.to_owned(),
                    short_code: code.clone(),
                })
            }
        }
    }
}
