//! In-memory shared-creative store.

use std::collections::VecDeque;

use creative_core::collaborators::CreativeStore;
use creative_core::config::StoreConfig;
use creative_core::error::{CreativeError, CreativeResult};
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

/// Keeps shared creatives as opaque JSON blobs for the lifetime of the process.
/// Holds at most `max_entries` shares; the oldest is evicted first.
#[derive(Debug)]
pub struct InMemoryCreativeStore {
    blobs: DashMap<Uuid, serde_json::Value>,
    order: parking_lot::Mutex<VecDeque<Uuid>>,
    max_blob_bytes: usize,
    max_entries: usize,
}

impl InMemoryCreativeStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self {
            blobs: DashMap::new(),
            order: parking_lot::Mutex::new(VecDeque::new()),
            max_blob_bytes: config.max_blob_bytes,
            max_entries: config.max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl CreativeStore for InMemoryCreativeStore {
    fn persist(&self, blob: serde_json::Value) -> CreativeResult<Uuid> {
        let size = serde_json::to_vec(&blob)?.len();
        if size > self.max_blob_bytes {
            return Err(CreativeError::PayloadTooLarge {
                size,
                limit: self.max_blob_bytes,
            });
        }
        let id = Uuid::new_v4();

        let mut order = self.order.lock();
        self.blobs.insert(id, blob);
        order.push_back(id);
        while order.len() > self.max_entries {
            if let Some(evicted) = order.pop_front() {
                self.blobs.remove(&evicted);
                debug!(id = %evicted, "evicted oldest shared creative");
            }
        }
        debug!(%id, size, "stored shared creative");
        Ok(id)
    }

    fn load(&self, id: &Uuid) -> CreativeResult<serde_json::Value> {
        self.blobs
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| CreativeError::NotFound(format!("shared creative {id}")))
    }
}
