use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

use crate::application::ports::{ChunkStore, StoreError};
use crate::domain::chunk::ChunkId;

/// In-memory reference implementation of the chunk store.
///
/// Staged chunks become durable only at the next savepoint, mirroring the
/// incremental-commit discipline of a transactional backend. Call counters
/// are exposed so tests can pin the checkpoint protocol.
#[derive(Default)]
pub struct InMemoryChunkStore {
    durable: Mutex<HashMap<ChunkId, Bytes>>,
    staged: Mutex<Vec<(ChunkId, Bytes)>>,
    attaches: AtomicUsize,
    savepoints: AtomicUsize,
}

impl InMemoryChunkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `attach` calls observed.
    pub fn attach_count(&self) -> usize {
        self.attaches.load(Ordering::Relaxed)
    }

    /// Number of `savepoint` calls observed.
    pub fn savepoint_count(&self) -> usize {
        self.savepoints.load(Ordering::Relaxed)
    }

    /// Number of durably committed chunks.
    pub fn chunk_count(&self) -> usize {
        self.durable.lock().len()
    }
}

#[async_trait]
impl ChunkStore for InMemoryChunkStore {
    async fn attach(&self) -> Result<(), StoreError> {
        self.attaches.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn record(&self, id: ChunkId, bytes: Bytes) -> Result<(), StoreError> {
        debug!(chunk = %id, len = bytes.len(), "chunk staged");
        self.staged.lock().push((id, bytes));
        Ok(())
    }

    async fn savepoint(&self) -> Result<(), StoreError> {
        let staged: Vec<_> = self.staged.lock().drain(..).collect();
        let committed = staged.len();
        let mut durable = self.durable.lock();
        for (id, bytes) in staged {
            durable.insert(id, bytes);
        }
        self.savepoints.fetch_add(1, Ordering::Relaxed);
        debug!(committed, "savepoint");
        Ok(())
    }

    async fn load(&self, id: ChunkId) -> Result<Bytes, StoreError> {
        self.durable
            .lock()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }
}
