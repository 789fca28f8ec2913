use async_trait::async_trait;
use bytes::Bytes;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::domain::chunk::ChunkId;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Chunk not found: {0}")]
    NotFound(ChunkId),

    #[error("No store attached")]
    Detached,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Port for the durable store backing chunked writes.
///
/// The writer drives it in a fixed order per chunk: `record`, then
/// `savepoint`, then the writer-local eviction of the buffer. `savepoint` is
/// an incremental, non-final commit; once it returns, the chunks recorded
/// since the previous savepoint must be reloadable by id even if the
/// enclosing operation later aborts locally.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Ensure a transaction context exists before a chained write begins.
    async fn attach(&self) -> Result<(), StoreError>;

    /// Stage a chunk's bytes under its identity.
    async fn record(&self, id: ChunkId, bytes: Bytes) -> Result<(), StoreError>;

    /// Durably commit everything staged since the last savepoint.
    async fn savepoint(&self) -> Result<(), StoreError>;

    /// Reload an evicted chunk's bytes by identity.
    async fn load(&self, id: ChunkId) -> Result<Bytes, StoreError>;
}
