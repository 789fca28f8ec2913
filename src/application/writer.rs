use bytes::Bytes;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, warn};

use crate::application::payload::{Payload, RandomAccess};
use crate::application::ports::{ChunkStore, StoreError};
use crate::config::StorageConfig;
use crate::domain::chunk::{Body, Chunk, ChunkChain};
use crate::domain::errors::DomainError;

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Write-policy engine: decides how a payload of a given size is
/// represented and drives the incremental checkpoint protocol for large
/// payloads.
///
/// With `CHUNK` the configured chunk size:
/// - `N < CHUNK` stays inline, no wrapper;
/// - `CHUNK <= N <= 2*CHUNK` becomes a single fully-loaded chunk;
/// - `N > 2*CHUNK` becomes a tail-first chunk chain, each chunk recorded,
///   savepointed and evicted before the next (earlier-range) chunk is read —
///   peak resident memory stays O(CHUNK). Without an attached store the
///   same payload degrades to a single fully-loaded chunk.
pub struct BlobWriter {
    store: Option<Arc<dyn ChunkStore>>,
    chunk_size: usize,
}

impl BlobWriter {
    /// Writer backed by a durable store; large payloads are checkpointed.
    pub fn attached(store: Arc<dyn ChunkStore>) -> Self {
        Self::with_config(Some(store), &StorageConfig::default())
    }

    /// Writer with no durable store; everything stays in memory.
    pub fn detached() -> Self {
        Self::with_config(None, &StorageConfig::default())
    }

    pub fn with_config(store: Option<Arc<dyn ChunkStore>>, config: &StorageConfig) -> Self {
        Self {
            store,
            chunk_size: config.chunk_size,
        }
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn is_attached(&self) -> bool {
        self.store.is_some()
    }

    /// Store a payload, returning its representation and byte length.
    ///
    /// On any error no representation is returned, so the caller's previous
    /// body is never replaced by a partial chain.
    pub async fn store_payload(&self, payload: Payload) -> Result<(Body, u64), WriteError> {
        match payload {
            Payload::Text(text) => self.store_bytes(Bytes::from(text.into_bytes())).await,
            Payload::Bytes(bytes) => self.store_bytes(bytes).await,
            Payload::Source(mut source) => self.store_source(source.as_mut()).await,
        }
    }

    async fn store_bytes(&self, bytes: Bytes) -> Result<(Body, u64), WriteError> {
        let total = bytes.len() as u64;
        if total < self.chunk_size as u64 {
            return Ok((Body::Inline(bytes), total));
        }
        if total <= 2 * self.chunk_size as u64 {
            return Ok((Body::Single(Chunk::new(bytes)), total));
        }
        match &self.store {
            None => {
                debug!(size = total, "no store attached; keeping large payload in a single chunk");
                Ok((Body::Single(Chunk::new(bytes)), total))
            }
            Some(store) => {
                let chain = self
                    .build_chain(store.as_ref(), total, &mut BufferRange(&bytes))
                    .await?;
                Ok((Body::Chained(chain), total))
            }
        }
    }

    async fn store_source(
        &self,
        source: &mut (dyn RandomAccess + '_),
    ) -> Result<(Body, u64), WriteError> {
        let total = source.size().await?;
        if total <= 2 * self.chunk_size as u64 {
            let bytes = source.read_range(0, total as usize).await?;
            if total < self.chunk_size as u64 {
                return Ok((Body::Inline(bytes), total));
            }
            return Ok((Body::Single(Chunk::new(bytes)), total));
        }
        match &self.store {
            None => {
                debug!(size = total, "no store attached; loading large source into a single chunk");
                let bytes = source.read_range(0, total as usize).await?;
                Ok((Body::Single(Chunk::new(bytes)), total))
            }
            Some(store) => {
                let chain = self.build_chain(store.as_ref(), total, source).await?;
                Ok((Body::Chained(chain), total))
            }
        }
    }

    /// Build a chunk chain back to front.
    ///
    /// Each chunk covers `[pos, end)` with `pos = end - CHUNK`, except that a
    /// remainder below `CHUNK` is merged into the head chunk so every chunk
    /// holds at least `CHUNK` bytes. The chunk built in one iteration links
    /// to the chunk covering the later byte range, is checkpointed, and its
    /// buffer evicted before the loop moves on.
    async fn build_chain(
        &self,
        store: &dyn ChunkStore,
        total: u64,
        source: &mut (dyn RandomAccess + '_),
    ) -> Result<ChunkChain, WriteError> {
        let chunk_size = self.chunk_size as u64;
        store.attach().await?;

        let mut end = total;
        let mut next: Option<Box<Chunk>> = None;
        while end > 0 {
            let mut pos = end.saturating_sub(chunk_size);
            if pos < chunk_size {
                // Keep at least a full chunk in the head.
                pos = 0;
            }
            let bytes = source.read_range(pos, (end - pos) as usize).await?;
            let mut chunk = Chunk::with_next(bytes.clone(), next.take());

            if let Err(e) = store.record(chunk.id(), bytes).await {
                warn!(chunk = %chunk.id(), "aborting chunked write: record failed");
                return Err(e.into());
            }
            if let Err(e) = store.savepoint().await {
                warn!(chunk = %chunk.id(), "aborting chunked write: savepoint failed");
                return Err(e.into());
            }
            // Durably recorded; the local buffer is no longer needed.
            chunk.evict();
            debug!(chunk = %chunk.id(), start = pos, end, "chunk checkpointed and evicted");

            next = Some(Box::new(chunk));
            end = pos;
        }

        let head = next.ok_or_else(|| {
            StoreError::Internal("chunk chain construction produced no chunks".to_string())
        })?;
        Ok(ChunkChain::new(*head, total))
    }

    /// Reconstitute a body into its full byte sequence, reloading evicted
    /// chunks from the store by identity.
    pub async fn reconstitute(&self, body: &Body) -> Result<Bytes, WriteError> {
        match body {
            Body::Inline(bytes) => Ok(bytes.clone()),
            Body::Single(chunk) => match chunk.bytes() {
                Some(bytes) => Ok(bytes.clone()),
                None => Ok(self.load_chunk_bytes(chunk.id()).await?),
            },
            Body::Chained(chain) => {
                if let Some(bytes) = chain.reconstitute_resident() {
                    return Ok(bytes);
                }
                let mut out = Vec::with_capacity(chain.len() as usize);
                for chunk in chain.iter() {
                    match chunk.bytes() {
                        Some(bytes) => out.extend_from_slice(bytes),
                        None => out.extend_from_slice(&self.load_chunk_bytes(chunk.id()).await?),
                    }
                }
                Ok(Bytes::from(out))
            }
        }
    }

    async fn load_chunk_bytes(
        &self,
        id: crate::domain::chunk::ChunkId,
    ) -> Result<Bytes, StoreError> {
        let store = self.store.as_ref().ok_or(StoreError::Detached)?;
        store.load(id).await
    }
}

/// In-memory payloads chunk by zero-copy slicing.
struct BufferRange<'a>(&'a Bytes);

#[async_trait::async_trait]
impl RandomAccess for BufferRange<'_> {
    async fn size(&mut self) -> std::io::Result<u64> {
        Ok(self.0.len() as u64)
    }

    async fn read_range(&mut self, pos: u64, len: usize) -> std::io::Result<Bytes> {
        let start = pos as usize;
        let end = start
            .checked_add(len)
            .filter(|&e| e <= self.0.len())
            .ok_or_else(|| {
                std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "range past end of buffer")
            })?;
        Ok(self.0.slice(start..end))
    }
}
