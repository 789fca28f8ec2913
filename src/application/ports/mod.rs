mod chunk_store;

pub use chunk_store::{ChunkStore, StoreError};

#[cfg(test)]
pub use chunk_store::MockChunkStore;
