use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identity of a chunk inside the durable store.
///
/// A chunk keeps its id for its whole life, so an evicted buffer can be
/// reloaded later by the same identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkId(Uuid);

impl ChunkId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether a chunk's buffer is resident or has been evicted after a
/// successful checkpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ChunkState {
    /// Buffer is in memory.
    Loaded(Bytes),
    /// Buffer was checkpointed and dropped; reloadable from the store by id.
    Ghost,
}

/// One bounded-size node of a chunk chain.
///
/// Chains are forward-linked: `next` points at the chunk covering the byte
/// range immediately after this one. The terminal chunk has `next = None`.
/// A chain is never mutated once a write completes; a new write builds an
/// entirely new chain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    id: ChunkId,
    len: u64,
    state: ChunkState,
    next: Option<Box<Chunk>>,
}

impl Chunk {
    pub fn new(bytes: Bytes) -> Self {
        Self {
            id: ChunkId::new(),
            len: bytes.len() as u64,
            state: ChunkState::Loaded(bytes),
            next: None,
        }
    }

    pub fn with_next(bytes: Bytes, next: Option<Box<Chunk>>) -> Self {
        let mut chunk = Self::new(bytes);
        chunk.next = next;
        chunk
    }

    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Byte length of this chunk alone, resident or not.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The resident buffer, if this chunk has not been evicted.
    pub fn bytes(&self) -> Option<&Bytes> {
        match &self.state {
            ChunkState::Loaded(bytes) => Some(bytes),
            ChunkState::Ghost => None,
        }
    }

    pub fn is_ghost(&self) -> bool {
        matches!(self.state, ChunkState::Ghost)
    }

    pub fn next(&self) -> Option<&Chunk> {
        self.next.as_deref()
    }

    /// Drop the resident buffer. Only valid once the chunk's bytes are
    /// durably recorded; the chunk stays reloadable by id.
    pub fn evict(&mut self) {
        self.state = ChunkState::Ghost;
    }
}

/// A forward-linked sequence of chunks representing one logical blob.
///
/// `head` covers the first byte range; walking `next` pointers and
/// concatenating yields the full payload in original order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChain {
    head: Box<Chunk>,
    len: u64,
}

impl ChunkChain {
    pub fn new(head: Chunk, len: u64) -> Self {
        Self {
            head: Box::new(head),
            len,
        }
    }

    /// Total payload length, tracked incrementally during construction.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn head(&self) -> &Chunk {
        &self.head
    }

    /// Iterate chunks head to tail, i.e. in payload byte order.
    pub fn iter(&self) -> ChunkIter<'_> {
        ChunkIter {
            current: Some(&self.head),
        }
    }

    /// Number of chunks in the chain.
    pub fn chunk_count(&self) -> usize {
        self.iter().count()
    }

    /// Concatenate the chain without store access.
    ///
    /// Returns `None` if any chunk has been evicted; reconstituting a chain
    /// with ghosts goes through the writer, which can reload by id.
    pub fn reconstitute_resident(&self) -> Option<Bytes> {
        let mut out = Vec::with_capacity(self.len as usize);
        for chunk in self.iter() {
            out.extend_from_slice(chunk.bytes()?);
        }
        Some(Bytes::from(out))
    }
}

pub struct ChunkIter<'a> {
    current: Option<&'a Chunk>,
}

impl<'a> Iterator for ChunkIter<'a> {
    type Item = &'a Chunk;

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.current?;
        self.current = chunk.next();
        Some(chunk)
    }
}

/// Stored representation of a file body.
///
/// The write policy picks the variant from the payload size: small payloads
/// stay inline, mid-size payloads get a single chunk, large payloads become
/// a checkpointed chain (or a single fully-loaded chunk when no store is
/// attached).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Body {
    Inline(Bytes),
    Single(Chunk),
    Chained(ChunkChain),
}

impl Body {
    pub fn empty() -> Self {
        Body::Inline(Bytes::new())
    }

    pub fn len(&self) -> u64 {
        match self {
            Body::Inline(bytes) => bytes.len() as u64,
            Body::Single(chunk) => chunk.len(),
            Body::Chained(chain) => chain.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Body {
    fn default() -> Self {
        Body::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_of(parts: &[&[u8]]) -> ChunkChain {
        let mut next: Option<Box<Chunk>> = None;
        let mut len = 0u64;
        for part in parts.iter().rev() {
            len += part.len() as u64;
            next = Some(Box::new(Chunk::with_next(
                Bytes::copy_from_slice(part),
                next,
            )));
        }
        ChunkChain::new(*next.expect("at least one part"), len)
    }

    #[test]
    fn test_chain_iterates_in_byte_order() {
        let chain = chain_of(&[b"abc", b"def", b"gh"]);
        let lens: Vec<u64> = chain.iter().map(|c| c.len()).collect();
        assert_eq!(lens, vec![3, 3, 2]);
        assert_eq!(chain.chunk_count(), 3);
        assert_eq!(chain.len(), 8);
    }

    #[test]
    fn test_reconstitute_resident_preserves_order() {
        let chain = chain_of(&[b"abc", b"def", b"gh"]);
        assert_eq!(
            chain.reconstitute_resident().unwrap(),
            Bytes::from_static(b"abcdefgh")
        );
    }

    #[test]
    fn test_reconstitute_resident_bails_on_ghost() {
        let mut head = Chunk::new(Bytes::from_static(b"abc"));
        head.evict();
        let chain = ChunkChain::new(head, 3);
        assert!(chain.reconstitute_resident().is_none());
        assert!(chain.head().is_ghost());
    }

    #[test]
    fn test_chunk_keeps_length_after_eviction() {
        let mut chunk = Chunk::new(Bytes::from_static(b"abcdef"));
        assert_eq!(chunk.len(), 6);
        assert!(chunk.bytes().is_some());

        chunk.evict();
        assert_eq!(chunk.len(), 6);
        assert!(chunk.bytes().is_none());
    }

    #[test]
    fn test_terminal_chunk_has_no_next() {
        let chain = chain_of(&[b"abc", b"def"]);
        let last = chain.iter().last().unwrap();
        assert!(last.next().is_none());
    }

    #[test]
    fn test_body_len() {
        assert_eq!(Body::empty().len(), 0);
        assert!(Body::empty().is_empty());
        assert_eq!(Body::Inline(Bytes::from_static(b"abc")).len(), 3);
        assert_eq!(Body::Single(Chunk::new(Bytes::from_static(b"abcd"))).len(), 4);
    }
}
