//! # chunkfile - Chunked Binary File and Image Storage
//!
//! Stores arbitrary binary payloads durably while bounding peak memory
//! during large writes, and classifies opaque byte buffers into known image
//! formats without invoking a full decoder.
//!
//! ## Architecture Layers
//!
//! - **Domain**: entities (`File`, `Image`), the chunk chain representation,
//!   the format sniffer, charset transcoding, domain errors
//! - **Application**: the write-policy engine (`BlobWriter`), the durable
//!   store port (`ChunkStore`), payload sources, the upload classification
//!   factory
//! - **Infrastructure**: adapters; an in-memory `ChunkStore` reference
//!   implementation
//!
//! ## Key Features
//!
//! - Size-based representation policy: inline, single chunk, or a tail-first
//!   chunk chain with one incremental checkpoint per chunk
//! - Peak resident memory bounded to one chunk for large writes against an
//!   attached store; graceful single-chunk fallback without one
//! - Header-only sniffing of GIF, PNG, JPEG and BMP with pixel dimensions
//! - Text round-trips under declared charsets with a precise error taxonomy
//!
//! ## Example
//!
//! ```
//! use chunkfile::application::payload::Payload;
//! use chunkfile::application::writer::BlobWriter;
//! use chunkfile::domain::entities::Image;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let writer = BlobWriter::detached();
//! let mut image = Image::new();
//! image.set_data(&writer, Some(Payload::from(vec![0u8; 4])), "").await?;
//! # Ok(())
//! # }
//! ```

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-export key types explicitly to avoid ambiguity
pub use application::factory::{clean_file_name, FileFactory, MimeGuesser, StoredObject};
pub use application::payload::Payload;
pub use application::ports::{ChunkStore, StoreError};
pub use application::writer::{BlobWriter, WriteError};
pub use config::{StorageConfig, DEFAULT_CHUNK_SIZE};
pub use domain::chunk::{Body, Chunk, ChunkChain, ChunkId};
pub use domain::entities::{File, Image};
pub use domain::errors::DomainError;
pub use domain::sniff::{sniff, ImageInfo};
pub use domain::value_objects::Dimensions;
pub use infrastructure::InMemoryChunkStore;
