//! Property-based tests using proptest
//!
//! Random inputs exercise the representation policy round-trip and the
//! sniffer's totality guarantee.

use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;

use chunkfile::{sniff, BlobWriter, InMemoryChunkStore, Payload, StorageConfig};

/// Small chunk size so arbitrary vectors cheaply cover every representation
/// (inline, single, chained) without megabyte fixtures.
const TEST_CHUNK: usize = 64;

fn test_writer(attached: bool) -> BlobWriter {
    let config = StorageConfig {
        chunk_size: TEST_CHUNK,
    };
    let store: Option<Arc<dyn chunkfile::ChunkStore>> = if attached {
        Some(Arc::new(InMemoryChunkStore::new()))
    } else {
        None
    };
    BlobWriter::with_config(store, &config)
}

proptest! {
    /// reconstitute(store(B)) == B for every representation the policy picks.
    #[test]
    fn round_trip_any_bytes_attached(data in proptest::collection::vec(any::<u8>(), 0..16 * TEST_CHUNK)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let writer = test_writer(true);
            let original = Bytes::from(data);
            let (body, size) = writer
                .store_payload(Payload::Bytes(original.clone()))
                .await
                .unwrap();
            prop_assert_eq!(size, original.len() as u64);
            prop_assert_eq!(body.len(), original.len() as u64);
            prop_assert_eq!(writer.reconstitute(&body).await.unwrap(), original);
            Ok(())
        })?;
    }

    /// The detached fallback must round-trip too, without any store.
    #[test]
    fn round_trip_any_bytes_detached(data in proptest::collection::vec(any::<u8>(), 0..8 * TEST_CHUNK)) {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async {
            let writer = test_writer(false);
            let original = Bytes::from(data);
            let (body, _) = writer
                .store_payload(Payload::Bytes(original.clone()))
                .await
                .unwrap();
            prop_assert_eq!(writer.reconstitute(&body).await.unwrap(), original);
            Ok(())
        })?;
    }

    /// The sniffer is total: any buffer yields a well-formed verdict and
    /// never panics.
    #[test]
    fn sniffer_total_on_arbitrary_buffers(data in proptest::collection::vec(any::<u8>(), 0..256)) {
        let info = sniff(&data);
        prop_assert!(matches!(
            info.content_type.as_str(),
            "" | "image/gif" | "image/png" | "image/jpeg" | "image/x-ms-bmp"
        ));
        prop_assert!(info.width >= -1);
        prop_assert!(info.height >= -1);
        if !info.is_recognized() {
            prop_assert_eq!(info.width, -1);
            prop_assert_eq!(info.height, -1);
        }
    }
}
