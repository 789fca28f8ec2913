use serde::{Deserialize, Serialize};

/// Size classification threshold in bytes.
///
/// Externally observable contract: payloads below it stay inline, payloads
/// up to twice this size become a single chunk, anything larger is chunked
/// and checkpointed. Consumers relying on representation shape depend on
/// this exact value.
pub const DEFAULT_CHUNK_SIZE: usize = 1 << 16;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub chunk_size: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            chunk_size: std::env::var("CHUNKFILE_CHUNK_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CHUNK_SIZE),
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_size == 0 {
            return Err("chunk_size must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_chunk_size() {
        let config = StorageConfig::default();
        assert_eq!(config.chunk_size, 65536);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        let config = StorageConfig { chunk_size: 0 };
        assert!(config.validate().is_err());
    }
}
