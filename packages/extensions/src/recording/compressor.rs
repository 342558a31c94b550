// packages/extensions/src/recording/compressor.rs
//! zstd compression for trace files

use crate::utils::errors::{ExtensionError, Result};
use tracing::debug;

/// zstd frame magic number, little endian
pub const ZSTD_MAGIC: [u8; 4] = [0x28, 0xB5, 0x2F, 0xFD];

/// Compressor using zstd
#[derive(Debug, Clone, Copy)]
pub struct Compressor {
    level: i32,
}

impl Compressor {
    /// Create a compressor at the given zstd level (1..=22)
    pub fn new(level: i32) -> Self {
        Self {
            level: level.clamp(1, 22),
        }
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    /// Compress data
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let compressed = zstd::encode_all(data, self.level)
            .map_err(|e| ExtensionError::Compression(format!("compression error: {}", e)))?;

        debug!(
            "Compressed {} bytes -> {} bytes at level {}",
            data.len(),
            compressed.len(),
            self.level
        );

        Ok(compressed)
    }

    /// Decompress data
    pub fn decompress(data: &[u8]) -> Result<Vec<u8>> {
        zstd::decode_all(data)
            .map_err(|e| ExtensionError::Compression(format!("decompression error: {}", e)))
    }

    /// Whether `data` starts with a zstd frame
    pub fn is_compressed(data: &[u8]) -> bool {
        data.starts_with(&ZSTD_MAGIC)
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(3)
    }
}
