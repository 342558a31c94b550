// packages/extensions/src/recording/mod.rs
//! Trace persistence
//!
//! - **Trace file**: events plus the extension table the viewer needs
//! - **Compressor**: optional zstd compression of trace files
//!
//! ```text
//! RingRecorder::drain() → TraceDocument { header: extensions, events }
//!                                  ↓
//!                          serde_json → zstd → file
//! ```

pub mod compressor;
pub mod trace_file;

// Re-export commonly used types
pub use compressor::Compressor;
pub use trace_file::{ExtensionRecord, TraceDocument, TRACE_FORMAT_VERSION};
