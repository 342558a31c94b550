// packages/extensions/src/lib.rs
//! Recorder Extensions Kit
//!
//! Non-intrusive tracing of third-party API calls for a trace recorder.
//!
//! # Architecture
//!
//! The crate is structured into several key modules:
//!
//! - **extension**: descriptors, the shared event-code space, schema lookup
//! - **sink**: the recorder event sink interface and a bounded reference sink
//! - **interception**: trace wrappers and call-site redirection
//! - **extensions**: extensions shipped with the kit (aws_wifi)
//! - **recording**: trace files carrying the extension table
//! - **observability**: logging and metrics setup
//! - **utils**: configuration and errors
//!
//! # Writing an extension
//!
//! 1. Add an entry to the extension table (name, version, event count).
//! 2. Express the traced API as a trait with `Interceptable` as supertrait.
//! 3. Implement that trait for `Traced<A, S>`, one wrapper per function,
//!    using `Traced::call` / `Traced::call_with_string`.
//! 4. Ship a `<name>-v<major>.<minor>.<patch>.xml` schema for the viewer.

// Public module exports
pub mod extension;
pub mod extensions;
pub mod interception;
pub mod observability;
pub mod recording;
pub mod sink;
pub mod utils;

// Re-export commonly used types
pub use extension::{
    EventCode, ExtensionDescriptor, ExtensionRegistry, ExtensionVersion, SchemaLocator,
};
pub use interception::{Interceptable, TraceValue, Traced};
pub use sink::{EventSink, NullSink, RingRecorder};
pub use utils::config::KitConfig;
pub use utils::errors::{ExtensionError, Result};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
