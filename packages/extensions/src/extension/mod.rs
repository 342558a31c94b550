// packages/extensions/src/extension/mod.rs
//! Extension identity and the shared event-code space
//!
//! - **Descriptor**: name, version and reserved code range of one extension
//! - **Table**: build-time lists of extensions, chained and checked for collisions
//! - **Registry**: runtime allocation for extensions assembled at startup
//! - **Schema**: viewer-side schema file naming and lookup
//!
//! # Code space
//!
//! ```text
//! 0x000 ───────── 0x0FF │ 0x100 ─────────────────────────────── 0xFFF
//!   recorder core       │ ext 1 [base, +count) │ ext 2 │ ... │ free
//! ```

pub mod descriptor;
pub mod registry;
pub mod schema;
pub mod table;

pub use descriptor::{
    EventCode, ExtensionDescriptor, ExtensionVersion, CODE_SPACE_END, EXTENSION_CODE_BASE,
    MAX_EVENT_CODE,
};
pub use registry::ExtensionRegistry;
pub use schema::{schema_file_name, SchemaLocator};
pub use table::{check_chained, check_table, next_free_code, validate_chained, validate_table};
