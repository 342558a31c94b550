// packages/extensions/src/interception/mod.rs
//! Call interception layer
//!
//! This module provides transparent tracing of third-party API calls:
//!
//! - **Interceptor**: wrapper bodies that call the original once and emit
//!   one event with the real result
//! - **Redirect**: binds call sites to the wrappers without editing them
//!
//! # Architecture
//!
//! ```text
//! Call site (unmodified, generic over the API trait)
//!     │
//!     └─ api.connect_ap(params)
//!            │
//!            ├─ Original API            (uninstrumented binding)
//!            └─ Traced<Original, Sink>  (instrumented binding)
//!                   ├─ original.connect_ap(params) → ret
//!                   ├─ sink.emit_string(code, ssid, [security, ret])
//!                   └─ return ret
//! ```
//!
//! Wrappers add no threads, locks or queues. They are as thread-safe as the
//! original API and the sink.

pub mod interceptor;
pub mod redirect;

// Re-export commonly used types
pub use interceptor::{intercept, intercept_string, TraceValue};
pub use redirect::{Interceptable, Traced};
