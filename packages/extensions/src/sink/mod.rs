// packages/extensions/src/sink/mod.rs
//! Recorder event sink
//!
//! The narrow interface every extension emits through. It mirrors the two
//! primitives a trace recorder core exposes:
//!
//! - **emit_scalar**: one event with a single numeric field
//! - **emit_string**: one event with a string and trailing numeric fields
//!
//! Both are fire-and-forget. A sink never reports failure to the caller and
//! never blocks: when the recorder is stopped or its buffer is full the event
//! is dropped. How long strings and extra fields are handled is up to the
//! sink; see [`RingRecorder`] for the reference policy.

pub mod event;
pub mod ring;

pub use event::{Payload, TraceEvent};
pub use ring::{RingRecorder, SinkStats};

use crate::extension::descriptor::EventCode;
use std::sync::Arc;

/// Most scalar fields a string event carries
pub const MAX_STRING_EVENT_SCALARS: usize = 4;

/// Destination for trace events
pub trait EventSink: Send + Sync {
    /// Record an event with one numeric field
    fn emit_scalar(&self, code: EventCode, value: u32);

    /// Record an event with one string and `scalars.len()` numeric fields
    fn emit_string(&self, code: EventCode, text: &str, scalars: &[u32]);
}

impl<S: EventSink + ?Sized> EventSink for &S {
    #[inline]
    fn emit_scalar(&self, code: EventCode, value: u32) {
        (**self).emit_scalar(code, value)
    }

    #[inline]
    fn emit_string(&self, code: EventCode, text: &str, scalars: &[u32]) {
        (**self).emit_string(code, text, scalars)
    }
}

impl<S: EventSink + ?Sized> EventSink for Arc<S> {
    #[inline]
    fn emit_scalar(&self, code: EventCode, value: u32) {
        (**self).emit_scalar(code, value)
    }

    #[inline]
    fn emit_string(&self, code: EventCode, text: &str, scalars: &[u32]) {
        (**self).emit_string(code, text, scalars)
    }
}

impl<S: EventSink + ?Sized> EventSink for Box<S> {
    #[inline]
    fn emit_scalar(&self, code: EventCode, value: u32) {
        (**self).emit_scalar(code, value)
    }

    #[inline]
    fn emit_string(&self, code: EventCode, text: &str, scalars: &[u32]) {
        (**self).emit_string(code, text, scalars)
    }
}

/// Sink for an inactive recorder; every event is dropped
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    #[inline]
    fn emit_scalar(&self, _code: EventCode, _value: u32) {}

    #[inline]
    fn emit_string(&self, _code: EventCode, _text: &str, _scalars: &[u32]) {}
}
