// packages/extensions/src/sink/event.rs
//! Recorded trace events

use crate::extension::descriptor::EventCode;
use serde::{Deserialize, Serialize};

/// Event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// One numeric field, typically a status code
    Scalar { value: u32 },

    /// One string followed by a fixed number of numeric fields
    String { text: String, scalars: Vec<u32> },
}

/// One recorded event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceEvent {
    pub code: EventCode,

    /// Nanoseconds since the recorder started, assigned by the sink
    pub timestamp_ns: u64,

    pub payload: Payload,
}

impl TraceEvent {
    /// String field, if this is a string event
    pub fn text(&self) -> Option<&str> {
        match &self.payload {
            Payload::String { text, .. } => Some(text),
            Payload::Scalar { .. } => None,
        }
    }

    /// Numeric fields in recorded order
    pub fn scalars(&self) -> &[u32] {
        match &self.payload {
            Payload::Scalar { value } => std::slice::from_ref(value),
            Payload::String { scalars, .. } => scalars,
        }
    }
}
