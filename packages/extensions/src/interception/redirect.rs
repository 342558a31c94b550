// packages/extensions/src/interception/redirect.rs
//! Call-site redirection
//!
//! A third-party API is expressed as a trait, and call sites are written
//! against that trait. Redirecting them to trace wrappers means binding
//! [`Traced<Original, Sink>`] instead of the original at the composition
//! root; the call sites themselves stay untouched. The extension provides
//! `impl Api for Traced<A, S>` with one wrapper per function.
//!
//! - Redirecting an already traced value adds a pass-through layer that
//!   emits nothing, so including an extension twice never doubles events.
//! - The original type and its impl are not modified; code holding the
//!   original still calls it directly.
//! - [`Traced::original`] is the opt-out for code that needs the true,
//!   uninstrumented function.

use crate::extension::descriptor::EventCode;
use crate::interception::interceptor::{intercept, intercept_string, TraceValue};
use crate::sink::EventSink;
use std::sync::Arc;
use tracing::debug;

/// Implemented by every API surface an extension can redirect
///
/// Original implementations use the default. Only [`Traced`] reports `true`.
pub trait Interceptable {
    fn is_intercepted(&self) -> bool {
        false
    }
}

impl<T: Interceptable + ?Sized> Interceptable for &T {
    fn is_intercepted(&self) -> bool {
        (**self).is_intercepted()
    }
}

impl<T: Interceptable + ?Sized> Interceptable for Arc<T> {
    fn is_intercepted(&self) -> bool {
        (**self).is_intercepted()
    }
}

impl<T: Interceptable + ?Sized> Interceptable for Box<T> {
    fn is_intercepted(&self) -> bool {
        (**self).is_intercepted()
    }
}

/// An API implementation whose calls go through trace wrappers
#[derive(Debug, Clone)]
pub struct Traced<A, S> {
    original: A,
    /// `None` for a pass-through layer over an already traced value
    sink: Option<S>,
}

impl<A: Interceptable, S: EventSink> Traced<A, S> {
    /// Bind `original` to wrappers that emit into `sink`
    pub fn redirect(original: A, sink: S) -> Self {
        if original.is_intercepted() {
            debug!("API already intercepted, adding pass-through layer");
            Self {
                original,
                sink: None,
            }
        } else {
            Self {
                original,
                sink: Some(sink),
            }
        }
    }
}

impl<A, S: EventSink> Traced<A, S> {
    /// The uninstrumented implementation
    pub fn original(&self) -> &A {
        &self.original
    }

    /// Unbind the wrappers and return the original implementation
    pub fn into_original(self) -> A {
        self.original
    }

    /// Sink events go to, `None` for a pass-through layer
    pub fn sink(&self) -> Option<&S> {
        self.sink.as_ref()
    }

    /// Whether this layer emits events itself
    pub fn is_recording_layer(&self) -> bool {
        self.sink.is_some()
    }

    /// Wrapper body for a call recorded as a scalar event
    #[inline]
    pub fn call<R, F>(&self, code: EventCode, call: F) -> R
    where
        R: TraceValue,
        F: FnOnce(&A) -> R,
    {
        match &self.sink {
            Some(sink) => intercept(sink, code, || call(&self.original)),
            None => call(&self.original),
        }
    }

    /// Wrapper body for a call recorded as a string event
    #[inline]
    pub fn call_with_string<R, F>(&self, code: EventCode, text: &str, args: &[u32], call: F) -> R
    where
        R: TraceValue,
        F: FnOnce(&A) -> R,
    {
        match &self.sink {
            Some(sink) => intercept_string(sink, code, text, args, || call(&self.original)),
            None => call(&self.original),
        }
    }
}

impl<A, S> Interceptable for Traced<A, S> {
    fn is_intercepted(&self) -> bool {
        true
    }
}
