// packages/extensions/src/interception/interceptor.rs
//! Call interceptors
//!
//! Building blocks for trace wrappers. Each helper invokes the original call
//! exactly once, emits exactly one event after it returns, and hands back
//! the original result untouched. Failures are recorded like successes: the
//! status simply ends up in the payload.

use crate::extension::descriptor::EventCode;
use crate::sink::{EventSink, MAX_STRING_EVENT_SCALARS};

/// Conversion of a call result or argument into an unsigned event field
///
/// Enumerated status codes map to their discriminant, signed values are
/// reinterpreted bit for bit, `()` records completion as 0.
pub trait TraceValue {
    fn trace_value(&self) -> u32;
}

impl TraceValue for () {
    #[inline]
    fn trace_value(&self) -> u32 {
        0
    }
}

impl TraceValue for bool {
    #[inline]
    fn trace_value(&self) -> u32 {
        *self as u32
    }
}

macro_rules! impl_trace_value {
    ($($ty:ty),*) => {
        $(
            impl TraceValue for $ty {
                #[inline]
                fn trace_value(&self) -> u32 {
                    *self as u32
                }
            }
        )*
    };
}

impl_trace_value!(u8, u16, u32, i8, i16, i32);

impl<T: TraceValue, E: TraceValue> TraceValue for Result<T, E> {
    #[inline]
    fn trace_value(&self) -> u32 {
        match self {
            Ok(v) => v.trace_value(),
            Err(e) => e.trace_value(),
        }
    }
}

/// Run `call` and record its result as a scalar event
#[inline]
pub fn intercept<S, R, F>(sink: &S, code: EventCode, call: F) -> R
where
    S: EventSink + ?Sized,
    R: TraceValue,
    F: FnOnce() -> R,
{
    let ret = call();
    sink.emit_scalar(code, ret.trace_value());
    ret
}

/// Run `call` and record `text`, the `args` fields and the result
///
/// The event's scalar fields are `args` followed by the result. At most
/// `MAX_STRING_EVENT_SCALARS - 1` arguments fit beside the result.
#[inline]
pub fn intercept_string<S, R, F>(sink: &S, code: EventCode, text: &str, args: &[u32], call: F) -> R
where
    S: EventSink + ?Sized,
    R: TraceValue,
    F: FnOnce() -> R,
{
    debug_assert!(
        args.len() < MAX_STRING_EVENT_SCALARS,
        "string event carries at most {} arguments beside the result",
        MAX_STRING_EVENT_SCALARS - 1
    );

    let ret = call();

    let n = args.len().min(MAX_STRING_EVENT_SCALARS - 1);
    let mut fields = [0u32; MAX_STRING_EVENT_SCALARS];
    fields[..n].copy_from_slice(&args[..n]);
    fields[n] = ret.trace_value();
    sink.emit_string(code, text, &fields[..=n]);

    ret
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{Payload, RingRecorder};
    use std::cell::Cell;

    #[test]
    fn test_trace_values() {
        assert_eq!(().trace_value(), 0);
        assert_eq!(true.trace_value(), 1);
        assert_eq!((-1i32).trace_value(), u32::MAX);
        assert_eq!(7u8.trace_value(), 7);
        assert_eq!(Ok::<u32, u32>(0).trace_value(), 0);
        assert_eq!(Err::<u32, u32>(3).trace_value(), 3);
    }

    #[test]
    fn test_intercept_returns_result_and_emits_once() {
        let recorder = RingRecorder::with_capacity(8);
        let calls = Cell::new(0);

        let ret = intercept(&recorder, EventCode(0x100), || {
            calls.set(calls.get() + 1);
            -5i32
        });

        assert_eq!(ret, -5);
        assert_eq!(calls.get(), 1);

        let events = recorder.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].payload, Payload::Scalar { value: (-5i32) as u32 });
    }

    #[test]
    fn test_event_emitted_after_call() {
        let recorder = RingRecorder::with_capacity(8);

        intercept(&recorder, EventCode(0x100), || {
            assert_eq!(recorder.stats().recorded, 0);
            1u32
        });

        assert_eq!(recorder.stats().recorded, 1);
    }

    #[test]
    fn test_intercept_string_layout() {
        let recorder = RingRecorder::with_capacity(8);

        let ret = intercept_string(&recorder, EventCode(0x102), "home-ap", &[2], || 1u32);

        assert_eq!(ret, 1);
        let events = recorder.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].text(), Some("home-ap"));
        assert_eq!(events[0].scalars(), &[2, 1]);
    }

    #[test]
    fn test_unit_call_records_completion() {
        let recorder = RingRecorder::with_capacity(8);
        intercept(&recorder, EventCode(0x101), || ());

        let events = recorder.drain();
        assert_eq!(events[0].scalars(), &[0]);
    }
}
