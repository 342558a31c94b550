// packages/extensions/src/sink/ring.rs
//! Bounded in-process recorder
//!
//! Reference [`EventSink`]: timestamps events and buffers them in a lock-free
//! bounded queue until drained. Never blocks the emitting thread.
//!
//! # Loss and truncation policy
//!
//! - Stopped recorder: event dropped
//! - Full buffer: event dropped (the oldest events are kept)
//! - String longer than `max_string_len` bytes: cut at the last UTF-8 char
//!   boundary within the limit
//! - More than [`MAX_STRING_EVENT_SCALARS`] scalar fields: extras dropped
//!
//! Every drop and truncation is counted in [`SinkStats`] and in the
//! `recorder_events_*` metrics.

use crate::extension::descriptor::EventCode;
use crate::observability::{EVENTS_DROPPED, EVENTS_RECORDED, EVENTS_TRUNCATED};
use crate::sink::event::{Payload, TraceEvent};
use crate::sink::{EventSink, MAX_STRING_EVENT_SCALARS};
use crate::utils::config::RecorderConfig;
use crossbeam::queue::ArrayQueue;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Lock-free bounded recorder sink
pub struct RingRecorder {
    queue: ArrayQueue<TraceEvent>,
    epoch: Instant,
    max_string_len: usize,
    active: AtomicBool,

    /// Set while the buffer is overflowing, to log only the transition
    under_pressure: AtomicBool,

    recorded: AtomicU64,
    dropped: AtomicU64,
    truncated: AtomicU64,
    drained: AtomicU64,
}

impl RingRecorder {
    /// Create a recorder from configuration
    pub fn new(config: &RecorderConfig) -> Self {
        info!(
            "Initializing recorder with capacity {} (max string {} bytes)",
            config.capacity, config.max_string_len
        );

        Self {
            queue: ArrayQueue::new(config.capacity.max(1)),
            epoch: Instant::now(),
            max_string_len: config.max_string_len.max(1),
            active: AtomicBool::new(config.start_active),
            under_pressure: AtomicBool::new(false),
            recorded: AtomicU64::new(0),
            dropped: AtomicU64::new(0),
            truncated: AtomicU64::new(0),
            drained: AtomicU64::new(0),
        }
    }

    /// Active recorder with default limits and the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(&RecorderConfig {
            capacity,
            ..RecorderConfig::default()
        })
    }

    /// Start accepting events
    pub fn start(&self) {
        if !self.active.swap(true, Ordering::AcqRel) {
            debug!("Recorder started");
        }
    }

    /// Stop accepting events; later emissions are dropped
    pub fn stop(&self) {
        if self.active.swap(false, Ordering::AcqRel) {
            debug!("Recorder stopped");
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Remove and return all buffered events, oldest first
    pub fn drain(&self) -> Vec<TraceEvent> {
        let mut events = Vec::with_capacity(self.queue.len());
        while let Some(event) = self.queue.pop() {
            events.push(event);
        }
        self.drained.fetch_add(events.len() as u64, Ordering::Relaxed);
        events
    }

    /// Snapshot of the recorder counters
    pub fn stats(&self) -> SinkStats {
        SinkStats {
            recorded: self.recorded.load(Ordering::Relaxed),
            dropped: self.dropped.load(Ordering::Relaxed),
            truncated: self.truncated.load(Ordering::Relaxed),
            drained: self.drained.load(Ordering::Relaxed),
            pending: self.queue.len(),
            capacity: self.queue.capacity(),
        }
    }

    pub fn max_string_len(&self) -> usize {
        self.max_string_len
    }

    fn timestamp_ns(&self) -> u64 {
        self.epoch.elapsed().as_nanos() as u64
    }

    /// Returns whether the event was accepted into the buffer
    fn store(&self, code: EventCode, payload: Payload) -> bool {
        if !self.is_active() {
            self.note_drop();
            return false;
        }

        let event = TraceEvent {
            code,
            timestamp_ns: self.timestamp_ns(),
            payload,
        };

        match self.queue.push(event) {
            Ok(()) => {
                self.recorded.fetch_add(1, Ordering::Relaxed);
                metrics::counter!(EVENTS_RECORDED).increment(1);
                if self.under_pressure.load(Ordering::Relaxed) {
                    self.under_pressure.store(false, Ordering::Relaxed);
                }
                true
            }
            Err(_) => {
                self.note_drop();
                if !self.under_pressure.swap(true, Ordering::Relaxed) {
                    warn!(
                        "Recorder buffer full ({} events), dropping new events",
                        self.queue.capacity()
                    );
                }
                false
            }
        }
    }

    fn note_drop(&self) {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(EVENTS_DROPPED).increment(1);
    }

    fn note_truncation(&self) {
        self.truncated.fetch_add(1, Ordering::Relaxed);
        metrics::counter!(EVENTS_TRUNCATED).increment(1);
    }
}

impl EventSink for RingRecorder {
    fn emit_scalar(&self, code: EventCode, value: u32) {
        self.store(code, Payload::Scalar { value });
    }

    fn emit_string(&self, code: EventCode, text: &str, scalars: &[u32]) {
        // Skip the copies when nothing would be stored
        if !self.is_active() {
            self.note_drop();
            return;
        }

        let kept_text = truncate_at_char_boundary(text, self.max_string_len);
        let kept_scalars = &scalars[..scalars.len().min(MAX_STRING_EVENT_SCALARS)];
        let shortened = kept_text.len() < text.len() || kept_scalars.len() < scalars.len();

        let accepted = self.store(
            code,
            Payload::String {
                text: kept_text.to_owned(),
                scalars: kept_scalars.to_vec(),
            },
        );
        // Only events that made it into the buffer count as truncated
        if accepted && shortened {
            self.note_truncation();
        }
    }
}

impl std::fmt::Debug for RingRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingRecorder")
            .field("active", &self.is_active())
            .field("stats", &self.stats())
            .finish()
    }
}

/// Longest prefix of `text` within `max` bytes that ends on a char boundary
pub fn truncate_at_char_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Recorder counters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkStats {
    /// Events accepted into the buffer
    pub recorded: u64,

    /// Events lost because the recorder was stopped or full
    pub dropped: u64,

    /// Accepted events whose fields were shortened
    pub truncated: u64,

    /// Events handed out by `drain`
    pub drained: u64,

    /// Events currently buffered
    pub pending: usize,

    pub capacity: usize,
}

impl SinkStats {
    /// Buffer fill as a percentage
    pub fn fill_percentage(&self) -> f64 {
        (self.pending as f64 / self.capacity as f64) * 100.0
    }

    /// Share of emitted events that were lost, as a percentage
    pub fn drop_rate(&self) -> f64 {
        let emitted = self.recorded + self.dropped;
        if emitted == 0 {
            0.0
        } else {
            (self.dropped as f64 / emitted as f64) * 100.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_scalar_event_recorded() {
        let recorder = RingRecorder::with_capacity(4);
        recorder.emit_scalar(EventCode(0x100), 7);

        let events = recorder.drain();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].code, EventCode(0x100));
        assert_eq!(events[0].payload, Payload::Scalar { value: 7 });
        assert!(recorder.drain().is_empty());
    }

    #[test]
    fn test_timestamps_monotonic() {
        let recorder = RingRecorder::with_capacity(16);
        for i in 0..10 {
            recorder.emit_scalar(EventCode(0x100), i);
        }

        let events = recorder.drain();
        for pair in events.windows(2) {
            assert!(pair[1].timestamp_ns >= pair[0].timestamp_ns);
        }
    }

    #[test]
    fn test_full_buffer_drops_newest() {
        let recorder = RingRecorder::with_capacity(2);
        recorder.emit_scalar(EventCode(0x100), 1);
        recorder.emit_scalar(EventCode(0x100), 2);
        recorder.emit_scalar(EventCode(0x100), 3);

        let stats = recorder.stats();
        assert_eq!(stats.recorded, 2);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.pending, 2);

        let values: Vec<_> = recorder.drain().iter().map(|e| e.scalars()[0]).collect();
        assert_eq!(values, vec![1, 2]);
    }

    #[test]
    fn test_stopped_recorder_drops() {
        let recorder = RingRecorder::new(&RecorderConfig {
            start_active: false,
            ..RecorderConfig::default()
        });
        recorder.emit_scalar(EventCode(0x100), 1);
        recorder.emit_string(EventCode(0x101), "x", &[]);
        assert_eq!(recorder.stats().dropped, 2);

        recorder.start();
        recorder.emit_scalar(EventCode(0x100), 1);
        recorder.stop();
        recorder.emit_scalar(EventCode(0x100), 2);

        assert_eq!(recorder.drain().len(), 1);
        assert_eq!(recorder.stats().dropped, 3);
    }

    #[test]
    fn test_string_truncation() {
        let recorder = RingRecorder::new(&RecorderConfig {
            max_string_len: 4,
            ..RecorderConfig::default()
        });
        recorder.emit_string(EventCode(0x102), "home-ap", &[2, 1]);

        let events = recorder.drain();
        assert_eq!(events[0].text(), Some("home"));
        assert_eq!(events[0].scalars(), &[2, 1]);
        assert_eq!(recorder.stats().truncated, 1);
    }

    #[test]
    fn test_truncation_respects_char_boundary() {
        // 'é' is two bytes; cutting at 2 would split it
        assert_eq!(truncate_at_char_boundary("aéb", 2), "a");
        assert_eq!(truncate_at_char_boundary("aéb", 3), "aé");
        assert_eq!(truncate_at_char_boundary("short", 52), "short");
    }

    #[test]
    fn test_extra_scalars_dropped() {
        let recorder = RingRecorder::with_capacity(4);
        recorder.emit_string(EventCode(0x102), "s", &[1, 2, 3, 4, 5, 6]);

        let events = recorder.drain();
        assert_eq!(events[0].scalars(), &[1, 2, 3, 4]);
        assert_eq!(recorder.stats().truncated, 1);
    }

    #[test]
    fn test_dropped_event_not_counted_as_truncated() {
        let recorder = RingRecorder::new(&RecorderConfig {
            capacity: 1,
            max_string_len: 4,
            ..RecorderConfig::default()
        });
        recorder.emit_scalar(EventCode(0x100), 0);
        recorder.emit_string(EventCode(0x102), "home-ap", &[2, 1]);

        let stats = recorder.stats();
        assert_eq!(stats.recorded, 1);
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.truncated, 0);
    }

    #[test]
    fn test_stats_rates() {
        let recorder = RingRecorder::with_capacity(4);
        assert_eq!(recorder.stats().drop_rate(), 0.0);

        for i in 0..8 {
            recorder.emit_scalar(EventCode(0x100), i);
        }
        let stats = recorder.stats();
        assert_eq!(stats.fill_percentage(), 100.0);
        assert_eq!(stats.drop_rate(), 50.0);
    }

    #[test]
    fn test_concurrent_emitters() {
        let recorder = Arc::new(RingRecorder::with_capacity(1000));
        let mut handles = vec![];

        for t in 0..10u32 {
            let r = Arc::clone(&recorder);
            handles.push(thread::spawn(move || {
                for i in 0..100 {
                    r.emit_scalar(EventCode(0x100), t * 100 + i);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let stats = recorder.stats();
        assert_eq!(stats.recorded + stats.dropped, 1000);
        assert_eq!(recorder.drain().len() as u64, stats.recorded);
    }
}
