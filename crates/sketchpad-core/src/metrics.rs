//! Operator-facing counters for the canvas core.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

#[derive(Default)]
pub(crate) struct CanvasMetrics {
    polls: AtomicU64,
    anonymous_polls: AtomicU64,
    strokes_submitted: AtomicU64,
    resets: AtomicU64,
    reset_flags_delivered: AtomicU64,
    sessions_evicted: AtomicU64,
}

/// Point-in-time copy of the canvas counters.
///
/// `anonymous_polls` counts polls without a session id; those callers can
/// never be told about a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CanvasMetricsSnapshot {
    pub polls: u64,
    pub anonymous_polls: u64,
    pub strokes_submitted: u64,
    pub resets: u64,
    pub reset_flags_delivered: u64,
    pub sessions_evicted: u64,
}

impl CanvasMetrics {
    pub(crate) fn mark_poll(&self, anonymous: bool, reset_flag: bool) {
        self.polls.fetch_add(1, Ordering::Relaxed);
        if anonymous {
            self.anonymous_polls.fetch_add(1, Ordering::Relaxed);
        }
        if reset_flag {
            self.reset_flags_delivered.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn mark_submitted(&self) {
        self.strokes_submitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn mark_reset(&self) {
        self.resets.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn mark_evicted(&self, count: usize) {
        self.sessions_evicted
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> CanvasMetricsSnapshot {
        CanvasMetricsSnapshot {
            polls: self.polls.load(Ordering::Relaxed),
            anonymous_polls: self.anonymous_polls.load(Ordering::Relaxed),
            strokes_submitted: self.strokes_submitted.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            reset_flags_delivered: self.reset_flags_delivered.load(Ordering::Relaxed),
            sessions_evicted: self.sessions_evicted.load(Ordering::Relaxed),
        }
    }
}
