//! The shared canvas: presence, reset broadcasting and the stroke log behind
//! one handle.
//!
//! Each collaborator has its own lock. Lock order is presence → broadcaster
//! and log → broadcaster; the broadcaster lock is never held while waiting on
//! another one.
//!
//! A reset persists the empty log and bumps the generation while holding the
//! log write lock. A poll reads the generation and the stroke delta while
//! holding the log read lock, so it never sees a cleared log paired with the
//! old generation, or the reverse.

use std::time::{Duration, Instant};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{Mutex, RwLock};

use crate::error::Result;
use crate::log::StrokeLog;
use crate::metrics::{CanvasMetrics, CanvasMetricsSnapshot};
use crate::models::{SessionId, Stroke};
use crate::presence::PresenceTracker;
use crate::reset::ResetBroadcaster;
use crate::storage::StrokeStorage;
use crate::util::{fingerprint, unix_millis_now};

/// Inactivity window after which a session no longer counts as present.
pub const DEFAULT_PRESENCE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of one poll.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollOutcome {
    pub strokes: Vec<Stroke>,
    pub user_count: usize,
    pub reset_flag: bool,
}

/// Outcome of a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetOutcome {
    pub generation: i64,
    pub strokes_removed: usize,
}

pub struct Canvas {
    presence: Mutex<PresenceTracker>,
    broadcaster: Mutex<ResetBroadcaster>,
    log: RwLock<StrokeLog>,
    presence_timeout: Duration,
    metrics: CanvasMetrics,
}

impl Canvas {
    /// Open a canvas over `storage`, loading the persisted log.
    ///
    /// Presence and reset state always start empty.
    pub fn open(storage: Box<dyn StrokeStorage>, presence_timeout: Duration) -> Result<Self> {
        Ok(Self {
            presence: Mutex::new(PresenceTracker::new()),
            broadcaster: Mutex::new(ResetBroadcaster::new()),
            log: RwLock::new(StrokeLog::open(storage)?),
            presence_timeout,
            metrics: CanvasMetrics::default(),
        })
    }

    pub async fn poll(&self, session: Option<&SessionId>, watermark: i64) -> PollOutcome {
        self.poll_at(session, watermark, Instant::now()).await
    }

    /// Poll as of `now`: record presence, evict stale peers, then compute the
    /// reset flag and the stroke delta.
    pub async fn poll_at(
        &self,
        session: Option<&SessionId>,
        watermark: i64,
        now: Instant,
    ) -> PollOutcome {
        let user_count = self.refresh_presence(session, now).await;

        if session.is_none() {
            tracing::debug!("Anonymous poll; caller cannot receive reset notifications");
        }

        let log = self.log.read().await;
        let reset_flag = self.broadcaster.lock().await.consume_reset_flag(session);
        let strokes = log.since(watermark);
        drop(log);

        self.metrics.mark_poll(session.is_none(), reset_flag);
        if reset_flag {
            tracing::debug!(
                session = session.map(|id| fingerprint(id.as_str())),
                "Delivered reset notification"
            );
        }

        PollOutcome {
            strokes,
            user_count,
            reset_flag,
        }
    }

    /// Validate, stamp and append a submitted stroke.
    pub async fn submit(&self, payload: Value) -> Result<Stroke> {
        let stroke = Stroke::from_payload(payload)?;
        let stroke = self.log.write().await.append(stroke, unix_millis_now())?;
        self.metrics.mark_submitted();
        tracing::debug!(timestamp = stroke.timestamp, "Appended stroke");
        Ok(stroke)
    }

    /// Clear the log and start a new reset generation as one unit.
    ///
    /// If the empty log cannot be persisted, neither the log nor the
    /// generation changes.
    pub async fn reset(&self) -> Result<ResetOutcome> {
        let mut log = self.log.write().await;
        let strokes_removed = log.clear()?;
        let generation = self
            .broadcaster
            .lock()
            .await
            .trigger_reset(unix_millis_now());
        drop(log);

        self.metrics.mark_reset();
        tracing::info!(generation, strokes_removed, "Canvas reset");
        Ok(ResetOutcome {
            generation,
            strokes_removed,
        })
    }

    /// Issue a server-side session identity and mark it present.
    pub async fn create_session(&self) -> SessionId {
        let session = SessionId::generate();
        self.refresh_presence(Some(&session), Instant::now()).await;
        session
    }

    pub async fn active_count(&self) -> usize {
        self.presence.lock().await.active_count()
    }

    pub async fn reset_generation(&self) -> i64 {
        self.broadcaster.lock().await.generation()
    }

    pub async fn stroke_count(&self) -> usize {
        self.log.read().await.len()
    }

    pub fn metrics_snapshot(&self) -> CanvasMetricsSnapshot {
        self.metrics.snapshot()
    }

    async fn refresh_presence(&self, session: Option<&SessionId>, now: Instant) -> usize {
        let mut presence = self.presence.lock().await;
        presence.touch(session, now);
        let evicted = presence.evict_stale(now, self.presence_timeout);
        if !evicted.is_empty() {
            self.broadcaster.lock().await.forget(&evicted);
            self.metrics.mark_evicted(evicted.len());
            tracing::debug!(evicted = evicted.len(), "Evicted stale sessions");
        }
        presence.active_count()
    }
}
