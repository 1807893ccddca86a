//! Presence tracking for polling clients.
//!
//! There is no persistent connection to drive background expiry, so stale
//! sessions are evicted lazily on every poll.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::models::SessionId;

/// Set of currently active sessions keyed by last poll time.
#[derive(Debug, Default)]
pub struct PresenceTracker {
    sessions: HashMap<SessionId, Instant>,
}

impl PresenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a poll from `session`. Anonymous polls do not count.
    pub fn touch(&mut self, session: Option<&SessionId>, now: Instant) {
        if let Some(session) = session {
            self.sessions.insert(session.clone(), now);
        }
    }

    /// Remove every session silent for longer than `timeout`.
    ///
    /// Returns the evicted ids so that per-session state held elsewhere can
    /// be dropped with them.
    pub fn evict_stale(&mut self, now: Instant, timeout: Duration) -> Vec<SessionId> {
        let mut evicted = Vec::new();
        self.sessions.retain(|session, last_seen| {
            let keep = now.saturating_duration_since(*last_seen) <= timeout;
            if !keep {
                evicted.push(session.clone());
            }
            keep
        });
        evicted
    }

    pub fn active_count(&self) -> usize {
        self.sessions.len()
    }

    #[cfg(test)]
    fn is_active(&self, session: &SessionId) -> bool {
        self.sessions.contains_key(session)
    }
}
