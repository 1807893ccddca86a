//! Reset epoch broadcasting.
//!
//! Polling cannot push a "canvas cleared" event, so every session compares
//! the global reset generation against the last generation it acknowledged.
//! The first poll that sees a newer generation raises the flag, later polls
//! do not. No per-session event queue is kept.

use std::collections::HashMap;

use crate::models::SessionId;

/// Reset generation value meaning "no reset has ever happened".
pub const NO_RESET: i64 = 0;

/// Global reset generation plus per-session acknowledgments.
#[derive(Debug, Default)]
pub struct ResetBroadcaster {
    generation: i64,
    acknowledged: HashMap<SessionId, i64>,
}

impl ResetBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current reset generation (`NO_RESET` until the first reset)
    pub const fn generation(&self) -> i64 {
        self.generation
    }

    /// Start a new generation stamped at `now_millis`.
    ///
    /// The generation strictly increases per reset, even when the clock
    /// stalls or steps backwards.
    pub fn trigger_reset(&mut self, now_millis: i64) -> i64 {
        self.generation = now_millis.max(self.generation.saturating_add(1));
        self.generation
    }

    /// Returns `true` exactly once per session per generation.
    ///
    /// Anonymous callers can never be notified and always get `false`.
    pub fn consume_reset_flag(&mut self, session: Option<&SessionId>) -> bool {
        let Some(session) = session else {
            return false;
        };
        let current = self.generation;
        let acknowledged = self
            .acknowledged
            .entry(session.clone())
            .or_insert(NO_RESET);
        let raised = current > *acknowledged;
        *acknowledged = current;
        raised
    }

    /// Drop acknowledgments of evicted sessions.
    pub fn forget<'a>(&mut self, sessions: impl IntoIterator<Item = &'a SessionId>) {
        for session in sessions {
            self.acknowledged.remove(session);
        }
    }

    #[cfg(test)]
    fn tracked_sessions(&self) -> usize {
        self.acknowledged.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> SessionId {
        SessionId::parse(Some(raw)).unwrap()
    }

    #[test]
    fn no_flag_before_first_reset() {
        let mut broadcaster = ResetBroadcaster::new();
        assert!(!broadcaster.consume_reset_flag(Some(&id("a"))));
        assert_eq!(broadcaster.generation(), NO_RESET);
    }

    #[test]
    fn flag_is_delivered_exactly_once_per_generation() {
        let mut broadcaster = ResetBroadcaster::new();
        let a = id("a");
        assert!(!broadcaster.consume_reset_flag(Some(&a)));

        broadcaster.trigger_reset(1_000);
        assert!(broadcaster.consume_reset_flag(Some(&a)));
        assert!(!broadcaster.consume_reset_flag(Some(&a)));
        assert!(!broadcaster.consume_reset_flag(Some(&a)));

        broadcaster.trigger_reset(2_000);
        assert!(broadcaster.consume_reset_flag(Some(&a)));
        assert!(!broadcaster.consume_reset_flag(Some(&a)));
    }

    #[test]
    fn each_session_sees_the_reset_independently() {
        let mut broadcaster = ResetBroadcaster::new();
        broadcaster.trigger_reset(1_000);
        assert!(broadcaster.consume_reset_flag(Some(&id("a"))));
        assert!(broadcaster.consume_reset_flag(Some(&id("b"))));
        assert!(!broadcaster.consume_reset_flag(Some(&id("a"))));
    }

    #[test]
    fn anonymous_callers_are_never_notified() {
        let mut broadcaster = ResetBroadcaster::new();
        broadcaster.trigger_reset(1_000);
        assert!(!broadcaster.consume_reset_flag(None));
        assert_eq!(broadcaster.tracked_sessions(), 0);
    }

    #[test]
    fn generation_strictly_increases_when_clock_stalls() {
        let mut broadcaster = ResetBroadcaster::new();
        let first = broadcaster.trigger_reset(5_000);
        let second = broadcaster.trigger_reset(5_000);
        let third = broadcaster.trigger_reset(4_000);
        assert!(first < second && second < third);
    }

    #[test]
    fn forgotten_session_sees_current_generation_as_new() {
        let mut broadcaster = ResetBroadcaster::new();
        let a = id("a");
        broadcaster.trigger_reset(1_000);
        assert!(broadcaster.consume_reset_flag(Some(&a)));

        broadcaster.forget([&a]);
        assert_eq!(broadcaster.tracked_sessions(), 0);
        assert!(broadcaster.consume_reset_flag(Some(&a)));
    }
}
