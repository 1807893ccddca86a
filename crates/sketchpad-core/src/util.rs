//! Shared utility functions used across multiple modules.

use std::hash::{Hash, Hasher};

/// Current Unix timestamp in milliseconds.
pub fn unix_millis_now() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Stable-per-process fingerprint for logging identifiers without
/// writing them out verbatim.
pub fn fingerprint(value: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_millis_now_is_after_2020() {
        assert!(unix_millis_now() > 1_577_836_800_000);
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint("tab-1"), fingerprint("tab-1"));
        assert_ne!(fingerprint("tab-1"), fingerprint("tab-2"));
    }
}
