//! Namespace identifier allocation.

use std::sync::atomic::{AtomicU64, Ordering};

/// Prefix reserved for generated namespace identifiers. User identifiers
/// carrying this prefix are never rewritten.
pub const NAMESPACE_PREFIX: &str = "_injectedNS";

static SEQ: AtomicU64 = AtomicU64::new(1);

/// Allocate the next namespace identifier.
///
/// The counter is process-wide and monotonic: ids are never reused or
/// reset, so two injection sites can never collide, including sites in
/// different files or on different worker threads of one process run.
pub(crate) fn next_namespace() -> String {
    let seq = SEQ.fetch_add(1, Ordering::Relaxed);
    format!("{NAMESPACE_PREFIX}{seq}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq_of(namespace: &str) -> u64 {
        namespace[NAMESPACE_PREFIX.len()..].parse().unwrap()
    }

    #[test]
    fn namespaces_carry_prefix() {
        assert!(next_namespace().starts_with(NAMESPACE_PREFIX));
    }

    #[test]
    fn namespaces_are_distinct_and_increasing() {
        let first = next_namespace();
        let second = next_namespace();
        assert_ne!(first, second);
        assert!(seq_of(&second) > seq_of(&first));
    }
}
