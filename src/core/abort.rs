// Copyright @yucwang 2026

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cooperative cancellation token shared between a render driver and its
/// workers. Once set, a switch stays set for its whole lifetime.
///
/// Clones share the underlying flag, so any holder may request
/// cancellation and every other holder observes it.
#[derive(Clone, Debug, Default)]
pub struct AbortSwitch {
    aborted: Arc<AtomicBool>,
}

impl AbortSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.aborted.store(true, Ordering::Relaxed);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_clear() {
        let switch = AbortSwitch::new();
        assert!(!switch.is_aborted());
    }

    #[test]
    fn test_abort_is_sticky() {
        let switch = AbortSwitch::new();
        switch.abort();
        assert!(switch.is_aborted());
        switch.abort();
        assert!(switch.is_aborted());
    }

    #[test]
    fn test_clones_share_state() {
        let switch = AbortSwitch::new();
        let other = switch.clone();
        other.abort();
        assert!(switch.is_aborted());
    }
}
