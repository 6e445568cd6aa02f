// Copyright @yucwang 2026

use std::sync::atomic::{ AtomicUsize, Ordering };

/// Shared budget of samples left to draw for one render session.
///
/// The count only ever decreases. `reserve` grants each caller a slice
/// atomically, so concurrent lanes can never overdraw the budget between
/// the check and the decrement.
pub struct SampleCounter {
    remaining: AtomicUsize,
}

impl SampleCounter {
    pub fn new(sample_budget: usize) -> Self {
        Self {
            remaining: AtomicUsize::new(sample_budget),
        }
    }

    /// Claim up to `requested` samples. Returns the number actually
    /// granted, which is zero once the budget is exhausted.
    pub fn reserve(&self, requested: usize) -> usize {
        let previous = self.remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |remaining| {
                Some(remaining - requested.min(remaining))
            })
            .unwrap_or_else(|value| value);
        previous.min(requested)
    }

    pub fn read(&self) -> usize {
        self.remaining.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicUsize;

    #[test]
    fn test_reserve_caps_at_remaining() {
        let counter = SampleCounter::new(100);
        assert_eq!(counter.reserve(60), 60);
        assert_eq!(counter.read(), 40);
        assert_eq!(counter.reserve(60), 40);
        assert_eq!(counter.read(), 0);
        assert_eq!(counter.reserve(60), 0);
    }

    #[test]
    fn test_zero_budget() {
        let counter = SampleCounter::new(0);
        assert_eq!(counter.reserve(1), 0);
        assert_eq!(counter.read(), 0);
    }

    #[test]
    fn test_concurrent_reservations_sum_to_budget() {
        let counter = Arc::new(SampleCounter::new(100_000));
        let granted_total = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for t in 0..8 {
            let counter = Arc::clone(&counter);
            let granted_total = Arc::clone(&granted_total);
            handles.push(std::thread::spawn(move || {
                let chunk = 17 + t * 13;
                loop {
                    let granted = counter.reserve(chunk);
                    if granted == 0 {
                        break;
                    }
                    assert!(granted <= chunk);
                    granted_total.fetch_add(granted, Ordering::Relaxed);
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(granted_total.load(Ordering::Relaxed), 100_000);
        assert_eq!(counter.read(), 0);
    }
}
