// Copyright @yucwang 2026

use crate::math::constants::{ Float, Vector2f };

pub struct LcgRng {
    state: u64,
}

impl LcgRng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }

    pub fn next_f32(&mut self) -> Float {
        (self.next_u32() as Float) / (u32::MAX as Float)
    }
}

/// A deterministic stream of sampling decisions.
///
/// A context is shaped by `split` into draws of a declared dimension and
/// count before any values are taken, and each nested split derives a
/// decorrelated child stream from the parent. Two contexts built from the
/// same seed with the same split sequence replay the same values, which
/// keeps renders reproducible at fixed seed no matter how work is
/// scheduled across threads.
pub struct SamplingContext {
    rng: LcgRng,
    dimension: u32,
    sample_count: u32,
    taken: u32,
}

impl SamplingContext {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: LcgRng::new(seed),
            dimension: 0,
            sample_count: 0,
            taken: 0,
        }
    }

    /// Derive a child stream shaped as `sample_count` draws of
    /// `dimension` values each. Advances the parent stream, so repeated
    /// splits from one parent never alias.
    pub fn split(&mut self, dimension: u32, sample_count: u32) -> SamplingContext {
        let hi = self.rng.next_u32() as u64;
        let lo = self.rng.next_u32() as u64;
        let shape = ((dimension as u64) << 32) | sample_count as u64;
        let seed = ((hi << 32) | lo) ^ shape.wrapping_mul(0x9e37_79b9_7f4a_7c15);
        SamplingContext {
            rng: LcgRng::new(seed),
            dimension,
            sample_count,
            taken: 0,
        }
    }

    /// `split`, but the child replaces this context in place.
    pub fn split_in_place(&mut self, dimension: u32, sample_count: u32) {
        *self = self.split(dimension, sample_count);
    }

    pub fn next_f32(&mut self) -> Float {
        debug_assert!(self.dimension == 1, "stream shaped for dimension {}", self.dimension);
        self.take_one();
        self.rng.next_f32()
    }

    pub fn next_vector2(&mut self) -> Vector2f {
        debug_assert!(self.dimension == 2, "stream shaped for dimension {}", self.dimension);
        self.take_one();
        let x = self.rng.next_f32();
        let y = self.rng.next_f32();
        Vector2f::new(x, y)
    }

    fn take_one(&mut self) {
        debug_assert!(self.taken < self.sample_count, "stream shaped for {} draws", self.sample_count);
        self.taken += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lcg_is_deterministic() {
        let mut a = LcgRng::new(42);
        let mut b = LcgRng::new(42);
        for _ in 0..16 {
            assert_eq!(a.next_u32(), b.next_u32());
        }
    }

    #[test]
    fn test_lcg_seeds_diverge() {
        let mut a = LcgRng::new(0);
        let mut b = LcgRng::new(1);
        assert_ne!(a.next_u32(), b.next_u32());
    }

    #[test]
    fn test_lcg_f32_range() {
        let mut rng = LcgRng::new(7);
        for _ in 0..256 {
            let v = rng.next_f32();
            assert!(v >= 0.0 && v <= 1.0);
        }
    }

    #[test]
    fn test_context_replays_at_fixed_seed() {
        let mut a = SamplingContext::new(1234);
        let mut b = SamplingContext::new(1234);

        let mut child_a = a.split(2, 4);
        let mut child_b = b.split(2, 4);
        for _ in 0..4 {
            assert_eq!(child_a.next_vector2(), child_b.next_vector2());
        }
    }

    #[test]
    fn test_sibling_splits_decorrelate() {
        let mut parent = SamplingContext::new(99);
        let mut first = parent.split(2, 1);
        let mut second = parent.split(2, 1);
        assert_ne!(first.next_vector2(), second.next_vector2());
    }

    #[test]
    fn test_split_in_place_matches_split() {
        let mut a = SamplingContext::new(5);
        let mut b = SamplingContext::new(5);

        let mut child = a.split(2, 2);
        b.split_in_place(2, 2);

        assert_eq!(child.next_vector2(), b.next_vector2());
    }
}
