// Copyright @yucwang 2026

use crate::core::abort::AbortSwitch;
use crate::core::accumulation_buffer::SampleAccumulationBuffer;

/// Produces image samples and deposits them into an accumulation buffer.
///
/// Implementations are shared between lanes and must be safe to call
/// concurrently. A generator polls `abort_switch` at its own granularity
/// and may return early with fewer than `sample_count` samples deposited.
pub trait SampleGenerator: Send + Sync {
    fn generate_samples(
        &self,
        sample_count: usize,
        buffer: &SampleAccumulationBuffer,
        abort_switch: &AbortSwitch,
    );
}
