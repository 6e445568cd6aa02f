// Copyright @yucwang 2026

use std::sync::{ Arc, RwLock, RwLockReadGuard, RwLockWriteGuard };

use crate::core::abort::AbortSwitch;
use crate::core::accumulation_buffer::SampleAccumulationBuffer;
use crate::core::job::{ Job, JobQueue };
use crate::core::sample_generator::SampleGenerator;
use crate::core::tile_callback::TileCallback;
use crate::math::bitmap::Bitmap;
use crate::renderers::sample_counter::SampleCounter;

const MIN_PASS_COUNT: usize = 1;
const MIN_SAMPLE_COUNT: usize = 2048;
const MAX_SAMPLE_COUNT: usize = 262_144;
const SAMPLE_INCREMENT: usize = 4096;

/// Samples a lane requests for a given pass, before the shared budget
/// caps the grant. The first `MIN_PASS_COUNT` passes stay at the minimum
/// so a first image appears quickly, later passes grow linearly to
/// amortize per-pass overhead.
pub fn compute_sample_count(pass: usize) -> usize {
    if pass < MIN_PASS_COUNT {
        return MIN_SAMPLE_COUNT;
    }

    MIN_SAMPLE_COUNT
        .saturating_add((pass - MIN_PASS_COUNT + 1).saturating_mul(SAMPLE_INCREMENT))
        .min(MAX_SAMPLE_COUNT)
}

/// One pass of one rendering lane.
///
/// A lane is a chain of these jobs: each execution reserves samples from
/// the shared budget, generates them, and schedules itself again with the
/// pass number bumped. The chain ends when the budget grants nothing or
/// cancellation is observed. Lane 0 additionally develops the shared
/// buffer into the frame after each of its passes.
pub struct SampleGeneratorJob {
    sample_generator: Arc<dyn SampleGenerator>,
    buffer: Arc<SampleAccumulationBuffer>,
    frame: Arc<RwLock<Bitmap>>,
    sample_counter: Arc<SampleCounter>,
    tile_callback: Option<Arc<dyn TileCallback>>,
    job_queue: JobQueue,
    job_index: usize,
    job_count: usize,
    pass: usize,
    abort_switch: AbortSwitch,
}

impl SampleGeneratorJob {
    pub fn new(
        sample_generator: Arc<dyn SampleGenerator>,
        buffer: Arc<SampleAccumulationBuffer>,
        frame: Arc<RwLock<Bitmap>>,
        sample_counter: Arc<SampleCounter>,
        tile_callback: Option<Arc<dyn TileCallback>>,
        job_queue: JobQueue,
        job_index: usize,
        job_count: usize,
        pass: usize,
        abort_switch: AbortSwitch,
    ) -> Self {
        Self {
            sample_generator,
            buffer,
            frame,
            sample_counter,
            tile_callback,
            job_queue,
            job_index,
            job_count,
            pass,
            abort_switch,
        }
    }

    fn read_frame(&self) -> RwLockReadGuard<Bitmap> {
        self.frame.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_frame(&self) -> RwLockWriteGuard<Bitmap> {
        self.frame.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Job for SampleGeneratorJob {
    fn execute(mut self: Box<Self>, _thread_index: usize) {
        let granted = self.sample_counter.reserve(compute_sample_count(self.pass));
        if granted == 0 {
            // Budget exhausted, the lane's chain ends here.
            return;
        }

        if let Some(callback) = &self.tile_callback {
            let frame = self.read_frame();
            callback.pre_render(0, 0, frame.width(), frame.height());
        }

        if self.pass == 0 {
            // The first pass runs to completion even when cancellation is
            // already pending, so an immediately-aborted render still
            // yields a developable image.
            self.sample_generator.generate_samples(
                granted, &self.buffer, &AbortSwitch::new());
        } else {
            self.sample_generator.generate_samples(
                granted, &self.buffer, &self.abort_switch);
        }

        log::debug!(
            "lane {}/{} finished pass {}, {} samples granted",
            self.job_index, self.job_count, self.pass, granted);

        if self.job_index == 0 {
            let mut frame = self.write_frame();
            self.buffer.develop_to(&mut frame);
            if let Some(callback) = &self.tile_callback {
                callback.post_render(&frame);
            }
        }

        if !self.abort_switch.is_aborted() {
            let queue = self.job_queue.clone();
            self.pass += 1;
            queue.schedule(self);
        }
    }
}
