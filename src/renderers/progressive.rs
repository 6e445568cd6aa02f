// Copyright @yucwang 2026

use std::sync::{ Arc, RwLock };
use std::thread;

use crate::core::abort::AbortSwitch;
use crate::core::accumulation_buffer::SampleAccumulationBuffer;
use crate::core::computation_node::{ generate_node_id, ComputationNode };
use crate::core::job::{ JobQueue, WorkerPool };
use crate::core::sample_generator::SampleGenerator;
use crate::core::tile_callback::TileCallback;
use crate::math::bitmap::Bitmap;
use crate::renderers::sample_counter::SampleCounter;
use crate::renderers::sample_generator_job::SampleGeneratorJob;

pub use super::renderer::Renderer;

#[derive(Debug, Clone, Copy)]
pub struct ProgressiveRenderParams {
    pub width: usize,
    pub height: usize,
    pub sample_budget: usize,
    /// Number of concurrent lanes refining the frame.
    pub job_count: usize,
    pub thread_count: usize,
}

impl Default for ProgressiveRenderParams {
    fn default() -> Self {
        let thread_count = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            width: 512,
            height: 512,
            sample_budget: 4_000_000,
            job_count: thread_count,
            thread_count,
        }
    }
}

/// Renders one budget's worth of samples by racing `job_count` lanes of
/// self-rescheduling pass jobs against a shared sample counter.
///
/// A renderer drives a single budget session: once `render` has drained
/// the counter, a fresh renderer is needed for another session.
pub struct ProgressiveRenderer {
    id: String,
    sample_generator: Arc<dyn SampleGenerator>,
    tile_callback: Option<Arc<dyn TileCallback>>,
    params: ProgressiveRenderParams,
    sample_counter: Arc<SampleCounter>,
    buffer: Arc<SampleAccumulationBuffer>,
    abort_switch: AbortSwitch,
}

impl ComputationNode for ProgressiveRenderer {
    fn id(&self) -> &str {
        &self.id
    }

    fn to_string(&self) -> String {
        format!("ProgressiveRenderer [id={}]", self.id)
    }
}

impl Renderer for ProgressiveRenderer {
    fn render(&self) -> Bitmap {
        let params = &self.params;
        let job_count = params.job_count.max(1);
        log::info!(
            "starting progressive render: {}x{}, budget of {} samples, {} lanes on {} threads",
            params.width, params.height, params.sample_budget,
            job_count, params.thread_count.max(1));

        let frame = Arc::new(RwLock::new(Bitmap::new(params.width, params.height)));
        let queue = JobQueue::new();
        let pool = WorkerPool::spawn(&queue, params.thread_count);

        for job_index in 0..job_count {
            queue.schedule(Box::new(SampleGeneratorJob::new(
                Arc::clone(&self.sample_generator),
                Arc::clone(&self.buffer),
                Arc::clone(&frame),
                Arc::clone(&self.sample_counter),
                self.tile_callback.clone(),
                queue.clone(),
                job_index,
                job_count,
                0,
                self.abort_switch.clone(),
            )));
        }

        queue.wait_until_completion();
        pool.stop();

        {
            let mut frame = frame.write().unwrap_or_else(|poisoned| poisoned.into_inner());
            self.buffer.develop_to(&mut frame);
        }
        if let Some(callback) = &self.tile_callback {
            let frame = frame.read().unwrap_or_else(|poisoned| poisoned.into_inner());
            callback.post_render(&frame);
        }

        let consumed = params.sample_budget - self.sample_counter.read();
        if self.abort_switch.is_aborted() {
            log::info!("progressive render aborted after {} samples", consumed);
        } else {
            log::info!("progressive render finished, {} samples consumed", consumed);
        }

        match Arc::try_unwrap(frame) {
            Ok(lock) => lock.into_inner().unwrap_or_else(|poisoned| poisoned.into_inner()),
            Err(frame) => frame.read().unwrap_or_else(|poisoned| poisoned.into_inner()).clone(),
        }
    }
}

impl ProgressiveRenderer {
    pub fn new(sample_generator: Arc<dyn SampleGenerator>,
               params: ProgressiveRenderParams) -> Self {
        Self {
            id: generate_node_id("ProgressiveRenderer"),
            sample_generator,
            tile_callback: None,
            sample_counter: Arc::new(SampleCounter::new(params.sample_budget)),
            buffer: Arc::new(SampleAccumulationBuffer::new(params.width, params.height)),
            abort_switch: AbortSwitch::new(),
            params,
        }
    }

    pub fn set_tile_callback(&mut self, tile_callback: Arc<dyn TileCallback>) {
        self.tile_callback = Some(tile_callback);
    }

    /// Handle for requesting cancellation from another thread.
    pub fn abort_switch(&self) -> &AbortSwitch {
        &self.abort_switch
    }

    /// The session's budget counter, for progress reporting.
    pub fn sample_counter(&self) -> Arc<SampleCounter> {
        Arc::clone(&self.sample_counter)
    }
}
