// Copyright @yucwang 2026

use std::any::Any;
use std::collections::VecDeque;
use std::panic::{ self, AssertUnwindSafe };
use std::sync::{ Arc, Condvar, Mutex, MutexGuard };
use std::thread::{ self, JoinHandle };

/// A unit of work owned by the queue until a worker runs it.
///
/// Execution consumes the job. A job may schedule follow-up work on the
/// same queue before returning, which keeps the queue busy with no idle
/// gap in between.
pub trait Job: Send {
    fn execute(self: Box<Self>, thread_index: usize);
}

struct QueueState {
    jobs: VecDeque<Box<dyn Job>>,
    // Queued plus currently running jobs.
    pending: usize,
    stopping: bool,
}

struct QueueInner {
    state: Mutex<QueueState>,
    work_ready: Condvar,
    all_done: Condvar,
}

/// Handle to a shared FIFO job queue. Clones refer to the same queue.
#[derive(Clone)]
pub struct JobQueue {
    inner: Arc<QueueInner>,
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl JobQueue {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(QueueInner {
                state: Mutex::new(QueueState {
                    jobs: VecDeque::new(),
                    pending: 0,
                    stopping: false,
                }),
                work_ready: Condvar::new(),
                all_done: Condvar::new(),
            }),
        }
    }

    fn lock_state(&self) -> MutexGuard<QueueState> {
        self.inner.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn schedule(&self, job: Box<dyn Job>) {
        let mut state = self.lock_state();
        if state.stopping {
            log::warn!("job scheduled on a stopped queue, dropping it");
            return;
        }
        state.pending += 1;
        state.jobs.push_back(job);
        self.inner.work_ready.notify_one();
    }

    /// Number of jobs queued or running.
    pub fn pending(&self) -> usize {
        self.lock_state().pending
    }

    /// Block until every queued and running job, including follow-up
    /// jobs scheduled along the way, has finished.
    pub fn wait_until_completion(&self) {
        let mut state = self.lock_state();
        while state.pending > 0 {
            state = self.inner.all_done.wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    fn next_job(&self) -> Option<Box<dyn Job>> {
        let mut state = self.lock_state();
        loop {
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }
            if state.stopping {
                return None;
            }
            state = self.inner.work_ready.wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    fn finish_job(&self) {
        let mut state = self.lock_state();
        state.pending -= 1;
        if state.pending == 0 {
            self.inner.all_done.notify_all();
        }
    }

    fn stop(&self) {
        let mut state = self.lock_state();
        state.stopping = true;
        self.inner.work_ready.notify_all();
    }
}

fn describe_panic(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "opaque panic payload"
    }
}

fn worker_loop(queue: JobQueue, thread_index: usize) {
    while let Some(job) = queue.next_job() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| job.execute(thread_index)));
        if let Err(payload) = outcome {
            log::error!(
                "job panicked on worker thread {}: {}",
                thread_index, describe_panic(payload.as_ref()));
        }
        queue.finish_job();
    }
}

/// A fixed set of worker threads draining one job queue.
///
/// A job that panics is logged and counted as finished; the worker that
/// ran it keeps serving the queue.
pub struct WorkerPool {
    queue: JobQueue,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn spawn(queue: &JobQueue, thread_count: usize) -> Self {
        let thread_count = thread_count.max(1);
        let workers = (0..thread_count)
            .map(|thread_index| {
                let queue = queue.clone();
                thread::spawn(move || worker_loop(queue, thread_index))
            })
            .collect();
        Self { queue: queue.clone(), workers }
    }

    pub fn thread_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop accepting new work, let the workers drain what is already
    /// queued, and join them.
    pub fn stop(mut self) {
        self.shut_down();
    }

    fn shut_down(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.queue.stop();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                log::error!("worker thread terminated abnormally");
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shut_down();
    }
}
