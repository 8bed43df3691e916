//! The work-stealing job queue.
//!
//! One [`JobQueue`] is shared by every worker thread spawned for a single
//! top-level sort call. Jobs are handed out through a global injector plus
//! one deque per worker; a worker drains its own deque first, then the
//! injector, then tries to steal from a sibling before reporting itself
//! idle. The idle count is what the work-sharing policy in the sample-sort
//! and MKQS stacks watches: as long as nobody is idle there is no reason to
//! fragment a worker's own recursion into smaller jobs.

use crossbeam_deque::{Injector, Steal, Stealer, Worker};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A job is just a thunk; the sample-sort step and small-sort modules are
/// the only producers, closing over whatever `ShadowBundle`/range/depth
/// state the job needs. The lifetime lets jobs borrow from the root
/// `thread::scope` call (the input buffers, the provider) instead of
/// needing `Arc`s everywhere.
pub(crate) type Job<'a> = Box<dyn FnOnce(&JobQueue<'a>) + Send + 'a>;

/// Shared scheduling state for one sort call's worker pool.
pub(crate) struct JobQueue<'a> {
    injector: Injector<Job<'a>>,
    stealers: Vec<Stealer<Job<'a>>>,
    idle: AtomicUsize,
    worker_count: usize,
}

impl<'a> JobQueue<'a> {
    /// Builds the shared state for `worker_count` workers. Each worker's
    /// own [`Worker`] deque is created separately because
    /// `crossbeam_deque::Worker` is not `Sync` — only its `Stealer` handle
    /// is meant to be shared.
    pub(crate) fn new(worker_count: usize) -> (JobQueue<'a>, Vec<Worker<Job<'a>>>) {
        let deques: Vec<Worker<Job>> = (0..worker_count).map(|_| Worker::new_fifo()).collect();
        let stealers = deques.iter().map(|d| d.stealer()).collect();
        (
            JobQueue {
                injector: Injector::new(),
                stealers,
                idle: AtomicUsize::new(0),
                worker_count,
            },
            deques,
        )
    }

    /// Pushes a job onto the shared injector, for any worker to pick up.
    pub(crate) fn push(&self, job: Job<'a>) {
        self.injector.push(job);
    }

    /// `true` if at least one worker is currently idle (i.e. would have
    /// nothing to do if no new job showed up). A busy worker consults this
    /// before deciding whether to publish part of its own recursion as a
    /// job rather than keep it to itself.
    pub(crate) fn has_idle(&self) -> bool {
        self.idle.load(Ordering::Relaxed) > 0
    }

    pub(crate) fn worker_count(&self) -> usize {
        self.worker_count
    }

    /// One worker's run loop: drain `local`, then the injector, then try
    /// stealing from siblings (in a fair, rotating order), reporting idle
    /// in between attempts. Returns once every worker has been idle at the
    /// same time with nothing left anywhere (i.e. the whole pool agrees
    /// there is no more work).
    pub(crate) fn run_worker(&self, worker_index: usize, local: &Worker<Job<'a>>) {
        loop {
            if let Some(job) = local.pop() {
                job(self);
                continue;
            }
            match self.steal_round(worker_index, local) {
                Some(job) => {
                    job(self);
                }
                None => {
                    self.idle.fetch_add(1, Ordering::SeqCst);
                    if self.all_idle_and_empty(local) {
                        self.idle.fetch_sub(1, Ordering::SeqCst);
                        log::trace!("worker {worker_index} exiting: pool idle and empty");
                        return;
                    }
                    self.idle.fetch_sub(1, Ordering::SeqCst);
                    std::thread::yield_now();
                }
            }
        }
    }

    fn steal_round(&self, worker_index: usize, local: &Worker<Job<'a>>) -> Option<Job<'a>> {
        loop {
            match self.injector.steal_batch_and_pop(local) {
                Steal::Success(job) => return Some(job),
                Steal::Retry => continue,
                Steal::Empty => break,
            }
        }
        // Reverse order of siblings, starting just to our left, then just
        // to our right, so two neighbors don't both camp on the same
        // victim.
        let n = self.stealers.len();
        for step in 1..n {
            let left = (worker_index + n - step) % n;
            loop {
                match self.stealers[left].steal() {
                    Steal::Success(job) => return Some(job),
                    Steal::Retry => continue,
                    Steal::Empty => break,
                }
            }
        }
        None
    }

    fn all_idle_and_empty(&self, local: &Worker<Job<'a>>) -> bool {
        self.idle.load(Ordering::SeqCst) == self.worker_count
            && local.is_empty()
            && self.injector.is_empty()
            && self.stealers.iter().all(|s| s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;
    use std::sync::Arc;

    #[test]
    fn all_pushed_jobs_run_exactly_once() {
        let (queue, deques) = JobQueue::new(4);
        let counter = Arc::new(AtomicU32::new(0));
        for _ in 0..200 {
            let counter = counter.clone();
            queue.push(Box::new(move |_q: &JobQueue<'_>| {
                counter.fetch_add(1, Ordering::SeqCst);
            }));
        }
        std::thread::scope(|scope| {
            for (i, deque) in deques.iter().enumerate() {
                let queue = &queue;
                scope.spawn(move || queue.run_worker(i, deque));
            }
        });
        assert_eq!(counter.load(Ordering::SeqCst), 200);
    }

    #[test]
    fn jobs_can_push_more_jobs() {
        let (queue, deques) = JobQueue::new(2);
        let counter = Arc::new(AtomicU32::new(0));
        {
            let counter = counter.clone();
            queue.push(Box::new(move |q: &JobQueue<'_>| {
                counter.fetch_add(1, Ordering::SeqCst);
                let counter = counter.clone();
                q.push(Box::new(move |_q: &JobQueue<'_>| {
                    counter.fetch_add(1, Ordering::SeqCst);
                }));
            }));
        }
        std::thread::scope(|scope| {
            for (i, deque) in deques.iter().enumerate() {
                let queue = &queue;
                scope.spawn(move || queue.run_worker(i, deque));
            }
        });
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }
}
