//! # ConsumerContext: the consumer's cooperative execution context.
//!
//! Delivery to the consumer never happens on the producer thread. Instead the
//! broker schedules **jobs** onto a [`ConsumerContext`], an unbounded FIFO
//! queue drained by the consumer's own loop. Jobs scheduled earlier run
//! before jobs scheduled later, which is what preserves delivery order for
//! events that race an attach/detach.
//!
//! ## Thread affinity
//! The context records the thread it was created on. Driving it
//! ([`ConsumerContext::run`] / [`ConsumerContext::run_until_idle`]) and the
//! broker's `attach`/`detach` must happen on that same thread; violating this
//! is a programming fault and panics. Scheduling through [`ContextHandle`]
//! is allowed from any thread; that is the producer's path in.
//!
//! ## Diagram
//! ```text
//!  producer thread                 consumer thread
//!  ───────────────                 ───────────────
//!  handle.schedule(job) ──► [ job queue (FIFO) ] ──► run(): job(); job(); ...
//! ```

use std::thread::{self, ThreadId};

use tokio::sync::mpsc;

/// A unit of delivery work executed on the consumer thread.
pub(crate) type Job = Box<dyn FnOnce() + Send + 'static>;

/// The consumer-side half: owns the job queue and executes jobs in order.
///
/// Create it on the consumer thread, hand its [`handle`](ConsumerContext::handle)
/// to the broker, then drive it with [`run`](ConsumerContext::run) (async
/// loop) or [`run_until_idle`](ConsumerContext::run_until_idle) (embed in an
/// existing loop, or pump deterministically in tests).
pub struct ConsumerContext {
    tx: mpsc::UnboundedSender<Job>,
    rx: mpsc::UnboundedReceiver<Job>,
    thread: ThreadId,
}

/// Cloneable scheduling half of a [`ConsumerContext`].
///
/// Safe to use from any thread. Jobs are executed on the consumer thread in
/// the order they were scheduled.
#[derive(Clone)]
pub struct ContextHandle {
    tx: mpsc::UnboundedSender<Job>,
    thread: ThreadId,
}

impl ConsumerContext {
    /// Creates a context bound to the calling thread.
    #[must_use]
    pub fn new() -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            tx,
            rx,
            thread: thread::current().id(),
        }
    }

    /// Returns a scheduling handle for the broker and producer side.
    #[must_use]
    pub fn handle(&self) -> ContextHandle {
        ContextHandle {
            tx: self.tx.clone(),
            thread: self.thread,
        }
    }

    /// Runs jobs as they arrive until every [`ContextHandle`] is dropped.
    ///
    /// Must be awaited on the thread that created the context (e.g. inside a
    /// current-thread runtime owned by the consumer).
    pub async fn run(self) {
        self.assert_consumer_thread();
        let ConsumerContext { tx, mut rx, .. } = self;
        // Drop our own sender so the loop ends when the last handle does.
        drop(tx);
        while let Some(job) = rx.recv().await {
            job();
        }
    }

    /// Executes every job that is already queued, then returns.
    ///
    /// Returns the number of jobs executed. Jobs scheduled *while* draining
    /// (e.g. by a sink callback) are executed in the same pass.
    pub fn run_until_idle(&mut self) -> usize {
        self.assert_consumer_thread();
        let mut ran = 0;
        while let Ok(job) = self.rx.try_recv() {
            job();
            ran += 1;
        }
        ran
    }

    fn assert_consumer_thread(&self) {
        if thread::current().id() != self.thread {
            panic!("consumer context driven from a foreign thread");
        }
    }
}

impl Default for ConsumerContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextHandle {
    /// Enqueues a job for execution on the consumer thread.
    ///
    /// If the context has been dropped the job is lost; that only happens
    /// when the consumer side is already gone, so the loss is reported and
    /// otherwise ignored.
    pub(crate) fn schedule(&self, job: Job) {
        if self.tx.send(job).is_err() {
            eprintln!("[seribus] delivery job dropped: consumer context is gone");
        }
    }

    /// The thread the owning context was created on.
    pub(crate) fn thread_id(&self) -> ThreadId {
        self.thread
    }
}
