//! Rate-limited FIFO task queue for outbound market data requests.
//!
//! Every task submitted to a [`RequestQueue`] runs on a single background
//! drain loop, one at a time and in submission order. After a task settles
//! the loop sleeps for the configured delay before it starts the next one,
//! so a provider never sees more than one request per delay window no matter
//! how many callers share the queue.

use std::collections::VecDeque;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use std::task::{Context, Poll};
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use log::{debug, warn};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::oneshot;

/// Default pause between the completion of one task and the start of the next.
pub const DEFAULT_REQUEST_DELAY: Duration = Duration::from_millis(200);

/// Failures that originate in the queue itself rather than in a task.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueueError {
    /// The task panicked while running. Later tasks are unaffected.
    #[error("Queued task panicked")]
    TaskPanicked,

    /// The task was dropped without producing a result.
    #[error("Queued task was dropped before completing")]
    Dropped,
}

/// Drain state of the queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum QueueState {
    /// No drain loop is running.
    Idle,
    /// A drain loop is popping and awaiting tasks.
    Draining,
}

/// Queue configuration.
#[derive(Clone, Debug)]
pub struct QueueConfig {
    /// Minimum delay between the end of one task and the start of the next.
    pub request_delay: Duration,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            request_delay: DEFAULT_REQUEST_DELAY,
        }
    }
}

/// A type-erased queued task.
///
/// Calling it yields `None` when the submitter has dropped its ticket, in
/// which case the task is skipped without consuming a delay window.
type Job = Box<dyn FnOnce() -> Option<BoxFuture<'static, ()>> + Send>;

struct Inner {
    jobs: VecDeque<Job>,
    state: QueueState,
}

/// Shared, cloneable handle to a rate-limited FIFO queue.
///
/// Clones share the same underlying queue and rate budget. The queue has no
/// global instance: construct one per process (or per test) and inject it.
#[derive(Clone)]
pub struct RequestQueue {
    inner: Arc<Mutex<Inner>>,
    delay: Duration,
}

impl RequestQueue {
    /// Create a queue with the default 200ms delay.
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    /// Create a queue with a custom configuration.
    pub fn with_config(config: QueueConfig) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                jobs: VecDeque::new(),
                state: QueueState::Idle,
            })),
            delay: config.request_delay,
        }
    }

    /// Lock the queue state, recovering from poison if necessary.
    ///
    /// Tasks never run while the lock is held, so a poisoned lock can only
    /// come from a panic between two plain field updates.
    fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
        inner.lock().unwrap_or_else(|poisoned| {
            warn!("Request queue mutex was poisoned, recovering");
            poisoned.into_inner()
        })
    }

    /// Place a task at the back of the queue and return a ticket for its result.
    ///
    /// The task is queued before this method returns, so the order of
    /// `submit` calls is the execution order. Must be called from within a
    /// Tokio runtime: the first submit after the queue went idle spawns the
    /// drain loop.
    pub fn submit<F, Fut, T>(&self, task: F) -> QueueTicket<T>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let job: Job = Box::new(move || {
            if tx.is_closed() {
                return None;
            }
            Some(
                async move {
                    let outcome = AssertUnwindSafe(async move { task().await })
                        .catch_unwind()
                        .await
                        .map_err(|_| QueueError::TaskPanicked);
                    if outcome.is_err() {
                        warn!("Queued task panicked, continuing with the next task");
                    }
                    // The submitter may have gone away while the task ran.
                    let _ = tx.send(outcome);
                }
                .boxed(),
            )
        });

        let start_drain = {
            let mut inner = Self::lock(&self.inner);
            inner.jobs.push_back(job);
            if inner.state == QueueState::Idle {
                inner.state = QueueState::Draining;
                true
            } else {
                false
            }
        };

        if start_drain {
            debug!("Request queue: starting drain loop");
            tokio::spawn(drain(Arc::clone(&self.inner), self.delay));
        }

        QueueTicket { rx }
    }

    /// Submit a task and wait for its result.
    pub async fn enqueue<F, Fut, T>(&self, task: F) -> Result<T, QueueError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        self.submit(task).await
    }

    /// Current drain state.
    pub fn state(&self) -> QueueState {
        Self::lock(&self.inner).state
    }

    /// Number of tasks waiting to start.
    pub fn pending(&self) -> usize {
        Self::lock(&self.inner).jobs.len()
    }

    /// Configured delay between tasks.
    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RequestQueue {
    fn default() -> Self {
        Self::new()
    }
}

async fn drain(inner: Arc<Mutex<Inner>>, delay: Duration) {
    loop {
        let job = {
            let mut guard = RequestQueue::lock(&inner);
            match guard.jobs.pop_front() {
                Some(job) => job,
                None => {
                    guard.state = QueueState::Idle;
                    debug!("Request queue: drained, going idle");
                    return;
                }
            }
        };

        match job() {
            Some(task) => {
                task.await;
                tokio::time::sleep(delay).await;
            }
            None => debug!("Request queue: skipping abandoned task"),
        }
    }
}

/// Pending result of a queued task.
///
/// Dropping the ticket before the task starts removes the task from the
/// rate budget: the drain loop skips it.
#[must_use = "dropping a ticket abandons the queued task"]
pub struct QueueTicket<T> {
    rx: oneshot::Receiver<Result<T, QueueError>>,
}

impl<T> Future for QueueTicket<T> {
    type Output = Result<T, QueueError>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(QueueError::Dropped)))
    }
}
