//! The concurrency adapter.
//!
//! [`Dispatcher`] owns (or borrows) the tokio runtime the transport runs
//! on. It provides the two scheduling primitives the pipeline needs: a
//! bounded synchronous wait on one async transport outcome, and submission
//! of a blocking unit of work whose result is delivered to a callback.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::{Builder, Handle, Runtime};

use crate::error::{Error, Result};

/// Outcome of a bounded wait on an asynchronous task.
#[derive(Debug)]
pub enum WaitOutcome<T> {
    /// The task completed within the limit.
    Completed(T),
    /// The limit elapsed first; the task keeps running detached.
    TimedOut,
    /// The task was aborted or panicked before completing.
    Interrupted,
}

#[derive(Debug)]
enum Flavor {
    Owned(Runtime),
    Shared(Handle),
}

/// Runs asynchronous transport work and blocking call bodies.
///
/// One dispatcher is shared by every client produced from the same
/// configuration. The blocking entry points ([`Dispatcher::wait`] and the
/// work closures given to [`Dispatcher::submit`]) must not be called from
/// the runtime's own async context.
#[derive(Debug)]
pub struct Dispatcher {
    flavor: Flavor,
}

impl Dispatcher {
    /// Create a dispatcher owning a fresh multi-threaded runtime.
    pub fn new() -> Result<Self> {
        let runtime = Builder::new_multi_thread()
            .thread_name("talon-dispatch")
            .enable_all()
            .build()
            .map_err(Error::Scheduler)?;
        Ok(Self {
            flavor: Flavor::Owned(runtime),
        })
    }

    /// Create a dispatcher on an existing runtime.
    ///
    /// The runtime must outlive the dispatcher; the dispatcher only keeps
    /// the handle.
    #[must_use]
    pub fn from_handle(handle: Handle) -> Self {
        Self {
            flavor: Flavor::Shared(handle),
        }
    }

    fn handle(&self) -> &Handle {
        match &self.flavor {
            Flavor::Owned(runtime) => runtime.handle(),
            Flavor::Shared(handle) => handle,
        }
    }

    /// Block the calling thread on `future` for at most `limit`.
    ///
    /// The future is spawned on the runtime first, so a timeout leaves it
    /// running detached rather than cancelling it.
    pub fn wait<F>(&self, limit: Duration, future: F) -> WaitOutcome<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        let task = self.handle().spawn(future);
        let handle = self.handle();

        match handle.block_on(async move { tokio::time::timeout(limit, task).await }) {
            Ok(Ok(value)) => WaitOutcome::Completed(value),
            Ok(Err(_join_error)) => WaitOutcome::Interrupted,
            Err(_elapsed) => WaitOutcome::TimedOut,
        }
    }

    /// Run `work` on the blocking pool and hand its result to `on_complete`.
    ///
    /// Completion order across independent submissions follows completion
    /// of the work, not submission order.
    pub fn submit<T, W, C>(&self, work: W, on_complete: C)
    where
        T: Send + 'static,
        W: FnOnce() -> T + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        self.handle().spawn_blocking(move || on_complete(work()));
    }
}
