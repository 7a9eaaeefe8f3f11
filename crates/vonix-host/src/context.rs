//! Main context actor: an isolated Tokio task that owns the host's state.
//!
//! This plays the role of a game server's main thread. All mutation of
//! shared state happens inside the actor, one job at a time, in the order
//! jobs were queued. Other tasks never see the state directly; they send
//! closures through an mpsc channel and the actor runs them.

use std::panic::{self, AssertUnwindSafe};

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::HostError;

/// A unit of work to run against the main-context state.
type Job<S> = Box<dyn FnOnce(&mut S) + Send + 'static>;

/// Commands sent to the main context through its channel.
enum ContextCommand<S> {
    /// Run a job against the state.
    Run(Job<S>),

    /// Stop after the jobs already queued ahead of this one.
    Shutdown,
}

/// Handle to a running main context. Used to queue jobs onto it.
///
/// This is cheap to clone: it's just an `mpsc::UnboundedSender` wrapper.
/// The channel is unbounded so jobs can be queued from synchronous code
/// (including from inside another job) without awaiting.
pub struct MainHandle<S> {
    sender: mpsc::UnboundedSender<ContextCommand<S>>,
}

// Manual impl: `#[derive(Clone)]` would require `S: Clone`.
impl<S> Clone for MainHandle<S> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<S: Send + 'static> MainHandle<S> {
    /// Queues `job` to run on the main context (fire-and-forget).
    ///
    /// # Errors
    /// [`HostError::Unavailable`] if the context has shut down.
    pub fn run<F>(&self, job: F) -> Result<(), HostError>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.sender
            .send(ContextCommand::Run(Box::new(job)))
            .map_err(|_| HostError::Unavailable)
    }

    /// Runs `job` on the main context and waits for its return value.
    ///
    /// # Errors
    /// - [`HostError::Unavailable`]: the context has shut down
    /// - [`HostError::ReplyDropped`]: the job panicked or was discarded
    pub async fn call<F, R>(&self, job: F) -> Result<R, HostError>
    where
        F: FnOnce(&mut S) -> R + Send + 'static,
        R: Send + 'static,
    {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.run(move |state| {
            let _ = reply_tx.send(job(state));
        })?;
        reply_rx.await.map_err(|_| HostError::ReplyDropped)
    }

    /// Asks the context to stop once everything queued so far has run.
    ///
    /// # Errors
    /// [`HostError::Unavailable`] if it has already stopped.
    pub fn shutdown(&self) -> Result<(), HostError> {
        self.sender
            .send(ContextCommand::Shutdown)
            .map_err(|_| HostError::Unavailable)
    }

    /// `true` once the context has stopped accepting jobs.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The actor side: owns the state and drains the job queue.
struct MainActor<S> {
    state: S,
    receiver: mpsc::UnboundedReceiver<ContextCommand<S>>,
    jobs_run: u64,
}

impl<S: Send + 'static> MainActor<S> {
    /// Runs jobs until shutdown (or until every handle is dropped), then
    /// hands the state back.
    async fn run(mut self) -> S {
        tracing::debug!("main context started");

        while let Some(cmd) = self.receiver.recv().await {
            match cmd {
                ContextCommand::Run(job) => {
                    self.jobs_run += 1;
                    // A panicking job must not take the main context down
                    // with it; every other player still needs it.
                    let state = &mut self.state;
                    if panic::catch_unwind(AssertUnwindSafe(|| job(state))).is_err() {
                        tracing::error!(job = self.jobs_run, "main context job panicked");
                    }
                }
                ContextCommand::Shutdown => {
                    tracing::info!(jobs_run = self.jobs_run, "main context shutting down");
                    break;
                }
            }
        }

        // Anything still queued after a shutdown is dropped unrun.
        self.receiver.close();
        let mut dropped = 0u64;
        while self.receiver.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            tracing::warn!(dropped, "main context stopped with jobs still queued");
        }

        tracing::debug!("main context stopped");
        self.state
    }
}

/// Entry point for starting a main context.
pub struct MainContext;

impl MainContext {
    /// Spawns a main context owning `state`.
    ///
    /// Returns a handle for queuing jobs and the actor's `JoinHandle`, which
    /// resolves to the final state once the context stops.
    pub fn spawn<S: Send + 'static>(state: S) -> (MainHandle<S>, JoinHandle<S>) {
        let (tx, rx) = mpsc::unbounded_channel();

        let actor = MainActor {
            state,
            receiver: rx,
            jobs_run: 0,
        };
        let join = tokio::spawn(actor.run());

        (MainHandle { sender: tx }, join)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_call_returns_job_result() {
        let (handle, _join) = MainContext::spawn(41u32);

        let value = handle
            .call(|n| {
                *n += 1;
                *n
            })
            .await
            .unwrap();

        assert_eq!(value, 42);
    }

    #[tokio::test]
    async fn test_jobs_run_in_queue_order() {
        let (handle, join) = MainContext::spawn(Vec::<u32>::new());

        for i in 0..10 {
            handle.run(move |v| v.push(i)).unwrap();
        }
        handle.shutdown().unwrap();

        let state = join.await.unwrap();
        assert_eq!(state, (0..10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_job_can_queue_another_job() {
        let (handle, _join) = MainContext::spawn(Vec::<&'static str>::new());
        let inner = handle.clone();

        handle
            .run(move |v| {
                v.push("outer");
                inner.run(|v| v.push("inner")).unwrap();
            })
            .unwrap();

        // The inner job lands behind anything queued before `outer` ran,
        // so flush once before looking.
        handle.call(|_| ()).await.unwrap();
        let seen = handle.call(|v| v.clone()).await.unwrap();
        assert_eq!(seen, vec!["outer", "inner"]);
    }

    #[tokio::test]
    async fn test_run_after_shutdown_returns_unavailable() {
        let (handle, join) = MainContext::spawn(());
        handle.shutdown().unwrap();
        join.await.unwrap();

        assert!(handle.is_closed());
        assert!(matches!(handle.run(|_| {}), Err(HostError::Unavailable)));
    }

    #[tokio::test]
    async fn test_panicking_job_does_not_stop_context() {
        let (handle, _join) = MainContext::spawn(0u32);

        let result = handle.call(|_| -> u32 { panic!("boom") }).await;
        assert!(matches!(result, Err(HostError::ReplyDropped)));

        let value = handle.call(|n| *n + 1).await.unwrap();
        assert_eq!(value, 1);
    }

    #[tokio::test]
    async fn test_dropping_all_handles_stops_context() {
        let (handle, join) = MainContext::spawn(7u8);
        drop(handle);
        assert_eq!(join.await.unwrap(), 7);
    }
}
