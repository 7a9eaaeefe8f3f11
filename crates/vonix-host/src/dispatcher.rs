//! The dispatcher seam between the bridge and the host runtime.
//!
//! The bridge never spawns tasks or touches state on its own. It asks a
//! [`Dispatcher`] to do two things:
//!
//! - `submit`: run a future off the main context (HTTP calls live here)
//! - `run_on_main`: get back onto the main context to apply results
//!
//! [`MainHandle`] implements this on top of Tokio. A real game server
//! would implement it with its own worker pool and "schedule on server
//! thread" primitive.

use std::future::Future;

use tokio::task::JoinHandle;

use crate::{HostError, MainHandle};

/// Moves work between the main context and worker tasks.
///
/// # Trait bounds
///
/// - `Clone` → every in-flight command keeps its own copy so it can find
///   its way back to the main context.
/// - `Send + Sync + 'static` → copies travel into spawned tasks.
///
/// `S` is the state owned by the main context.
pub trait Dispatcher<S>: Clone + Send + Sync + 'static {
    /// Runs `work` on a worker task and returns a handle to its result.
    fn submit<F>(&self, work: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static;

    /// Queues `job` to run on the main context.
    ///
    /// # Errors
    /// [`HostError::Unavailable`] if the main context is gone.
    fn run_on_main<F>(&self, job: F) -> Result<(), HostError>
    where
        F: FnOnce(&mut S) + Send + 'static;
}

impl<S: Send + 'static> Dispatcher<S> for MainHandle<S> {
    fn submit<F>(&self, work: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        tokio::spawn(work)
    }

    fn run_on_main<F>(&self, job: F) -> Result<(), HostError>
    where
        F: FnOnce(&mut S) + Send + 'static,
    {
        self.run(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MainContext;

    /// Exercises the trait generically, the way the bridge does.
    async fn round_trip<D: Dispatcher<Vec<String>>>(dispatcher: D) {
        let back = dispatcher.clone();
        let worker = dispatcher.submit(async move {
            let answer = "from worker".to_string();
            back.run_on_main(move |log| log.push(answer)).unwrap();
        });
        worker.await.unwrap();
    }

    #[tokio::test]
    async fn test_submit_then_run_on_main_applies_on_context() {
        let (handle, _join) = MainContext::spawn(Vec::<String>::new());

        round_trip(handle.clone()).await;

        let log = handle.call(|log| log.clone()).await.unwrap();
        assert_eq!(log, vec!["from worker".to_string()]);
    }

    #[tokio::test]
    async fn test_run_on_main_after_shutdown_returns_unavailable() {
        let (handle, join) = MainContext::spawn(());
        handle.shutdown().unwrap();
        join.await.unwrap();

        let result = Dispatcher::run_on_main(&handle, |_| {});
        assert!(matches!(result, Err(HostError::Unavailable)));
    }
}
