//! Bounded task scheduler - infrastructure layer
//!
//! Runs at most `limit` futures at once on the tokio runtime and returns one
//! settled outcome per task, in submission order. A failing or panicking task
//! never affects its siblings and the call always settles completely.

use std::future::Future;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tracing::error;

/// Why a scheduled task did not produce a value
#[derive(Debug, Error)]
pub enum TaskFailure<E> {
    /// The task returned an error
    #[error("{0}")]
    Failed(E),
    /// The task panicked or could not be started
    #[error("task aborted: {0}")]
    Aborted(String),
}

/// Outcome of one scheduled task
pub type Settled<T, E> = Result<T, TaskFailure<E>>;

/// Bounded task scheduler
#[derive(Debug, Clone, Copy)]
pub struct BoundedScheduler {
    limit: usize,
}

impl BoundedScheduler {
    /// A limit of 0 is treated as 1
    pub fn new(limit: usize) -> Self {
        Self {
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Runs every task and waits for all of them to settle
    ///
    /// A permit is taken before each task is spawned, so tasks start in
    /// submission order and the rest queue until a slot frees up.
    ///
    /// # Returns
    /// One outcome per task, `outcomes[i]` belongs to `tasks[i]`
    pub async fn run<T, E, Fut>(&self, tasks: Vec<Fut>) -> Vec<Settled<T, E>>
    where
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let semaphore = Arc::new(Semaphore::new(self.limit));
        let mut handles: Vec<Result<JoinHandle<Result<T, E>>, String>> =
            Vec::with_capacity(tasks.len());

        for task in tasks {
            let permit = match semaphore.clone().acquire_owned().await {
                Ok(permit) => permit,
                Err(e) => {
                    handles.push(Err(e.to_string()));
                    continue;
                }
            };

            handles.push(Ok(tokio::spawn(async move {
                let _permit = permit;
                task.await
            })));
        }

        let mut outcomes = Vec::with_capacity(handles.len());
        for (index, handle) in handles.into_iter().enumerate() {
            let outcome = match handle {
                Ok(handle) => match handle.await {
                    Ok(Ok(value)) => Ok(value),
                    Ok(Err(e)) => Err(TaskFailure::Failed(e)),
                    Err(join_error) => {
                        error!("[task {}] aborted: {}", index + 1, join_error);
                        Err(TaskFailure::Aborted(join_error.to_string()))
                    }
                },
                Err(reason) => Err(TaskFailure::Aborted(reason)),
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
