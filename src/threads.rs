//! Parallel evaluation of a conjunction.

use crate::{
    error::{Error, Result},
    func::Applied,
    scalar::Scalar,
};
use std::{sync::Arc, time::Duration, vec};
use tokio::{
    runtime::{self, Handle},
    task::JoinHandle,
};

/// How [`AndInThreads`] builds the pool it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadsConfig {
    /// Upper bound of threads evaluating elements; `None` leaves it to tokio.
    pub workers: Option<usize>,
    /// How long to wait for outstanding elements once the result is known.
    pub termination: Duration,
    pub thread_name: String,
}

impl Default for ThreadsConfig {
    fn default() -> Self {
        ThreadsConfig {
            workers: None,
            termination: Duration::from_secs(60),
            thread_name: "elegant-worker".into(),
        }
    }
}

impl ThreadsConfig {
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_termination(mut self, termination: Duration) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_thread_name(mut self, name: impl Into<String>) -> Self {
        self.thread_name = name.into();
        self
    }

    fn runtime(&self) -> Result<runtime::Runtime> {
        let mut builder = runtime::Builder::new_multi_thread();
        builder
            .worker_threads(1)
            .thread_name(self.thread_name.clone())
            .enable_time();
        if let Some(workers) = self.workers {
            builder.max_blocking_threads(workers.max(1));
        }
        Ok(builder.build()?)
    }
}

enum Pool {
    Owned(ThreadsConfig),
    Shared(Handle),
}

/// [`crate::And`], with every element evaluated on a thread pool.
///
/// All elements are submitted up front; the results are then reduced in submission order, so the
/// first `false` or the first failure decides the outcome. A pool created by this wrapper is shut
/// down after every evaluation, and outstanding elements get [`ThreadsConfig::termination`] to
/// finish. A pool handed in with [`AndInThreads::on`] is left running.
///
/// `value()` blocks the calling thread and must not be called from within an async context.
pub struct AndInThreads<S> {
    items: Vec<Arc<S>>,
    pool: Pool,
}

impl<S> AndInThreads<S> {
    pub fn new(items: impl IntoIterator<Item = S>) -> Self {
        AndInThreads::with_config(ThreadsConfig::default(), items)
    }

    pub fn with_config(config: ThreadsConfig, items: impl IntoIterator<Item = S>) -> Self {
        AndInThreads {
            items: items.into_iter().map(Arc::new).collect(),
            pool: Pool::Owned(config),
        }
    }

    /// Evaluates on an existing runtime, which is neither created nor shut down here.
    pub fn on(handle: Handle, items: impl IntoIterator<Item = S>) -> Self {
        AndInThreads {
            items: items.into_iter().map(Arc::new).collect(),
            pool: Pool::Shared(handle),
        }
    }
}

impl<F, X> AndInThreads<Applied<F, X>> {
    pub fn with(func: F, inputs: impl IntoIterator<Item = X>) -> Self {
        AndInThreads::new(Applied::each(func, inputs))
    }
}

impl<S> Scalar<bool> for AndInThreads<S>
where
    S: Scalar<bool> + Send + Sync + 'static,
{
    fn value(&self) -> Result<bool> {
        match &self.pool {
            Pool::Shared(handle) => {
                let mut tasks = submit(handle, &self.items).into_iter();
                handle.block_on(conjunction(&mut tasks))
            }
            Pool::Owned(config) => {
                let runtime = config.runtime()?;
                tracing::debug!(
                    elements = self.items.len(),
                    workers = ?config.workers,
                    "started thread pool"
                );
                let mut tasks = submit(runtime.handle(), &self.items).into_iter();
                let termination = config.termination;
                let result = runtime.block_on(async {
                    let outcome = conjunction(&mut tasks).await;
                    let outstanding = async {
                        for task in tasks {
                            let _ = task.await;
                        }
                    };
                    if tokio::time::timeout(termination, outstanding).await.is_err() {
                        tracing::error!(?termination, "thread pool did not terminate in time");
                        return Err(Error::Termination(termination));
                    }
                    outcome
                });
                runtime.shutdown_background();
                tracing::debug!("shut down thread pool");
                result
            }
        }
    }
}

fn submit<S>(handle: &Handle, items: &[Arc<S>]) -> Vec<JoinHandle<Result<bool>>>
where
    S: Scalar<bool> + Send + Sync + 'static,
{
    items
        .iter()
        .map(|item| {
            let item = Arc::clone(item);
            handle.spawn_blocking(move || item.value())
        })
        .collect()
}

async fn conjunction(tasks: &mut vec::IntoIter<JoinHandle<Result<bool>>>) -> Result<bool> {
    for task in tasks {
        match task.await {
            Ok(Ok(true)) => {}
            Ok(Ok(false)) => return Ok(false),
            Ok(Err(err)) => return Err(err),
            Err(err) => return Err(Error::Panicked(err.to_string())),
        }
    }
    Ok(true)
}
