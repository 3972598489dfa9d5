//! Bounded worker pool for concurrent scenario runs.
//!
//! Each run is single-threaded and isolated, so independent scenarios can be
//! spread across threads that share one `PropagationEngine` (and therefore
//! one read-only registry and graph).

use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{bounded, Receiver, RecvTimeoutError, Sender, TrySendError};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{ExecutionError, RippleError, RippleResult};
use crate::scenario::Scenario;

use super::{Forecast, PropagationEngine, DEFAULT_HORIZON};

/// Runtime configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Number of worker threads.
    pub workers: usize,
    /// Maximum queued jobs.
    pub queue_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            workers: 2,
            queue_capacity: 256,
        }
    }
}

/// One scenario to run.
#[derive(Debug, Clone)]
pub struct ScenarioJob {
    /// Shocks to apply.
    pub scenario: Scenario,
    /// Shock year.
    pub start_year: i32,
    /// Horizon in years.
    pub horizon: u32,
}

impl ScenarioJob {
    /// Job with the default five-year horizon.
    #[must_use]
    pub fn new(scenario: Scenario, start_year: i32) -> Self {
        Self {
            scenario,
            start_year,
            horizon: DEFAULT_HORIZON,
        }
    }

    /// Override the horizon.
    #[must_use]
    pub fn with_horizon(mut self, horizon: u32) -> Self {
        self.horizon = horizon;
        self
    }
}

enum Job {
    Run {
        job: ScenarioJob,
        reply: Sender<RippleResult<Forecast>>,
    },

    #[cfg(test)]
    Sleep {
        duration: Duration,
        reply: Sender<()>,
    },
}

/// Handle returned by `ScenarioRuntime::submit`.
pub struct ScenarioHandle {
    rx: Receiver<RippleResult<Forecast>>,
}

impl ScenarioHandle {
    /// Waits for the run to complete.
    pub fn join(self) -> RippleResult<Forecast> {
        self.rx
            .recv()
            .map_err(|_| RippleError::Execution(ExecutionError::Disconnected))?
    }

    /// Waits for the run to complete with a timeout.
    pub fn join_timeout(self, timeout: Duration) -> RippleResult<Forecast> {
        self.rx.recv_timeout(timeout).map_err(|err| match err {
            RecvTimeoutError::Timeout => RippleError::Execution(ExecutionError::Timeout {
                duration_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
            }),
            RecvTimeoutError::Disconnected => RippleError::Execution(ExecutionError::Disconnected),
        })?
    }
}

/// Fixed-size pool of scenario workers over one shared engine.
pub struct ScenarioRuntime {
    engine: Arc<PropagationEngine>,
    tx: Option<Sender<Job>>,
    workers: Vec<JoinHandle<()>>,
    queue_capacity: usize,
}

impl ScenarioRuntime {
    /// Start the worker threads.
    ///
    /// # Errors
    /// Returns `Internal` if a worker thread cannot be spawned.
    pub fn new(engine: Arc<PropagationEngine>, config: RuntimeConfig) -> RippleResult<Self> {
        let workers = config.workers.max(1);
        let queue_capacity = config.queue_capacity.max(1);
        let (tx, rx) = bounded::<Job>(queue_capacity);

        let mut handles = Vec::with_capacity(workers);
        for idx in 0..workers {
            let rx: Receiver<Job> = rx.clone();
            let engine = Arc::clone(&engine);
            let handle = thread::Builder::new()
                .name(format!("ripple-worker-{idx}"))
                .spawn(move || loop {
                    match rx.recv() {
                        Ok(Job::Run { job, reply }) => {
                            let result = engine.run(&job.scenario, job.start_year, job.horizon);
                            let _ = reply.send(result);
                        }
                        Err(_) => break,

                        #[cfg(test)]
                        Ok(Job::Sleep { duration, reply }) => {
                            thread::sleep(duration);
                            let _ = reply.send(());
                        }
                    }
                })
                .map_err(|e| RippleError::internal(format!("failed to spawn ripple worker: {e}")))?;
            handles.push(handle);
        }
        debug!(workers, queue_capacity, "scenario runtime started");

        Ok(Self {
            engine,
            tx: Some(tx),
            workers: handles,
            queue_capacity,
        })
    }

    fn try_submit(&self, job: Job) -> RippleResult<()> {
        let Some(tx) = self.tx.as_ref() else {
            return Err(ExecutionError::Disconnected.into());
        };
        match tx.try_send(job) {
            Ok(()) => Ok(()),
            Err(TrySendError::Full(_)) => {
                warn!(capacity = self.queue_capacity, "scenario queue full");
                Err(ExecutionError::QueueFull {
                    capacity: self.queue_capacity,
                }
                .into())
            }
            Err(TrySendError::Disconnected(_)) => Err(ExecutionError::Disconnected.into()),
        }
    }

    /// Queue a scenario run.
    ///
    /// # Errors
    /// `QueueFull` when the queue is at capacity.
    pub fn submit(&self, job: ScenarioJob) -> RippleResult<ScenarioHandle> {
        let (tx, rx) = bounded::<RippleResult<Forecast>>(1);
        self.try_submit(Job::Run { job, reply: tx })?;
        Ok(ScenarioHandle { rx })
    }

    /// Run a scenario on the pool and wait for it.
    pub fn run(&self, job: ScenarioJob) -> RippleResult<Forecast> {
        self.submit(job)?.join()
    }

    /// Submit every job, then join them in input order.
    ///
    /// Submission failures are reported in place of the corresponding result.
    pub fn run_batch(&self, jobs: impl IntoIterator<Item = ScenarioJob>) -> Vec<RippleResult<Forecast>> {
        let handles: Vec<RippleResult<ScenarioHandle>> = jobs.into_iter().map(|job| self.submit(job)).collect();
        handles
            .into_iter()
            .map(|handle| handle.and_then(ScenarioHandle::join))
            .collect()
    }

    /// The shared engine.
    #[must_use]
    pub fn engine(&self) -> &PropagationEngine {
        &self.engine
    }

    /// Stop accepting work, drain queued jobs and join the workers.
    pub fn shutdown(&mut self) {
        // Closing the channel lets workers drain queued jobs then exit.
        self.tx.take();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
    }

    #[cfg(test)]
    fn submit_sleep(&self, duration: Duration) -> RippleResult<Receiver<()>> {
        let (tx, rx) = bounded::<()>(1);
        self.try_submit(Job::Sleep { duration, reply: tx })?;
        Ok(rx)
    }
}

impl Drop for ScenarioRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}
