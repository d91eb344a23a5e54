use crate::script::{interpret_script, ScriptJob};
use crate::simulation::{Engine, SweepExecutor, SweepSimulation};
use rtm_dataset::Dataset;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc::{self, Receiver, Sender, SyncSender, TryRecvError, TrySendError};
use std::sync::Arc;
use std::thread;

#[derive(Debug, Clone, PartialEq)]
pub enum WorkerEvent<R> {
    Progress(u64),
    Finished(R),
    Failed(String),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkerError {
    #[error("worker '{0}' is busy")]
    Busy(String),
    #[error("worker '{0}' has stopped")]
    Stopped(String),
    #[error("failed to spawn worker '{name}': {reason}")]
    Spawn { name: String, reason: String },
}

/// Progress reporter handed to a job handler.
pub struct Progress<R> {
    tx: Sender<WorkerEvent<R>>,
}

impl<R: Send> Progress<R> {
    pub fn report(&self, completed: u64) {
        let _ = self.tx.send(WorkerEvent::Progress(completed));
    }
}

/// A named background thread processing one job at a time.
///
/// The job slot holds a single job and [`Worker::submit`] refuses new jobs
/// until the previous one has finished or failed. Events are collected with
/// [`Worker::try_recv`].
pub struct Worker<J, R> {
    name: String,
    job_tx: Option<SyncSender<J>>,
    event_rx: Receiver<WorkerEvent<R>>,
    busy: bool,
    handle: Option<thread::JoinHandle<()>>,
}

impl<J: Send + 'static, R: Send + 'static> Worker<J, R> {
    pub fn spawn<F>(name: &str, mut handler: F) -> Result<Self, WorkerError>
    where
        F: FnMut(J, &Progress<R>) -> Result<R, String> + Send + 'static,
    {
        let (job_tx, job_rx) = mpsc::sync_channel::<J>(1);
        let (event_tx, event_rx) = mpsc::channel::<WorkerEvent<R>>();
        let thread_name = name.to_string();
        let handle = thread::Builder::new()
            .name(thread_name.clone())
            .spawn(move || {
                let progress = Progress { tx: event_tx };
                while let Ok(job) = job_rx.recv() {
                    log::debug!("{thread_name}: job received");
                    let outcome =
                        panic::catch_unwind(AssertUnwindSafe(|| handler(job, &progress)));
                    let event = match outcome {
                        Ok(Ok(result)) => WorkerEvent::Finished(result),
                        Ok(Err(err)) => WorkerEvent::Failed(err),
                        Err(_) => WorkerEvent::Failed(format!("{thread_name} panicked")),
                    };
                    if progress.tx.send(event).is_err() {
                        break;
                    }
                }
                log::debug!("{thread_name}: job channel closed");
            })
            .map_err(|err| WorkerError::Spawn {
                name: name.to_string(),
                reason: err.to_string(),
            })?;

        Ok(Self {
            name: name.to_string(),
            job_tx: Some(job_tx),
            event_rx,
            busy: false,
            handle: Some(handle),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn submit(&mut self, job: J) -> Result<(), WorkerError> {
        if self.busy {
            return Err(WorkerError::Busy(self.name.clone()));
        }
        let Some(tx) = &self.job_tx else {
            return Err(WorkerError::Stopped(self.name.clone()));
        };
        match tx.try_send(job) {
            Ok(()) => {
                self.busy = true;
                Ok(())
            }
            Err(TrySendError::Full(_)) => Err(WorkerError::Busy(self.name.clone())),
            Err(TrySendError::Disconnected(_)) => Err(WorkerError::Stopped(self.name.clone())),
        }
    }

    /// Next pending event, if any.
    pub fn try_recv(&mut self) -> Option<WorkerEvent<R>> {
        match self.event_rx.try_recv() {
            Ok(event) => {
                if !matches!(event, WorkerEvent::Progress(_)) {
                    self.busy = false;
                }
                Some(event)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                if self.busy {
                    self.busy = false;
                    return Some(WorkerEvent::Failed(format!("{} stopped", self.name)));
                }
                None
            }
        }
    }

    /// Closes the job slot and waits for the thread to finish its current job.
    pub fn shutdown(&mut self) {
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            log::debug!("waiting on {}", self.name);
            if handle.join().is_err() {
                log::error!("{} terminated abnormally", self.name);
            }
            log::debug!("{} terminated", self.name);
        }
    }
}

impl<J, R> Drop for Worker<J, R> {
    fn drop(&mut self) {
        self.job_tx.take();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// A sweep ready to run.
pub struct SimulationJob {
    pub sweep: SweepSimulation,
    pub engine: Arc<dyn Engine>,
    pub max_workers: Option<usize>,
}

impl From<ScriptJob> for SimulationJob {
    fn from(job: ScriptJob) -> Self {
        Self {
            sweep: job.sweep,
            engine: job.engine,
            max_workers: job.max_workers,
        }
    }
}

pub type ScriptWorker = Worker<String, ScriptJob>;
pub type SimulationWorker = Worker<SimulationJob, Dataset>;

pub fn spawn_script_worker() -> Result<ScriptWorker, WorkerError> {
    Worker::spawn("script-worker", |text: String, _progress: &Progress<ScriptJob>| {
        interpret_script(&text).map_err(|err| err.to_string())
    })
}

pub fn spawn_sim_worker() -> Result<SimulationWorker, WorkerError> {
    Worker::spawn(
        "sim-worker",
        |job: SimulationJob, progress: &Progress<Dataset>| {
            let report = |completed: u64| progress.report(completed);
            SweepExecutor::new(job.max_workers)
                .run(&job.sweep, job.engine.as_ref(), &report)
                .map_err(|err| err.to_string())
        },
    )
}
