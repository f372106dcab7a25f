//! Session lifecycle around the acquisition worker thread.

use crate::acquisition::{run_acquisition, PipelineError};
use crate::history::{BoundedHistory, Snapshot};
use crate::sink::RecordSink;
use crate::source::LineSource;
use log::error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session is already running")]
    AlreadyRunning,
    #[error("session is not running")]
    NotRunning,
    #[error("failed to open record sink: {0}")]
    SinkOpen(std::io::Error),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("acquisition worker panicked")]
    WorkerPanic,
}

/// One capture session: owns the history, the stop signal and the worker
/// thread. The driver (display loop, UI, test harness) talks to the session
/// only through `start`, `request_stop` and `snapshot`, so several sessions
/// can coexist in one process.
pub struct StreamSession {
    history: Arc<BoundedHistory>,
    persist_path: Option<PathBuf>,
    stop_signal: Arc<AtomicBool>,
    worker: Option<JoinHandle<Result<(), PipelineError>>>,
    state: SessionState,
}

impl StreamSession {
    pub fn new(history_capacity: usize, persist_path: Option<PathBuf>) -> Self {
        Self {
            history: Arc::new(BoundedHistory::new(history_capacity)),
            persist_path,
            stop_signal: Arc::new(AtomicBool::new(false)),
            worker: None,
            state: SessionState::Idle,
        }
    }

    /// Spawn the acquisition worker over `source`.
    ///
    /// Opens the sink first when a persist path is configured, so an
    /// unwritable path aborts startup before any thread exists.
    pub fn start<S>(&mut self, source: S) -> Result<(), SessionError>
    where
        S: LineSource + Send + 'static,
    {
        if self.state != SessionState::Idle {
            return Err(SessionError::AlreadyRunning);
        }

        let sink = match &self.persist_path {
            Some(path) => Some(RecordSink::open(path).map_err(SessionError::SinkOpen)?),
            None => None,
        };

        let history = Arc::clone(&self.history);
        let stop_signal = Arc::clone(&self.stop_signal);
        self.worker = Some(thread::spawn(move || {
            run_acquisition(source, &history, sink, &stop_signal)
        }));
        self.state = SessionState::Running;
        Ok(())
    }

    /// Signal the worker to stop and wait for it to drain.
    ///
    /// Blocks until the loop has finished and the sink is closed, then
    /// reports the worker's terminal result. Calling this on a session that
    /// is not running is an error return, never a crash.
    pub fn request_stop(&mut self) -> Result<(), SessionError> {
        if self.state != SessionState::Running {
            return Err(SessionError::NotRunning);
        }

        self.state = SessionState::Stopping;
        self.stop_signal.store(true, Ordering::SeqCst);
        let joined = self.worker.take().map(JoinHandle::join);
        self.state = SessionState::Stopped;

        match joined {
            Some(Ok(result)) => result.map_err(SessionError::Pipeline),
            Some(Err(_)) => Err(SessionError::WorkerPanic),
            None => Ok(()),
        }
    }

    /// Consistent copy of the recent history; callable in any state. After a
    /// stop it returns whatever was captured before the drain.
    pub fn snapshot(&self) -> Snapshot {
        self.history.snapshot()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        self.stop_signal.store(true, Ordering::SeqCst);
        if let Some(handle) = self.worker.take() {
            match handle.join() {
                Ok(Err(err)) => error!("acquisition failed during shutdown: {err}"),
                Err(_) => error!("acquisition worker panicked"),
                Ok(Ok(())) => {}
            }
        }
    }
}
