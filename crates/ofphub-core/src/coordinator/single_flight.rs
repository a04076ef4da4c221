//! At most one background job per slot.

use log::debug;
use tokio::{
    runtime::Handle,
    sync::oneshot::{self, error::TryRecvError},
};

/// Outcome of a non-blocking poll.
#[derive(Debug, PartialEq, Eq)]
pub enum PollResult<T> {
    /// Nothing was started
    Idle,
    /// A job is in flight
    Running,
    /// The job finished; the slot is free again
    Ready(T),
    /// The job ended without producing a result
    Lost,
}

/// A slot that runs one blocking job at a time on the runtime's blocking
/// pool and hands its result back through a oneshot channel.
#[derive(Debug)]
pub struct SingleFlight<T> {
    label: &'static str,
    pending: Option<oneshot::Receiver<T>>,
}

impl<T: Send + 'static> SingleFlight<T> {
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            pending: None,
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Starts `job` unless one is already running.
    ///
    /// Returns `false` without starting anything when the slot is busy.
    pub fn try_start<F>(&mut self, handle: &Handle, job: F) -> bool
    where
        F: FnOnce() -> T + Send + 'static,
    {
        if self.pending.is_some() {
            debug!("{} download already in flight", self.label);
            return false;
        }

        let (tx, rx) = oneshot::channel();
        handle.spawn_blocking(move || {
            // The receiver is gone only if the slot was dropped.
            let _ = tx.send(job());
        });
        self.pending = Some(rx);
        debug!("{} download started", self.label);
        true
    }

    /// Checks for a result without blocking. A result is returned once.
    pub fn poll(&mut self) -> PollResult<T> {
        let Some(rx) = self.pending.as_mut() else {
            return PollResult::Idle;
        };

        match rx.try_recv() {
            Ok(value) => {
                self.pending = None;
                PollResult::Ready(value)
            }
            Err(TryRecvError::Empty) => PollResult::Running,
            Err(TryRecvError::Closed) => {
                self.pending = None;
                PollResult::Lost
            }
        }
    }
}
