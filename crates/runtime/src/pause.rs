//! Cooperative suspension point shared between a session and its supervisor.
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct GateState {
    paused: bool,
    stopped: bool,
}

/// Supervisor-controlled gate checked at the top of every engine loop.
///
/// Pausing blocks the session at its next checkpoint without losing any
/// in-progress state; stopping releases it and makes the checkpoint fail with
/// [`crate::EngineError::Cancelled`].
#[derive(Clone, Debug, Default)]
pub struct PauseGate {
    inner: Arc<(Mutex<GateState>, Condvar)>,
}

impl PauseGate {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, GateState> {
        self.inner.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn pause(&self) {
        self.state().paused = true;
    }

    pub fn resume(&self) {
        self.state().paused = false;
        self.inner.1.notify_all();
    }

    pub fn stop(&self) {
        self.state().stopped = true;
        self.inner.1.notify_all();
    }

    pub fn is_paused(&self) -> bool {
        self.state().paused
    }

    pub fn is_stopped(&self) -> bool {
        self.state().stopped
    }

    /// Blocks while paused. Returns `false` once the gate has been stopped.
    pub fn wait(&self) -> bool {
        let guard = self.state();
        let guard = self
            .inner
            .1
            .wait_while(guard, |state| state.paused && !state.stopped)
            .unwrap_or_else(PoisonError::into_inner);
        !guard.stopped
    }
}
