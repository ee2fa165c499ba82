//! Runs character sessions on blocking worker threads and stops them on
//! Ctrl-C.
use anyhow::Result;
use runtime::{EngineError, PauseGate, Session};
use tokio::task::JoinHandle;

pub struct SessionReport {
    pub name: String,
    pub outcome: runtime::Result<()>,
}

#[derive(Default)]
pub struct Supervisor {
    gates: Vec<PauseGate>,
    handles: Vec<(String, JoinHandle<runtime::Result<()>>)>,
}

impl Supervisor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `job` for `session` on the blocking pool.
    pub fn spawn<F>(&mut self, session: Session, job: F)
    where
        F: FnOnce(&Session) -> runtime::Result<()> + Send + 'static,
    {
        let name = session.name().to_string();
        self.gates.push(session.gate().clone());
        tracing::info!("[{}] starting", name);
        let handle = tokio::task::spawn_blocking(move || job(&session));
        self.handles.push((name, handle));
    }

    /// Waits for every session, stopping them all if Ctrl-C arrives first.
    pub async fn wait(self) -> Result<Vec<SessionReport>> {
        let gates = self.gates.clone();
        let watcher = tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("interrupt received, stopping {} sessions", gates.len());
                for gate in &gates {
                    gate.stop();
                }
            }
        });

        let mut reports = Vec::with_capacity(self.handles.len());
        for (name, handle) in self.handles {
            let outcome = handle.await?;
            match &outcome {
                Ok(()) => tracing::info!("[{}] finished", name),
                Err(EngineError::Cancelled) => tracing::info!("[{}] stopped", name),
                Err(err) if err.severity().is_fatal() => {
                    tracing::warn!("[{}] ended: {}", name, err)
                }
                Err(err) => tracing::error!("[{}] failed: {}", name, err),
            }
            reports.push(SessionReport { name, outcome });
        }

        watcher.abort();
        Ok(reports)
    }
}
