//! Environment signals: the fire-once ready trigger and the uncaught-error channel.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::error;

/// Fires the environment-ready signal. Consumed on use, so it fires at most once.
#[derive(Debug)]
pub struct ReadyTrigger {
    tx: oneshot::Sender<()>,
}

impl ReadyTrigger {
    pub fn fire(self) {
        let _ = self.tx.send(());
    }
}

#[derive(Debug)]
pub struct ReadySignal {
    rx: oneshot::Receiver<()>,
}

impl ReadySignal {
    /// Resolves `true` once fired, `false` if the trigger was dropped unfired.
    pub async fn wait(self) -> bool {
        self.rx.await.is_ok()
    }
}

pub fn ready_signal() -> (ReadyTrigger, ReadySignal) {
    let (tx, rx) = oneshot::channel();
    (ReadyTrigger { tx }, ReadySignal { rx })
}

/// Records uncaught top-level errors for diagnostics. Has no effect on the launch run.
#[derive(Debug, Clone)]
pub struct DiagnosticsSink {
    tx: mpsc::UnboundedSender<String>,
}

impl DiagnosticsSink {
    /// Start the background logger. The task ends when every sink is dropped
    /// and returns how many errors it logged.
    pub fn spawn() -> (Self, JoinHandle<usize>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<String>();
        let task = tokio::spawn(async move {
            let mut recorded = 0usize;
            while let Some(message) = rx.recv().await {
                recorded += 1;
                error!(error = %message, "uncaught launcher error");
            }
            recorded
        });
        (Self { tx }, task)
    }

    pub fn record(&self, message: impl Into<String>) {
        let _ = self.tx.send(message.into());
    }
}
