//! Host capabilities the launcher depends on.
//!
//! The platform's app-control facility and the shell's status elements are
//! injected through these traits so the orchestrator runs without a device.

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::destination::Destination;
use crate::error::{HostError, LaunchError, Result};
use crate::record::LaunchRecord;

/// Request handed to the app-control facility.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppControlRequest {
    pub app_id: String,
    pub operation: String,
    pub uri: Destination,
}

/// Answer slot for one launch request. Success and failure consume the handle,
/// so at most one of them ever fires.
#[derive(Debug)]
pub struct LaunchReply {
    tx: oneshot::Sender<std::result::Result<(), String>>,
}

impl LaunchReply {
    pub fn succeed(self) {
        let _ = self.tx.send(Ok(()));
    }

    pub fn fail(self, reason: impl Into<String>) {
        let _ = self.tx.send(Err(reason.into()));
    }
}

/// Receiving side of a [`LaunchReply`].
#[derive(Debug)]
pub struct LaunchReplyReceiver {
    rx: oneshot::Receiver<std::result::Result<(), String>>,
}

impl LaunchReplyReceiver {
    /// Wait for the host to answer. A dropped reply handle counts as failure.
    pub async fn wait(self) -> Result<()> {
        match self.rx.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(reason)) => Err(LaunchError::Rejected(reason)),
            Err(_) => Err(LaunchError::CallbackDropped),
        }
    }
}

/// Create a paired reply handle and receiver.
pub fn launch_reply_channel() -> (LaunchReply, LaunchReplyReceiver) {
    let (tx, rx) = oneshot::channel();
    (LaunchReply { tx }, LaunchReplyReceiver { rx })
}

/// The platform's application facility.
#[async_trait]
pub trait AppControlHost: Send + Sync {
    /// App-control data the shell was started with, if any.
    fn requested_launch_record(&self) -> std::result::Result<Option<LaunchRecord>, HostError>;

    /// Issue the launch. Errors returned here are synchronous faults; the
    /// outcome of an accepted request arrives on the returned receiver.
    async fn launch_app_control(
        &self,
        request: AppControlRequest,
    ) -> std::result::Result<LaunchReplyReceiver, HostError>;
}

/// Visible elements of the launcher shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
    Status,
    Error,
    Spinner,
    /// The whole shell page.
    Shell,
}

impl Surface {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Status => "status",
            Self::Error => "error",
            Self::Spinner => "spinner",
            Self::Shell => "shell",
        }
    }
}

/// Minimal view surface. Implementations must not fail; missing elements are ignored.
pub trait ShellView: Send + Sync {
    fn set_text(&self, surface: Surface, text: &str);
    fn set_shown(&self, surface: Surface, shown: bool);
    fn set_opacity(&self, surface: Surface, opacity: f32);
}
