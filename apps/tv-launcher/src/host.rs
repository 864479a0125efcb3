//! Simulated app-control facility for running the launcher without a TV.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use launch_core::{
    AppControlHost, AppControlRequest, HostError, LaunchRecord, LaunchReply, LaunchReplyReceiver,
    launch_reply_channel,
};
use tokio::time::sleep;
use tracing::{debug, info};

/// How the simulated platform answers the launch request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ReplyMode {
    /// Report the target app as launched.
    #[default]
    Succeed,
    /// Report the target app as missing.
    Fail,
    /// Drop the callback without answering.
    Drop,
    /// Never answer.
    Silent,
}

pub struct SimulatedHost {
    record: Result<Option<LaunchRecord>, HostError>,
    mode: ReplyMode,
    reply_after: Duration,
    fail_reason: String,
    fault: Option<String>,
    parked: Mutex<Vec<LaunchReply>>,
}

impl SimulatedHost {
    pub fn new(record: Result<Option<LaunchRecord>, HostError>, mode: ReplyMode) -> Self {
        Self {
            record,
            mode,
            reply_after: Duration::ZERO,
            fail_reason: "NotFoundError: target app is not installed".to_string(),
            fault: None,
            parked: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply_after(mut self, reply_after: Duration) -> Self {
        self.reply_after = reply_after;
        self
    }

    pub fn with_fail_reason(mut self, reason: impl Into<String>) -> Self {
        self.fail_reason = reason.into();
        self
    }

    /// Make the launch call itself fail with `message`.
    pub fn with_fault(mut self, message: Option<String>) -> Self {
        self.fault = message;
        self
    }
}

#[async_trait]
impl AppControlHost for SimulatedHost {
    fn requested_launch_record(&self) -> Result<Option<LaunchRecord>, HostError> {
        self.record.clone()
    }

    async fn launch_app_control(
        &self,
        request: AppControlRequest,
    ) -> Result<LaunchReplyReceiver, HostError> {
        info!(
            app_id = %request.app_id,
            operation = %request.operation,
            uri = %request.uri,
            "simulated app-control request"
        );
        if let Some(message) = &self.fault {
            return Err(HostError::Fault(message.clone()));
        }

        let (reply, receiver) = launch_reply_channel();
        let delay = self.reply_after;
        match self.mode {
            ReplyMode::Succeed => {
                tokio::spawn(async move {
                    sleep(delay).await;
                    reply.succeed();
                });
            }
            ReplyMode::Fail => {
                let reason = self.fail_reason.clone();
                tokio::spawn(async move {
                    sleep(delay).await;
                    reply.fail(reason);
                });
            }
            ReplyMode::Drop => drop(reply),
            ReplyMode::Silent => {
                debug!("holding launch reply without answering");
                self.parked
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push(reply);
            }
        }
        Ok(receiver)
    }
}
