#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use launch_core::{
    AppControlHost, AppControlRequest, HostError, LaunchRecord, LaunchReply, LaunchReplyReceiver,
    LauncherConfig, ShellView, Surface, launch_reply_channel,
};
use tokio::time::Instant;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewOp {
    Text(Surface, String),
    Shown(Surface, bool),
    Opacity(Surface, f32),
}

/// View that records every write with the (paused) tokio time it happened at.
pub struct RecordingView {
    started: Instant,
    ops: Mutex<Vec<(u64, ViewOp)>>,
}

impl RecordingView {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            started: Instant::now(),
            ops: Mutex::new(Vec::new()),
        })
    }

    fn push(&self, op: ViewOp) {
        let at = self.started.elapsed().as_millis() as u64;
        lock(&self.ops).push((at, op));
    }

    pub fn ops(&self) -> Vec<ViewOp> {
        lock(&self.ops).iter().map(|(_, op)| op.clone()).collect()
    }

    pub fn timed_ops(&self) -> Vec<(u64, ViewOp)> {
        lock(&self.ops).clone()
    }

    pub fn texts(&self, surface: Surface) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                ViewOp::Text(target, text) if target == surface => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn touched_shell(&self) -> bool {
        self.ops().iter().any(|op| {
            matches!(
                op,
                ViewOp::Opacity(Surface::Shell, _) | ViewOp::Shown(Surface::Shell, _)
            )
        })
    }

    /// Milliseconds since creation at which `op` was first recorded.
    pub fn time_of(&self, wanted: &ViewOp) -> Option<u64> {
        lock(&self.ops)
            .iter()
            .find(|(_, op)| op == wanted)
            .map(|(at, _)| *at)
    }
}

impl ShellView for RecordingView {
    fn set_text(&self, surface: Surface, text: &str) {
        self.push(ViewOp::Text(surface, text.to_string()));
    }

    fn set_shown(&self, surface: Surface, shown: bool) {
        self.push(ViewOp::Shown(surface, shown));
    }

    fn set_opacity(&self, surface: Surface, opacity: f32) {
        self.push(ViewOp::Opacity(surface, opacity));
    }
}

#[derive(Debug, Clone)]
pub enum HostReply {
    Succeed,
    Fail(String),
    /// Drop the reply handle without answering.
    Drop,
    /// Keep the reply handle and never answer.
    Silent,
    /// The launch call itself fails synchronously.
    Fault(String),
}

pub struct FakeHost {
    record: Result<Option<LaunchRecord>, HostError>,
    reply: HostReply,
    started: Instant,
    requests: Mutex<Vec<(u64, AppControlRequest)>>,
    parked: Mutex<Vec<LaunchReply>>,
}

impl FakeHost {
    pub fn new(record: Option<LaunchRecord>, reply: HostReply) -> Arc<Self> {
        Self::with_record_result(Ok(record), reply)
    }

    pub fn with_record_result(
        record: Result<Option<LaunchRecord>, HostError>,
        reply: HostReply,
    ) -> Arc<Self> {
        Arc::new(Self {
            record,
            reply,
            started: Instant::now(),
            requests: Mutex::new(Vec::new()),
            parked: Mutex::new(Vec::new()),
        })
    }

    pub fn requests(&self) -> Vec<AppControlRequest> {
        lock(&self.requests)
            .iter()
            .map(|(_, request)| request.clone())
            .collect()
    }

    /// Milliseconds since creation at which each request arrived.
    pub fn request_times(&self) -> Vec<u64> {
        lock(&self.requests).iter().map(|(at, _)| *at).collect()
    }
}

#[async_trait]
impl AppControlHost for FakeHost {
    fn requested_launch_record(&self) -> Result<Option<LaunchRecord>, HostError> {
        self.record.clone()
    }

    async fn launch_app_control(
        &self,
        request: AppControlRequest,
    ) -> Result<LaunchReplyReceiver, HostError> {
        let at = self.started.elapsed().as_millis() as u64;
        lock(&self.requests).push((at, request));

        let (reply, receiver) = launch_reply_channel();
        match &self.reply {
            HostReply::Succeed => reply.succeed(),
            HostReply::Fail(reason) => reply.fail(reason.clone()),
            HostReply::Drop => drop(reply),
            HostReply::Silent => lock(&self.parked).push(reply),
            HostReply::Fault(message) => return Err(HostError::Fault(message.clone())),
        }
        Ok(receiver)
    }
}

/// Host whose calls panic, as a missing platform binding would.
pub struct PanickingHost {
    message: String,
    during_query: bool,
}

impl PanickingHost {
    /// Panics while the launch record is queried.
    pub fn on_query(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: message.to_string(),
            during_query: true,
        })
    }

    /// Panics when the launch call is issued.
    pub fn on_launch(message: &str) -> Arc<Self> {
        Arc::new(Self {
            message: message.to_string(),
            during_query: false,
        })
    }
}

#[async_trait]
impl AppControlHost for PanickingHost {
    fn requested_launch_record(&self) -> Result<Option<LaunchRecord>, HostError> {
        if self.during_query {
            std::panic::panic_any(self.message.clone());
        }
        Ok(None)
    }

    async fn launch_app_control(
        &self,
        _request: AppControlRequest,
    ) -> Result<LaunchReplyReceiver, HostError> {
        std::panic::panic_any(self.message.clone());
    }
}

pub fn config() -> LauncherConfig {
    LauncherConfig::default()
}

/// `actual` is within a few milliseconds after `expected`.
pub fn near(actual: u64, expected: u64) -> bool {
    actual >= expected && actual <= expected + 5
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
