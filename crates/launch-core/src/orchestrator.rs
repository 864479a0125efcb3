//! Launch sequencing.
//!
//! One run walks `Idle -> AwaitingWarmup -> ResolvingParameters ->
//! BuildingDestination -> Launching` and ends in `Succeeded` or `Failed`.
//! There are no back-edges and no retries. The warm-up waits must finish
//! before the app-control call so the shell's modifications are active when
//! the video app starts.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use tokio::time::{sleep, timeout};
use tracing::{debug, error, info};

use crate::config::LauncherConfig;
use crate::destination::{Destination, DestinationBuilder};
use crate::diagnostics::ReadySignal;
use crate::error::{LaunchError, Result};
use crate::host::{AppControlHost, AppControlRequest, ShellView};
use crate::reporter::StatusReporter;
use crate::resolver::{ResolvedIntent, resolve};

pub const STATUS_LOADING: &str = "Loading launcher modifications...";
pub const STATUS_LAUNCHING: &str = "Launching enhanced video app...";
pub const STATUS_LAUNCHED: &str = "Video app launched with modifications active!";
pub const ERROR_NOT_INSTALLED: &str = "Failed to launch video app. Is it installed?";
pub const ERROR_PREFIX: &str = "Failed to launch";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchPhase {
    Idle,
    AwaitingWarmup,
    ResolvingParameters,
    BuildingDestination,
    Launching,
    Succeeded,
    Failed,
}

impl LaunchPhase {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::AwaitingWarmup => "awaiting_warmup",
            Self::ResolvingParameters => "resolving_parameters",
            Self::BuildingDestination => "building_destination",
            Self::Launching => "launching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchOutcome {
    Succeeded,
    Failed(LaunchError),
}

impl LaunchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    pub fn reason(&self) -> Option<String> {
        match self {
            Self::Succeeded => None,
            Self::Failed(error) => Some(error.to_string()),
        }
    }
}

/// Everything one run produced.
#[derive(Debug, Clone)]
pub struct LaunchReport {
    pub outcome: LaunchOutcome,
    pub intent: Option<ResolvedIntent>,
    pub destination: Option<Destination>,
    /// Phases in the order they were entered, starting after `Idle`.
    pub phases: Vec<LaunchPhase>,
}

pub struct LaunchOrchestrator {
    config: LauncherConfig,
    builder: DestinationBuilder,
    host: Arc<dyn AppControlHost>,
    reporter: StatusReporter,
    phase: LaunchPhase,
    phases: Vec<LaunchPhase>,
    intent: Option<ResolvedIntent>,
    destination: Option<Destination>,
}

impl LaunchOrchestrator {
    pub fn new(
        config: LauncherConfig,
        host: Arc<dyn AppControlHost>,
        view: Arc<dyn ShellView>,
    ) -> Self {
        let builder = DestinationBuilder::new(config.base_address.clone());
        Self {
            config,
            builder,
            host,
            reporter: StatusReporter::new(view),
            phase: LaunchPhase::Idle,
            phases: Vec::new(),
            intent: None,
            destination: None,
        }
    }

    /// Run the whole launch sequence once. Consumes the orchestrator.
    pub async fn run(mut self) -> LaunchReport {
        info!(
            target_app = %self.config.target_app_id,
            base_address = %self.config.base_address,
            "starting launcher"
        );

        let result = match AssertUnwindSafe(self.launch()).catch_unwind().await {
            Ok(result) => result,
            Err(payload) => Err(LaunchError::Panicked(panic_message(&*payload))),
        };

        let outcome = match result {
            Ok(()) => {
                self.transition(LaunchPhase::Succeeded);
                self.reporter.status(STATUS_LAUNCHED);
                self.reporter.hide_spinner();
                self.reporter
                    .dismiss(self.config.dismiss_delay, self.config.fade_out)
                    .await;
                LaunchOutcome::Succeeded
            }
            Err(launch_error) => {
                self.transition(LaunchPhase::Failed);
                match &launch_error {
                    LaunchError::Rejected(reason) => {
                        error!(%reason, "app control rejected the launch");
                        self.reporter.error(ERROR_NOT_INSTALLED);
                    }
                    other => {
                        self.reporter.error(&format!("{ERROR_PREFIX}: {other}"));
                    }
                }
                LaunchOutcome::Failed(launch_error)
            }
        };

        LaunchReport {
            outcome,
            intent: self.intent,
            destination: self.destination,
            phases: self.phases,
        }
    }

    async fn launch(&mut self) -> Result<()> {
        self.transition(LaunchPhase::AwaitingWarmup);
        self.reporter.status(STATUS_LOADING);
        sleep(self.config.warmup_initial).await;
        self.reporter.status(STATUS_LAUNCHING);
        sleep(self.config.warmup_settle).await;

        self.transition(LaunchPhase::ResolvingParameters);
        let intent = self.resolve_intent();

        self.transition(LaunchPhase::BuildingDestination);
        let destination = self.builder.build(&intent);
        self.intent = Some(intent);
        self.destination = Some(destination.clone());

        self.transition(LaunchPhase::Launching);
        info!(%destination, app_id = %self.config.target_app_id, "launching video app");
        let request = AppControlRequest {
            app_id: self.config.target_app_id.clone(),
            operation: self.config.app_control_operation.clone(),
            uri: destination,
        };
        let receiver = self.host.launch_app_control(request).await?;

        match self.config.launch_timeout {
            Some(limit) => timeout(limit, receiver.wait())
                .await
                .map_err(|_| LaunchError::TimedOut(limit))?,
            None => receiver.wait().await,
        }
    }

    // A host that cannot report app-control data is treated as a bare start.
    fn resolve_intent(&self) -> ResolvedIntent {
        let record = match self.host.requested_launch_record() {
            Ok(record) => record,
            Err(error) => {
                info!(%error, "no launch parameters detected");
                None
            }
        };
        let intent = resolve(record.as_ref());
        if !intent.is_none() {
            info!(?intent, "launch parameters detected");
        }
        intent
    }

    fn transition(&mut self, next: LaunchPhase) {
        debug!(from = self.phase.as_str(), to = next.as_str(), "launch phase");
        self.phase = next;
        self.phases.push(next);
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Wait for the environment-ready signal, then run once. Returns `None` if
/// the signal is dropped without firing.
pub async fn launch_on_ready(
    ready: ReadySignal,
    orchestrator: LaunchOrchestrator,
) -> Option<LaunchReport> {
    if !ready.wait().await {
        info!("ready signal dropped before firing; launcher not started");
        return None;
    }
    Some(orchestrator.run().await)
}
