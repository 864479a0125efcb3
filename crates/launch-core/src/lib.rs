//! Launch core for the TV shell launcher.
//!
//! The shell waits for its in-page modifications to settle, then hands control
//! to the native video app through the host's app-control facility:
//! - resolve deep-link intent from the host launch record
//! - build the destination address for the video surface
//! - sequence warm-up, handoff and dismissal with fixed timings
//! - report status and errors to a single view surface

pub mod config;
pub mod destination;
pub mod diagnostics;
pub mod error;
pub mod host;
pub mod orchestrator;
pub mod record;
pub mod reporter;
pub mod resolver;

pub use config::{ConfigError, LauncherConfig};
pub use destination::{Destination, DestinationBuilder};
pub use diagnostics::{DiagnosticsSink, ReadySignal, ReadyTrigger, ready_signal};
pub use error::{HostError, LaunchError, Result};
pub use host::{
    AppControlHost, AppControlRequest, LaunchReply, LaunchReplyReceiver, ShellView, Surface,
    launch_reply_channel,
};
pub use orchestrator::{LaunchOrchestrator, LaunchOutcome, LaunchPhase, LaunchReport, launch_on_ready};
pub use record::{LaunchEntry, LaunchRecord, RecordError};
pub use reporter::StatusReporter;
pub use resolver::{MediaRef, PAYLOAD_KEY, ResolvedIntent, resolve};
