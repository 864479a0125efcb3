#![allow(clippy::print_stdout)]

mod host;
mod view;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use launch_core::{
    DiagnosticsSink, HostError, LaunchOrchestrator, LaunchRecord, LaunchReport, LauncherConfig,
    launch_on_ready, ready_signal,
};
use tokio::task::JoinError;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::host::{ReplyMode, SimulatedHost};
use crate::view::ConsoleView;

#[derive(Parser, Debug)]
#[command(
    name = "tv-launcher",
    about = "Run the TV shell launch sequence against a simulated app-control host"
)]
struct Args {
    /// TOML configuration file. `TV_LAUNCHER_*` variables override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON file holding the launch record (`[{"key": .., "value": [..]}]`).
    #[arg(long, conflicts_with_all = ["record_json", "no_record"])]
    record: Option<PathBuf>,

    /// Inline JSON launch record.
    #[arg(long, conflicts_with = "no_record")]
    record_json: Option<String>,

    /// Simulate a host that cannot report its launch record.
    #[arg(long)]
    no_record: bool,

    /// How the simulated host answers the launch request.
    #[arg(long, value_enum, default_value_t = ReplyMode::Succeed)]
    host_reply: ReplyMode,

    /// Delay before the simulated host answers.
    #[arg(long, default_value_t = 0)]
    reply_after_ms: u64,

    /// Failure reason reported when `--host-reply fail` is used.
    #[arg(long, default_value = "NotFoundError")]
    fail_reason: String,

    /// Make the launch call fail immediately with this message.
    #[arg(long)]
    host_fault: Option<String>,
}

impl Args {
    fn launch_record(&self) -> Result<Result<Option<LaunchRecord>, HostError>> {
        if self.no_record {
            return Ok(Err(HostError::Unavailable));
        }
        if let Some(path) = &self.record {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read launch record {}", path.display()))?;
            let record = LaunchRecord::from_json_str(&raw)
                .with_context(|| format!("invalid launch record in {}", path.display()))?;
            return Ok(Ok(Some(record)));
        }
        if let Some(raw) = &self.record_json {
            let record = LaunchRecord::from_json_str(raw).context("invalid inline launch record")?;
            return Ok(Ok(Some(record)));
        }
        Ok(Ok(None))
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = LauncherConfig::load(args.config.as_deref()).context("failed to load config")?;
    let record = args.launch_record()?;

    let (diagnostics, diagnostics_task) = DiagnosticsSink::spawn();
    let panic_sink = diagnostics.clone();
    std::panic::set_hook(Box::new(move |panic_info| {
        panic_sink.record(panic_info.to_string());
    }));

    let host = SimulatedHost::new(record, args.host_reply)
        .with_reply_after(Duration::from_millis(args.reply_after_ms))
        .with_fail_reason(args.fail_reason.clone())
        .with_fault(args.host_fault.clone());
    let orchestrator =
        LaunchOrchestrator::new(config, Arc::new(host), Arc::new(ConsoleView));

    let (trigger, signal) = ready_signal();
    let run = tokio::spawn(launch_on_ready(signal, orchestrator));
    info!("environment ready");
    trigger.fire();

    let joined = run.await;
    if let Err(join_error) = &joined {
        record_join_failure(&diagnostics, join_error);
    }

    // Release the hook's sink so the logger can drain and stop.
    drop(std::panic::take_hook());
    drop(diagnostics);
    let logged = diagnostics_task.await.unwrap_or_default();
    if logged > 0 {
        info!(logged, "diagnostics recorded uncaught errors");
    }

    let report = match joined {
        Ok(Some(report)) => report,
        Ok(None) => {
            println!("outcome: not started");
            return Ok(ExitCode::FAILURE);
        }
        Err(join_error) => {
            println!("outcome: aborted ({join_error})");
            return Ok(ExitCode::FAILURE);
        }
    };
    print_report(&report);
    Ok(if report.outcome.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Panics already reach diagnostics through the panic hook, so only
/// cancellations are recorded here. Returns whether anything was recorded.
fn record_join_failure(diagnostics: &DiagnosticsSink, join_error: &JoinError) -> bool {
    if join_error.is_panic() {
        return false;
    }
    diagnostics.record(join_error.to_string());
    true
}

fn print_report(report: &LaunchReport) {
    match report.outcome.reason() {
        None => println!("outcome: succeeded"),
        Some(reason) => println!("outcome: failed ({reason})"),
    }
    if let Some(destination) = &report.destination {
        println!("destination: {destination}");
    }
    if let Some(intent) = &report.intent {
        println!("intent: {intent:?}");
    }
    let phases: Vec<&str> = report.phases.iter().map(|phase| phase.as_str()).collect();
    println!("phases: {}", phases.join(" -> "));
}
