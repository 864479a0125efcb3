//! Single writer for the launcher's status and error surfaces.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, info};

use crate::host::{ShellView, Surface};

/// Status text shown while the error surface carries the details.
pub const ERROR_STATUS_TEXT: &str = "Error occurred";

#[derive(Clone)]
pub struct StatusReporter {
    view: Arc<dyn ShellView>,
}

impl StatusReporter {
    pub fn new(view: Arc<dyn ShellView>) -> Self {
        Self { view }
    }

    pub fn report(&self, message: &str, is_error: bool) {
        if is_error {
            self.error(message);
        } else {
            self.status(message);
        }
    }

    pub fn status(&self, message: &str) {
        self.view.set_text(Surface::Status, message);
        info!(status = message, "launcher status");
    }

    pub fn error(&self, message: &str) {
        self.status(ERROR_STATUS_TEXT);
        self.view.set_text(Surface::Error, message);
        self.view.set_shown(Surface::Error, true);
        self.hide_spinner();
        error!(error = message, "launcher error");
    }

    pub fn hide_spinner(&self) {
        self.view.set_shown(Surface::Spinner, false);
    }

    /// Fade the shell out after `delay`, then remove it once `fade_out` has elapsed.
    pub async fn dismiss(&self, delay: Duration, fade_out: Duration) {
        sleep(delay).await;
        debug!("fading out launcher shell");
        self.view.set_opacity(Surface::Shell, 0.0);
        sleep(fade_out).await;
        self.view.set_shown(Surface::Shell, false);
        debug!("launcher shell removed");
    }
}
