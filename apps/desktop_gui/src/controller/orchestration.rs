//! Command orchestration helpers from UI actions to backend command queue.

use std::time::Instant;

use crossbeam_channel::{Sender, TrySendError};
use signup_client::MessageBanner;

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiError;

pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
    banner: &mut MessageBanner,
    now: Instant,
) {
    let cmd_name = cmd.name();

    let failure = match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            return;
        }
        Err(TrySendError::Full(_)) => UiError::queue("UI command queue is full; please retry"),
        Err(TrySendError::Disconnected(_)) => {
            UiError::queue("Backend worker disconnected; restart the application")
        }
    };
    tracing::warn!(command = cmd_name, "{}", failure.message());
    banner.show_error(failure.message(), now);
}
