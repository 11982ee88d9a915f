//! Reducer-like state transitions for the roster window.
//!
//! All rendered state lives here and is only touched from the UI thread.
//! Each transition may ask for one follow-up backend command.

use std::time::{Duration, Instant};

use signup_client::{MessageBanner, RosterView};
use signup_shared::domain::ActivityName;
use tracing::{debug, error, warn};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

const SIGNUP_FALLBACK_MESSAGE: &str = "Signup successful";
const REMOVE_FALLBACK_MESSAGE: &str = "Participant removed";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub email: String,
    pub activity: Option<ActivityName>,
}

impl SignupForm {
    pub fn reset(&mut self) {
        self.email.clear();
        self.activity = None;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRemoval {
    pub activity: ActivityName,
    pub email: String,
}

impl PendingRemoval {
    pub fn prompt(&self) -> String {
        format!("Unregister {} from {}?", self.email, self.activity)
    }
}

pub struct RosterState {
    pub view: RosterView,
    pub banner: MessageBanner,
    pub form: SignupForm,
    pending_removal: Option<PendingRemoval>,
    roster_generation: u64,
}

impl RosterState {
    pub fn new(message_hide_after: Duration) -> Self {
        Self {
            view: RosterView::new(),
            banner: MessageBanner::new(message_hide_after),
            form: SignupForm::default(),
            pending_removal: None,
            roster_generation: 0,
        }
    }

    /// Starts a fresh roster load. Responses to earlier loads are dropped
    /// once this one has been issued.
    pub fn request_roster(&mut self) -> BackendCommand {
        self.roster_generation += 1;
        BackendCommand::LoadRoster {
            generation: self.roster_generation,
        }
    }

    /// Returns `None` without any message when the form lacks an email or
    /// an activity.
    pub fn submit_signup(&mut self) -> Option<BackendCommand> {
        let email = self.form.email.trim();
        let Some(activity) = self.form.activity.clone() else {
            debug!("signup ignored: no activity selected");
            return None;
        };
        if email.is_empty() {
            debug!("signup ignored: empty email");
            return None;
        }
        Some(BackendCommand::Signup {
            activity,
            email: email.to_string(),
        })
    }

    /// Opens the confirmation prompt for removing `email` from `activity`.
    /// Ignored when the rendered card has no such row.
    pub fn request_removal(&mut self, activity: ActivityName, email: String) {
        let listed = self
            .view
            .cards()
            .iter()
            .any(|card| card.name == activity && card.participants.rows().contains(&email));
        if !listed {
            debug!(activity = %activity, "removal ignored: participant not rendered");
            return;
        }
        self.pending_removal = Some(PendingRemoval { activity, email });
    }

    pub fn pending_removal(&self) -> Option<&PendingRemoval> {
        self.pending_removal.as_ref()
    }

    pub fn confirm_removal(&mut self) -> Option<BackendCommand> {
        self.pending_removal
            .take()
            .map(|pending| BackendCommand::RemoveParticipant {
                activity: pending.activity,
                email: pending.email,
            })
    }

    pub fn cancel_removal(&mut self) {
        self.pending_removal = None;
    }

    pub fn apply(&mut self, event: UiEvent, now: Instant) -> Option<BackendCommand> {
        match event {
            UiEvent::RosterLoaded { generation, roster } => {
                if generation < self.roster_generation {
                    debug!(generation, latest = self.roster_generation, "dropping stale roster");
                    return None;
                }
                self.view.render(&roster);
                if let Some(selected) = &self.form.activity {
                    if !self.view.has_option(selected) {
                        self.form.activity = None;
                    }
                }
                None
            }
            UiEvent::RosterLoadFailed { generation, error } => {
                if generation < self.roster_generation {
                    debug!(generation, latest = self.roster_generation, "dropping stale roster failure");
                    return None;
                }
                error!(
                    category = ?error.category(),
                    context = ?error.context(),
                    "error fetching activities: {}",
                    error.message()
                );
                self.view.render_failure();
                None
            }
            UiEvent::SignupSucceeded { activity, message } => {
                debug!(activity = %activity, "signup confirmed; refreshing roster");
                self.banner.show_success(
                    message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| SIGNUP_FALLBACK_MESSAGE.to_string()),
                    now,
                );
                self.form.reset();
                Some(self.request_roster())
            }
            UiEvent::SignupFailed(error) => {
                self.banner.show_error(error.message(), now);
                None
            }
            UiEvent::ParticipantRemoved {
                activity,
                email,
                message,
            } => {
                match self.view.card_mut(&activity) {
                    Some(card) => {
                        card.remove_participant(&email);
                    }
                    None => warn!(activity = %activity, "removed participant from unrendered activity"),
                }
                self.banner.show_success(
                    message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| REMOVE_FALLBACK_MESSAGE.to_string()),
                    now,
                );
                None
            }
            UiEvent::AvailabilityRefreshed { activity, current } => {
                if let Some(card) = self.view.card_mut(&activity) {
                    card.refresh_availability(&current);
                }
                None
            }
            UiEvent::RemoveFailed(error) => {
                self.banner.show_error(error.message(), now);
                None
            }
        }
    }
}
