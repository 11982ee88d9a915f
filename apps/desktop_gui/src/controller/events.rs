//! Backend-to-UI events and error modeling for the roster controller.

use signup_client::{ClientError, FailureClass, Operation};
use signup_shared::domain::{Activity, ActivityName, Roster};

#[derive(Debug)]
pub enum UiEvent {
    RosterLoaded {
        generation: u64,
        roster: Roster,
    },
    RosterLoadFailed {
        generation: u64,
        error: UiError,
    },
    SignupSucceeded {
        activity: ActivityName,
        message: Option<String>,
    },
    SignupFailed(UiError),
    ParticipantRemoved {
        activity: ActivityName,
        email: String,
        message: Option<String>,
    },
    AvailabilityRefreshed {
        activity: ActivityName,
        current: Activity,
    },
    RemoveFailed(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Transport,
    Rejected,
    Queue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    LoadRoster,
    Signup,
    RemoveParticipant,
    CommandQueue,
}

impl UiErrorContext {
    fn operation(self) -> Option<Operation> {
        match self {
            UiErrorContext::LoadRoster => Some(Operation::LoadRoster),
            UiErrorContext::Signup => Some(Operation::Signup),
            UiErrorContext::RemoveParticipant => Some(Operation::RemoveParticipant),
            UiErrorContext::CommandQueue => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_client_error(context: UiErrorContext, err: &ClientError) -> Self {
        let category = match err.class() {
            FailureClass::Rejected => UiErrorCategory::Rejected,
            FailureClass::Transport => UiErrorCategory::Transport,
        };
        let message = match context.operation() {
            Some(operation) => err.user_message(operation),
            None => err.to_string(),
        };
        Self {
            category,
            context,
            message,
        }
    }

    pub fn queue(message: impl Into<String>) -> Self {
        Self {
            category: UiErrorCategory::Queue,
            context: UiErrorContext::CommandQueue,
            message: message.into(),
        }
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
