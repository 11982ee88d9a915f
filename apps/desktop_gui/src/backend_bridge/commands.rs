//! Backend commands queued from UI to backend worker.

use signup_shared::domain::ActivityName;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    LoadRoster {
        generation: u64,
    },
    Signup {
        activity: ActivityName,
        email: String,
    },
    RemoveParticipant {
        activity: ActivityName,
        email: String,
    },
}

/// Identity of an in-flight operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionKey {
    LoadRoster,
    Signup { activity: ActivityName, email: String },
    Remove { activity: ActivityName, email: String },
}

impl ActionKey {
    /// Reads are replaced by a newer command with the same key. Mutations
    /// are not: once sent, the server may already have applied them, so the
    /// first request keeps running and a repeat is dropped.
    pub fn supersedes(&self) -> bool {
        matches!(self, ActionKey::LoadRoster)
    }
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::LoadRoster { .. } => "load_roster",
            BackendCommand::Signup { .. } => "signup",
            BackendCommand::RemoveParticipant { .. } => "remove_participant",
        }
    }

    pub fn action_key(&self) -> ActionKey {
        match self {
            BackendCommand::LoadRoster { .. } => ActionKey::LoadRoster,
            BackendCommand::Signup { activity, email } => ActionKey::Signup {
                activity: activity.clone(),
                email: email.clone(),
            },
            BackendCommand::RemoveParticipant { activity, email } => ActionKey::Remove {
                activity: activity.clone(),
                email: email.clone(),
            },
        }
    }
}
