use serde::{Deserialize, Serialize};

use crate::domain::ActivityName;

pub const ACTIVITIES_SEGMENT: &str = "activities";
pub const SIGNUP_SEGMENT: &str = "signup";
pub const EMAIL_QUERY_KEY: &str = "email";

/// Success body of the signup and unregister endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    pub fn text_or(&self, fallback: &str) -> String {
        match self.message.as_deref() {
            Some(message) if !message.is_empty() => message.to_string(),
            _ => fallback.to_string(),
        }
    }
}

/// Unencoded path segments of `/activities`.
pub fn activities_path() -> [&'static str; 1] {
    [ACTIVITIES_SEGMENT]
}

/// Unencoded path segments of `/activities/{name}/signup`; callers
/// percent-encode each segment when building the URL.
pub fn signup_path(activity: &ActivityName) -> [&str; 3] {
    [ACTIVITIES_SEGMENT, activity.as_str(), SIGNUP_SEGMENT]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_falls_back_when_missing_or_empty() {
        assert_eq!(MessageResponse::default().text_or("Participant removed"), "Participant removed");
        assert_eq!(MessageResponse::new("").text_or("fallback"), "fallback");
        assert_eq!(
            MessageResponse::new("Signed up a@x.com").text_or("fallback"),
            "Signed up a@x.com"
        );
    }

    #[test]
    fn signup_path_keeps_name_as_single_segment() {
        let name = ActivityName::from("Chess Club/Advanced");
        assert_eq!(signup_path(&name), ["activities", "Chess Club/Advanced", "signup"]);
    }
}
