use std::{fs, path::Path, time::Duration};

use serde::Deserialize;
use tracing::warn;

pub const SETTINGS_FILE: &str = "signup.toml";

const MESSAGE_HIDE_AFTER_SECS_RANGE: (u64, u64) = (1, 3_600);
const REQUEST_TIMEOUT_SECS_RANGE: (u64, u64) = (1, 300);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub server_url: String,
    pub message_hide_after_secs: u64,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:8000".into(),
            message_hide_after_secs: 5,
            request_timeout_secs: 10,
        }
    }
}

impl ClientSettings {
    pub fn message_hide_after(&self) -> Duration {
        Duration::from_secs(self.message_hide_after_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn with_server_url(mut self, server_url: &str) -> Self {
        self.server_url = normalize_server_url(server_url);
        self
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    message_hide_after_secs: Option<u64>,
    request_timeout_secs: Option<u64>,
}

/// Defaults, then `signup.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    let raw = fs::read_to_string(Path::new(SETTINGS_FILE)).ok();
    resolve_settings(raw.as_deref(), |key| std::env::var(key).ok())
}

pub fn resolve_settings(
    file_contents: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Some(raw) = file_contents {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.server_url {
                    settings.server_url = v;
                }
                if let Some(v) = file_cfg.message_hide_after_secs {
                    settings.message_hide_after_secs = v;
                }
                if let Some(v) = file_cfg.request_timeout_secs {
                    settings.request_timeout_secs = v;
                }
            }
            Err(err) => warn!("ignoring unreadable {SETTINGS_FILE}: {err}"),
        }
    }

    if let Some(v) = env("SIGNUP_SERVER_URL") {
        settings.server_url = v;
    }
    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    if let Some(v) = env("APP__MESSAGE_HIDE_AFTER_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.message_hide_after_secs = parsed;
        }
    }
    if let Some(v) = env("APP__REQUEST_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.request_timeout_secs = parsed;
        }
    }

    settings.server_url = normalize_server_url(&settings.server_url);
    settings.message_hide_after_secs = clamp_secs(
        "message_hide_after_secs",
        settings.message_hide_after_secs,
        MESSAGE_HIDE_AFTER_SECS_RANGE,
    );
    settings.request_timeout_secs = clamp_secs(
        "request_timeout_secs",
        settings.request_timeout_secs,
        REQUEST_TIMEOUT_SECS_RANGE,
    );
    settings
}

fn clamp_secs(name: &str, value: u64, (min, max): (u64, u64)) -> u64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        warn!("{name} = {value} is out of range; using {clamped}");
    }
    clamped
}

fn normalize_server_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return ClientSettings::default().server_url;
    }
    trimmed.to_string()
}
