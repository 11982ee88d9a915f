use async_trait::async_trait;
use reqwest::{Client, Response};
use signup_shared::{
    domain::{ActivityName, Roster},
    error::{ApiRejection, ErrorDetail},
    protocol::{activities_path, signup_path, MessageResponse, EMAIL_QUERY_KEY},
};
use tracing::{debug, info, warn};
use url::Url;

pub mod banner;
pub mod config;
pub mod error;
pub mod view;

pub use banner::{BannerState, MessageBanner};
pub use config::{load_settings, ClientSettings};
pub use error::{ClientError, FailureClass, Operation};
pub use view::{ActivityCard, ListView, ParticipantsView, RosterView, SelectorOption};

pub type Result<T> = std::result::Result<T, ClientError>;

/// The three backend calls the roster controller depends on.
#[async_trait]
pub trait SignupApi: Send + Sync {
    async fn list_activities(&self) -> Result<Roster>;
    async fn signup(&self, activity: &ActivityName, email: &str) -> Result<MessageResponse>;
    async fn unregister(&self, activity: &ActivityName, email: &str) -> Result<MessageResponse>;
}

#[derive(Debug, Clone)]
pub struct SignupClient {
    http: Client,
    server_url: Url,
}

impl SignupClient {
    pub fn new(server_url: &str) -> Result<Self> {
        Self::with_http(server_url, Client::new())
    }

    pub fn from_settings(settings: &ClientSettings) -> Result<Self> {
        let http = Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Self::with_http(&settings.server_url, http)
    }

    fn with_http(server_url: &str, http: Client) -> Result<Self> {
        let server_url = Url::parse(server_url).map_err(|source| ClientError::InvalidServerUrl {
            url: server_url.to_string(),
            source,
        })?;
        if server_url.cannot_be_a_base() {
            return Err(ClientError::UnsupportedServerUrl(server_url.to_string()));
        }
        Ok(Self { http, server_url })
    }

    /// Appends percent-encoded `segments` to the server URL, keeping any
    /// path prefix the server URL already carries.
    fn endpoint<'a>(&self, segments: impl IntoIterator<Item = &'a str>) -> Result<Url> {
        let mut url = self.server_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::UnsupportedServerUrl(self.server_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn activities_url(&self) -> Result<Url> {
        self.endpoint(activities_path())
    }

    pub fn signup_url(&self, activity: &ActivityName, email: &str) -> Result<Url> {
        let mut url = self.endpoint(signup_path(activity))?;
        url.query_pairs_mut().append_pair(EMAIL_QUERY_KEY, email);
        Ok(url)
    }
}

/// Maps a signup/unregister response onto the backend's `{message}` /
/// `{detail}` contract.
async fn read_outcome(response: Response) -> Result<MessageResponse> {
    let status = response.status();
    let body = response.bytes().await?;
    if status.is_success() {
        return Ok(serde_json::from_slice::<MessageResponse>(&body)?);
    }

    let detail: ErrorDetail = serde_json::from_slice(&body)?;
    Err(ApiRejection::new(status.as_u16(), detail.text()).into())
}

#[async_trait]
impl SignupApi for SignupClient {
    async fn list_activities(&self) -> Result<Roster> {
        let roster: Roster = self
            .http
            .get(self.activities_url()?)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        debug!(activities = roster.len(), "roster fetched");
        Ok(roster)
    }

    async fn signup(&self, activity: &ActivityName, email: &str) -> Result<MessageResponse> {
        let response = self
            .http
            .post(self.signup_url(activity, email)?)
            .send()
            .await?;
        let outcome = read_outcome(response).await;
        match &outcome {
            Ok(_) => info!(activity = %activity, "signup accepted"),
            Err(err) => warn!(activity = %activity, status = ?err.status(), "signup failed: {err}"),
        }
        outcome
    }

    async fn unregister(&self, activity: &ActivityName, email: &str) -> Result<MessageResponse> {
        let response = self
            .http
            .delete(self.signup_url(activity, email)?)
            .send()
            .await?;
        let outcome = read_outcome(response).await;
        match &outcome {
            Ok(_) => info!(activity = %activity, "participant unregistered"),
            Err(err) => warn!(activity = %activity, status = ?err.status(), "unregister failed: {err}"),
        }
        outcome
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
