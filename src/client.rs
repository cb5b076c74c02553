use log::{debug, warn};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::ClientConfig;
use crate::error::Error;
use crate::payload::{
    ApiErrorBody, CaseRecord, FollowUpAnalysis, FollowUpRequest, HealthStatus, HistoryPage,
    MessageBody, RecommendationPayload, RecommendationRequest, TimelineEntry,
};
use crate::session::Session;

/// Shown when a failed recommendation call carries no error message.
const RECOMMEND_FAILED: &str = "Failed to get recommendations";

fn recommend_path(detailed: bool) -> &'static str {
    if detailed {
        "/recommend/detailed"
    } else {
        "/recommend"
    }
}

fn feedback_path(case_id: u64) -> String {
    format!("/recommend/feedback/{case_id}")
}

fn history_path(page: u32, size: u32) -> String {
    format!("/history?page={page}&size={size}")
}

fn history_entry_path(id: u64) -> String {
    format!("/history/{id}")
}

fn timeline_path(case_id: u64) -> String {
    format!("/cases/{case_id}/timeline")
}

/// Turn a status and body into a typed result.
///
/// Non-2xx responses become `Error::Api` with the body's `error` field, or
/// `fallback`, or a generic status message.
fn read_response<T: DeserializeOwned>(
    status: u16,
    body: &str,
    fallback: Option<&str>,
) -> Result<T, Error> {
    if !(200..300).contains(&status) {
        let err = api_error(status, body, fallback);
        warn!("{err}");
        return Err(err);
    }
    serde_json::from_str(body).map_err(|e| Error::InvalidResponse {
        reason: format!("failed to parse response: {e}"),
    })
}

fn api_error(status: u16, body: &str, fallback: Option<&str>) -> Error {
    let message = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|m| !m.trim().is_empty())
        .or_else(|| fallback.map(str::to_string))
        .unwrap_or_else(|| format!("request failed with status {status}"));
    Error::Api { status, message }
}

fn transport_error(e: impl std::fmt::Display) -> Error {
    Error::Transport {
        reason: e.to_string(),
    }
}

/// Blocking client for the recommendation API.
///
/// # Example
///
/// ```no_run
/// use foodrec::{ApiClient, ClientConfig, RecommendationRequest};
///
/// let client = ApiClient::new(ClientConfig::default());
/// let payload = client.recommend(&RecommendationRequest::new("Gastritis"))?;
/// # Ok::<(), foodrec::Error>(())
/// ```
pub struct ApiClient {
    agent: ureq::Agent,
    config: ClientConfig,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(config.timeout))
            .http_status_as_error(false)
            .build()
            .into();
        Self { agent, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn health(&self) -> Result<HealthStatus, Error> {
        self.get("/health", None)
    }

    /// Ask for a recommendation. The backend enriches the prompt with the
    /// caller's profile when a user is logged in.
    pub fn recommend(&self, request: &RecommendationRequest) -> Result<RecommendationPayload, Error> {
        request.validate()?;
        self.post(recommend_path(false), request, Some(RECOMMEND_FAILED))
    }

    pub fn recommend_detailed(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationPayload, Error> {
        request.validate()?;
        self.post(recommend_path(true), request, Some(RECOMMEND_FAILED))
    }

    /// Report how the patient is doing on the session's case.
    pub fn submit_feedback(
        &self,
        session: &Session,
        request: &FollowUpRequest,
    ) -> Result<FollowUpAnalysis, Error> {
        let case_id = session.case_id()?;
        request.validate()?;
        self.post(&feedback_path(case_id), request, None)
    }

    pub fn history(&self, page: u32, size: u32) -> Result<HistoryPage, Error> {
        self.get(&history_path(page, size), None)
    }

    pub fn history_entry(&self, id: u64) -> Result<CaseRecord, Error> {
        self.get(&history_entry_path(id), None)
    }

    /// Delete a stored recommendation. Returns the server's confirmation.
    pub fn delete_history_entry(&self, id: u64) -> Result<String, Error> {
        let url = self.config.endpoint(&history_entry_path(id));
        debug!("DELETE {url}");
        let response = self.agent.delete(&url).call().map_err(transport_error)?;
        let body: MessageBody = self.finish(response, None)?;
        Ok(body.message.unwrap_or_else(|| "Deleted".to_string()))
    }

    /// Cases of the logged-in user.
    pub fn cases(&self) -> Result<Vec<CaseRecord>, Error> {
        self.get("/cases", None)
    }

    pub fn timeline(&self, case_id: u64) -> Result<Vec<TimelineEntry>, Error> {
        self.get(&timeline_path(case_id), None)
    }

    /// A session pointing at the most recent case in the history.
    pub fn latest_session(&self) -> Result<Session, Error> {
        Ok(Session::latest(&self.history(0, 1)?))
    }

    fn get<T: DeserializeOwned>(&self, path: &str, fallback: Option<&str>) -> Result<T, Error> {
        let url = self.config.endpoint(path);
        debug!("GET {url}");
        let response = self.agent.get(&url).call().map_err(transport_error)?;
        self.finish(response, fallback)
    }

    fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.config.endpoint(path);
        let json_body = serde_json::to_string(body)?;
        debug!("POST {url}");
        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .send(json_body.as_bytes())
            .map_err(transport_error)?;
        self.finish(response, fallback)
    }

    fn finish<T: DeserializeOwned>(
        &self,
        response: ureq::http::Response<ureq::Body>,
        fallback: Option<&str>,
    ) -> Result<T, Error> {
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_string()
            .map_err(|e| Error::Transport {
                reason: format!("failed to read response body: {e}"),
            })?;
        read_response(status, &body, fallback)
    }
}

/// Async client for the recommendation API, built on `reqwest`.
///
/// Requires the `async` feature flag.
#[cfg(feature = "async")]
pub struct AsyncApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

#[cfg(feature = "async")]
impl std::fmt::Debug for AsyncApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AsyncApiClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish()
    }
}

#[cfg(feature = "async")]
impl AsyncApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Transport {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub async fn health(&self) -> Result<HealthStatus, Error> {
        self.get("/health", None).await
    }

    pub async fn recommend(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationPayload, Error> {
        request.validate()?;
        self.post(recommend_path(false), request, Some(RECOMMEND_FAILED))
            .await
    }

    pub async fn recommend_detailed(
        &self,
        request: &RecommendationRequest,
    ) -> Result<RecommendationPayload, Error> {
        request.validate()?;
        self.post(recommend_path(true), request, Some(RECOMMEND_FAILED))
            .await
    }

    pub async fn submit_feedback(
        &self,
        session: &Session,
        request: &FollowUpRequest,
    ) -> Result<FollowUpAnalysis, Error> {
        let case_id = session.case_id()?;
        request.validate()?;
        self.post(&feedback_path(case_id), request, None).await
    }

    pub async fn history(&self, page: u32, size: u32) -> Result<HistoryPage, Error> {
        self.get(&history_path(page, size), None).await
    }

    pub async fn history_entry(&self, id: u64) -> Result<CaseRecord, Error> {
        self.get(&history_entry_path(id), None).await
    }

    pub async fn delete_history_entry(&self, id: u64) -> Result<String, Error> {
        let url = self.config.endpoint(&history_entry_path(id));
        debug!("DELETE {url}");
        let response = self
            .client
            .delete(&url)
            .send()
            .await
            .map_err(transport_error)?;
        let body: MessageBody = Self::finish(response, None).await?;
        Ok(body.message.unwrap_or_else(|| "Deleted".to_string()))
    }

    pub async fn cases(&self) -> Result<Vec<CaseRecord>, Error> {
        self.get("/cases", None).await
    }

    pub async fn timeline(&self, case_id: u64) -> Result<Vec<TimelineEntry>, Error> {
        self.get(&timeline_path(case_id), None).await
    }

    pub async fn latest_session(&self) -> Result<Session, Error> {
        Ok(Session::latest(&self.history(0, 1).await?))
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        fallback: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.config.endpoint(path);
        debug!("GET {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(transport_error)?;
        Self::finish(response, fallback).await
    }

    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        fallback: Option<&str>,
    ) -> Result<T, Error> {
        let url = self.config.endpoint(path);
        debug!("POST {url}");
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;
        Self::finish(response, fallback).await
    }

    async fn finish<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: Option<&str>,
    ) -> Result<T, Error> {
        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Error::Transport {
            reason: format!("failed to read response body: {e}"),
        })?;
        read_response(status, &body, fallback)
    }
}
