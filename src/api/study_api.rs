//! StudyNest REST API - request layer
//!
//! Core authenticated client: JSON encoding, bearer-token attachment and
//! the single-shot refresh-and-retry recovery for expired access tokens,
//! plus the typed endpoint wrappers.

pub mod model;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode, header};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::storage::TokenStore;
use model::*;

/// Fixed base origin for all API calls, overridable at startup through the
/// environment.
static BASE_URL: Lazy<String> = Lazy::new(|| {
    std::env::var("STUDYNEST_API_URL").unwrap_or_else(|_| "https://api.studynest.app".to_string())
});

const TIMEOUT: u64 = 30;

const REFRESH_PATH: &str = "/auth/refresh";

enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// Authenticated StudyNest API client.
///
/// Cheap to clone; clones share the connection pool and the injected token
/// store. Calls are independent async operations: concurrent 401s may each
/// run their own refresh, which the API tolerates.
#[derive(Clone)]
pub struct StudyApi {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for StudyApi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StudyApi")
            .field("client", &"<HttpClient>")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl StudyApi {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self::with_base_url(BASE_URL.clone(), store)
    }

    pub fn with_base_url(base_url: impl Into<String>, store: Arc<dyn TokenStore>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT))
            .build()
            .expect("failed to build HTTP client");
        Self {
            client,
            base_url: base_url.into(),
            store,
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> String {
        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            let qs = query
                .iter()
                .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            url = format!("{}?{}", url, qs);
        }
        url
    }

    /// Issue a single HTTP call with the standard headers, attaching the
    /// given bearer token when one is present. No recovery logic lives
    /// here; [`request`](Self::request) owns that.
    async fn send(
        &self,
        method: &Method,
        url: &str,
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<reqwest::Response, ApiError> {
        let mut request = match method {
            Method::Get => self.client.get(url),
            Method::Post => self.client.post(url),
            Method::Put => self.client.put(url),
            Method::Delete => self.client.delete(url),
        };
        request = request
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json");
        if let Some(token) = token {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        if let Some(body) = body {
            request = request.json(body);
        }
        request.send().await.map_err(ApiError::from_transport)
    }

    /// Perform one call against the API, recovering at most once from an
    /// expired access token.
    ///
    /// attempt -> on 401: refresh, then a single resend with the new token
    /// -> resolve. The resend goes through [`send`](Self::send) directly,
    /// so a second 401 surfaces as-is; the refresh endpoint itself is
    /// excluded from recovery and can never recurse.
    async fn request(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<reqwest::Response, ApiError> {
        let url = self.url(path, query);
        debug!("{} {}", method.as_str(), path);
        let response = self
            .send(&method, &url, body, self.store.access_token().as_deref())
            .await?;
        if response.status() != StatusCode::UNAUTHORIZED || path == REFRESH_PATH {
            return Ok(response);
        }

        let Some(refresh) = self.store.refresh_token() else {
            return Ok(response);
        };
        debug!("access token rejected on {}, refreshing", path);
        match self.refresh_access_token(&refresh).await {
            Ok(minted) => {
                let access = minted.access.clone();
                self.store_minted(minted);
                self.send(&method, &url, body, Some(&access)).await
            }
            Err(err) => {
                warn!("token refresh failed: {}", err);
                Ok(response)
            }
        }
    }

    /// Exchange the refresh token for new credentials at the refresh
    /// endpoint. Bypasses [`request`](Self::request) so the recovery path
    /// cannot re-enter itself.
    async fn refresh_access_token(&self, refresh: &str) -> Result<MintedTokens, ApiError> {
        let url = self.url(REFRESH_PATH, &[]);
        let body = json!({ "refreshToken": refresh });
        let response = self.send(&Method::Post, &url, Some(&body), None).await?;
        let value = Self::into_json(response).await?;
        to_minted_tokens(&value)
    }

    fn store_minted(&self, minted: MintedTokens) {
        match minted.refresh {
            Some(refresh) => self.store.store_tokens(minted.access, Some(refresh)),
            None => self.store.replace_access(minted.access),
        }
    }

    /// Explicitly refresh the stored session, outside any failed call.
    /// Returns the new access token.
    pub async fn refresh_session(&self) -> Result<String, ApiError> {
        let Some(refresh) = self.store.refresh_token() else {
            return Err(ApiError::Decode("no refresh token stored".to_string()));
        };
        let body = json!({ "refreshToken": refresh });
        let response = self
            .request(Method::Post, REFRESH_PATH, &[], Some(&body))
            .await?;
        let value = Self::into_json(response).await?;
        let minted = to_minted_tokens(&value)?;
        let access = minted.access.clone();
        self.store_minted(minted);
        Ok(access)
    }

    /// Check the status and parse the body as JSON. Empty success bodies
    /// map to `null` for endpoints that answer 204-style.
    async fn into_json(response: reqwest::Response) -> Result<Value, ApiError> {
        let status = response.status();
        let raw = response.text().await.map_err(ApiError::from_transport)?;
        if !status.is_success() {
            return Err(ApiError::from_status(status.as_u16(), &raw));
        }
        if raw.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&raw).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Call an endpoint whose response body is the payload itself.
    async fn fetch<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        let response = self.request(method, path, query, body).await?;
        let value = Self::into_json(response).await?;
        serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Call an endpoint whose response is wrapped in `{ "data": ... }`.
    async fn fetch_enveloped<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&Value>,
    ) -> Result<T, ApiError> {
        Ok(self
            .fetch::<Envelope<T>>(method, path, query, body)
            .await?
            .data)
    }

    /// Call an endpoint whose response body is ignored.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(), ApiError> {
        let response = self.request(method, path, &[], body).await?;
        Self::into_json(response).await.map(|_| ())
    }

    /// Fetch a blob endpoint, returning the status-checked response for
    /// the caller to consume as bytes or as a stream.
    pub(crate) async fn request_blob(&self, path: &str) -> Result<reqwest::Response, ApiError> {
        let response = self.request(Method::Get, path, &[], None).await?;
        let status = response.status();
        if !status.is_success() {
            let raw = response.text().await.map_err(ApiError::from_transport)?;
            return Err(ApiError::from_status(status.as_u16(), &raw));
        }
        Ok(response)
    }

    // ========================================================================
    // Auth
    // ========================================================================

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, ApiError> {
        let body = json!({ "email": email, "password": password });
        self.fetch(Method::Post, "/auth/login", &[], Some(&body))
            .await
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, ApiError> {
        let body = json!({ "name": name, "email": email, "password": password });
        self.fetch(Method::Post, "/auth/register", &[], Some(&body))
            .await
    }

    pub async fn logout(&self) -> Result<(), ApiError> {
        self.execute(Method::Post, "/auth/logout", None).await
    }

    pub async fn current_user(&self) -> Result<UserProfile, ApiError> {
        self.fetch(Method::Get, "/auth/me", &[], None).await
    }

    // ========================================================================
    // Planner
    // ========================================================================

    pub async fn subjects(&self) -> Result<Vec<Subject>, ApiError> {
        self.fetch_enveloped(Method::Get, "/subjects", &[], None)
            .await
    }

    pub async fn create_subject(&self, draft: &SubjectDraft) -> Result<Subject, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.fetch_enveloped(Method::Post, "/subjects", &[], Some(&body))
            .await
    }

    pub async fn update_subject(&self, id: &str, draft: &SubjectDraft) -> Result<Subject, ApiError> {
        let body = serde_json::to_value(draft).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.fetch_enveloped(Method::Put, &format!("/subjects/{}", id), &[], Some(&body))
            .await
    }

    pub async fn delete_subject(&self, id: &str) -> Result<(), ApiError> {
        self.execute(Method::Delete, &format!("/subjects/{}", id), None)
            .await
    }

    /// Planned sessions for one day.
    pub async fn plan_for(&self, date: NaiveDate) -> Result<DayPlan, ApiError> {
        let query = [("date", date.format("%Y-%m-%d").to_string())];
        self.fetch_enveloped(Method::Get, "/plan", &query, None).await
    }

    /// Ask the planner to lay out a day from the available time budget.
    pub async fn generate_plan(&self, request: &PlanRequest) -> Result<DayPlan, ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.fetch_enveloped(Method::Post, "/plan/generate", &[], Some(&body))
            .await
    }

    /// Record a finished focus session; `minutes` is the time actually
    /// studied, which may differ from the planned duration.
    pub async fn complete_session(
        &self,
        id: &str,
        minutes: u32,
    ) -> Result<StudySession, ApiError> {
        let body = json!({ "minutes": minutes });
        self.fetch_enveloped(
            Method::Post,
            &format!("/sessions/{}/complete", id),
            &[],
            Some(&body),
        )
        .await
    }

    pub async fn skip_session(&self, id: &str) -> Result<StudySession, ApiError> {
        self.fetch_enveloped(Method::Post, &format!("/sessions/{}/skip", id), &[], None)
            .await
    }

    // ========================================================================
    // Progress & gamification
    // ========================================================================

    pub async fn progress_summary(&self) -> Result<ProgressSummary, ApiError> {
        self.fetch_enveloped(Method::Get, "/progress", &[], None)
            .await
    }

    pub async fn badges(&self) -> Result<Vec<Badge>, ApiError> {
        self.fetch_enveloped(Method::Get, "/progress/badges", &[], None)
            .await
    }

    // ========================================================================
    // Chat coach
    // ========================================================================

    /// Send a message to the coach; resolves to the coach's reply.
    pub async fn send_chat_message(&self, content: &str) -> Result<ChatMessage, ApiError> {
        let body = json!({ "content": content });
        self.fetch_enveloped(Method::Post, "/coach/chat", &[], Some(&body))
            .await
    }

    pub async fn chat_history(&self, limit: u32) -> Result<Vec<ChatMessage>, ApiError> {
        let query = [("limit", limit.to_string())];
        self.fetch_enveloped(Method::Get, "/coach/history", &query, None)
            .await
    }

    // ========================================================================
    // Lo-fi music
    // ========================================================================

    pub async fn lofi_stations(&self) -> Result<Vec<LofiStation>, ApiError> {
        self.fetch_enveloped(Method::Get, "/music/stations", &[], None)
            .await
    }

    // ========================================================================
    // Blob exports
    // ========================================================================

    /// Calendar export (ICS) as raw bytes.
    pub async fn export_calendar(&self) -> Result<Vec<u8>, ApiError> {
        let response = self.request_blob("/export/calendar").await?;
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(bytes.to_vec())
    }

    /// Progress report (PDF) as raw bytes.
    pub async fn export_report(&self) -> Result<Vec<u8>, ApiError> {
        let response = self.request_blob("/export/report").await?;
        let bytes = response.bytes().await.map_err(ApiError::from_transport)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SessionStore;

    fn api() -> StudyApi {
        StudyApi::with_base_url("https://api.test", Arc::new(SessionStore::in_memory()))
    }

    #[test]
    fn url_without_query() {
        assert_eq!(api().url("/subjects", &[]), "https://api.test/subjects");
    }

    #[test]
    fn url_encodes_query_values() {
        let url = api().url(
            "/coach/history",
            &[
                ("limit", "20".to_string()),
                ("before", "2026-08-06T09:00:00+02:00".to_string()),
            ],
        );
        assert_eq!(
            url,
            "https://api.test/coach/history?limit=20&before=2026-08-06T09%3A00%3A00%2B02%3A00"
        );
    }
}
