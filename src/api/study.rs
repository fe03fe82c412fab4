//! High-level StudyNest client
//!
//! Wraps the request layer with session persistence: login and registration
//! store the credential pair and cached profile, logout tears the local
//! session down, and blob exports stream to disk.

use anyhow::{Context, Result};
use futures_util::StreamExt;
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::{info, warn};

use super::study_api::StudyApi;
use super::study_api::model::UserProfile;
use crate::storage::{SessionStore, TokenStore};

#[derive(Clone)]
pub struct StudyClient {
    api: StudyApi,
    store: Arc<SessionStore>,
}

impl std::fmt::Debug for StudyClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StudyClient")
            .field("api", &self.api)
            .finish()
    }
}

impl StudyClient {
    /// Client backed by the default on-disk session store.
    pub fn new() -> Self {
        Self::with_store(Arc::new(SessionStore::open_default()))
    }

    pub fn with_store(store: Arc<SessionStore>) -> Self {
        let api = StudyApi::new(store.clone() as Arc<dyn TokenStore>);
        Self { api, store }
    }

    /// Client pointed at a specific origin, for tests and staging.
    pub fn with_base_url(base_url: impl Into<String>, store: Arc<SessionStore>) -> Self {
        let api = StudyApi::with_base_url(base_url, store.clone() as Arc<dyn TokenStore>);
        Self { api, store }
    }

    /// Direct access to the endpoint surface.
    pub fn api(&self) -> &StudyApi {
        &self.api
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.is_logged_in()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserProfile> {
        let session = self.api.login(email, password).await?;
        self.store.store_tokens(
            session.access_token.clone(),
            Some(session.refresh_token.clone()),
        );
        self.store
            .cache_profile(serde_json::to_value(&session.user)?);
        info!("signed in as {}", session.user.email);
        Ok(session.user)
    }

    pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<UserProfile> {
        let session = self.api.register(name, email, password).await?;
        self.store.store_tokens(
            session.access_token.clone(),
            Some(session.refresh_token.clone()),
        );
        self.store
            .cache_profile(serde_json::to_value(&session.user)?);
        info!("registered account for {}", session.user.email);
        Ok(session.user)
    }

    /// End the session. The server call is best-effort; the local
    /// credentials are cleared regardless of its outcome.
    pub async fn logout(&self) {
        if let Err(err) = self.api.logout().await {
            warn!("server-side logout failed: {}", err);
        }
        self.store.clear();
        info!("signed out");
    }

    /// Called when a request ends in a terminal authorization failure:
    /// drops the local session so the frontend can route to login.
    pub fn end_session(&self) {
        self.store.clear();
    }

    /// The user's profile, from the local cache when available.
    pub async fn profile(&self) -> Result<UserProfile> {
        if let Some(cached) = self.store.cached_profile() {
            if let Ok(user) = serde_json::from_value::<UserProfile>(cached) {
                return Ok(user);
            }
        }
        let user = self.api.current_user().await?;
        self.store.cache_profile(serde_json::to_value(&user)?);
        Ok(user)
    }

    /// Download the calendar export (ICS) to a file.
    pub async fn save_calendar_export(&self, dest: &Path) -> Result<()> {
        self.save_blob("/export/calendar", dest).await
    }

    /// Download the progress report (PDF) to a file.
    pub async fn save_report(&self, dest: &Path) -> Result<()> {
        self.save_blob("/export/report", dest).await
    }

    async fn save_blob(&self, path: &str, dest: &Path) -> Result<()> {
        let response = self.api.request_blob(path).await?;
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut file = tokio::fs::File::create(dest)
            .await
            .with_context(|| format!("failed to create {:?}", dest))?;
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.context("export download interrupted")?;
            file.write_all(&chunk).await?;
        }
        file.flush().await?;
        info!("export written to {:?}", dest);
        Ok(())
    }
}

impl Default for StudyClient {
    fn default() -> Self {
        Self::new()
    }
}
