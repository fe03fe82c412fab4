//! Persistent client storage
//!
//! Holds the credential pair and the cached user profile the way browser
//! local storage does for the web frontend: a small JSON file under the
//! platform data directory, rewritten on every change and loaded once at
//! startup. Tests run against an in-memory store.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing::{debug, error};

const SESSION_FILE: &str = "session.json";

/// Read/write access to the stored credential pair.
///
/// The request client takes this as an injected dependency instead of
/// reaching for ambient global state, so it can be exercised against an
/// in-memory store in isolation.
pub trait TokenStore: Send + Sync {
    fn access_token(&self) -> Option<String>;
    fn refresh_token(&self) -> Option<String>;
    /// Store a freshly issued credential pair, replacing any previous one.
    /// A `None` refresh token leaves the stored one untouched.
    fn store_tokens(&self, access: String, refresh: Option<String>);
    /// Swap in a new access token after a refresh. A rejected access token
    /// must never be written back; this is the only way it gets replaced
    /// short of a full [`clear`](TokenStore::clear).
    fn replace_access(&self, access: String);
    /// Drop both tokens. Used on logout and terminal authorization failure.
    fn clear(&self);
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct SessionData {
    access_token: Option<String>,
    refresh_token: Option<String>,
    /// Last profile the API served, kept so pages can render without a
    /// round trip right after startup.
    profile: Option<Value>,
}

/// File-backed session store.
///
/// All reads go through an in-process lock; every mutation rewrites the
/// backing file via a temp file and rename, so each operation lands
/// atomically on disk. Last write wins, which is all a single-process
/// client needs.
pub struct SessionStore {
    data: RwLock<SessionData>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Store backed by the default platform data directory.
    pub fn open_default() -> Self {
        Self::open(default_session_path())
    }

    /// Store backed by a specific file, loading it when it exists.
    pub fn open(path: PathBuf) -> Self {
        let data = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(data) => data,
                Err(err) => {
                    error!("session file {:?} is corrupt, starting fresh: {}", path, err);
                    SessionData::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => SessionData::default(),
            Err(err) => {
                error!("failed to read session file {:?}: {}", path, err);
                SessionData::default()
            }
        };
        Self {
            data: RwLock::new(data),
            path: Some(path),
        }
    }

    /// Store that never touches disk.
    pub fn in_memory() -> Self {
        Self {
            data: RwLock::new(SessionData::default()),
            path: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.data.read().access_token.is_some()
    }

    pub fn cached_profile(&self) -> Option<Value> {
        self.data.read().profile.clone()
    }

    pub fn cache_profile(&self, profile: Value) {
        let mut data = self.data.write();
        data.profile = Some(profile);
        self.persist(&data);
    }

    fn persist(&self, data: &SessionData) {
        let Some(path) = &self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                error!("failed to create session directory {:?}: {}", parent, err);
                return;
            }
        }
        let content = match serde_json::to_string_pretty(data) {
            Ok(content) => content,
            Err(err) => {
                error!("failed to serialize session data: {}", err);
                return;
            }
        };
        // Write-then-rename keeps each mutation atomic on disk.
        let tmp = path.with_extension("json.tmp");
        let result = fs::write(&tmp, content).and_then(|_| fs::rename(&tmp, path));
        match result {
            Ok(_) => debug!("session data written to {:?}", path),
            Err(err) => error!("failed to write session file {:?}: {}", path, err),
        }
    }
}

impl TokenStore for SessionStore {
    fn access_token(&self) -> Option<String> {
        self.data.read().access_token.clone()
    }

    fn refresh_token(&self) -> Option<String> {
        self.data.read().refresh_token.clone()
    }

    fn store_tokens(&self, access: String, refresh: Option<String>) {
        let mut data = self.data.write();
        data.access_token = Some(access);
        if refresh.is_some() {
            data.refresh_token = refresh;
        }
        self.persist(&data);
    }

    fn replace_access(&self, access: String) {
        let mut data = self.data.write();
        data.access_token = Some(access);
        self.persist(&data);
    }

    fn clear(&self) {
        let mut data = self.data.write();
        *data = SessionData::default();
        self.persist(&data);
    }
}

fn default_session_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("studynest")
        .join(SESSION_FILE)
}
