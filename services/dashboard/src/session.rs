//! Persisted login session and route guard.
//!
//! The token returned by the backend is stored in a JSON file with a one-day
//! expiry. Expired sessions are removed on load.

use std::path::{Path, PathBuf};

use anyhow::Context;
use atlas_client::AuthApi;
use atlas_common::{AuthResponse, User};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Lifetime of a stored token.
pub const SESSION_TTL_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn from_auth(auth: &AuthResponse, now: DateTime<Utc>) -> Self {
        Self {
            token: auth.token.clone(),
            user: auth.user.clone(),
            expires_at: now + Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Session file on disk.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if any and not expired.
    pub fn load(&self) -> anyhow::Result<Option<Session>> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> anyhow::Result<Option<Session>> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to read session file {}", self.path.display())
                })
            }
        };

        let session: Session = match serde_json::from_str(&content) {
            Ok(session) => session,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding unreadable session file");
                self.clear()?;
                return Ok(None);
            }
        };

        if session.is_expired(now) {
            info!(expired_at = %session.expires_at, "Session expired");
            self.clear()?;
            return Ok(None);
        }
        Ok(Some(session))
    }

    /// Persist a fresh session for `auth`.
    pub fn save(&self, auth: &AuthResponse) -> anyhow::Result<Session> {
        self.save_at(auth, Utc::now())
    }

    pub fn save_at(&self, auth: &AuthResponse, now: DateTime<Utc>) -> anyhow::Result<Session> {
        let session = Session::from_auth(auth, now);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(&session)?;
        std::fs::write(&self.path, json)
            .with_context(|| format!("Failed to write session file {}", self.path.display()))?;
        debug!(path = %self.path.display(), "Session saved");
        Ok(session)
    }

    /// Remove the stored session. Missing files are not an error.
    pub fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e)
                .with_context(|| format!("Failed to remove session file {}", self.path.display())),
        }
    }

    /// Load the stored session and check its token with the backend.
    ///
    /// A token the backend rejects is discarded. Network failures keep the
    /// session so the dashboard still works offline from the backend.
    pub async fn restore(&self, auth_api: &AuthApi) -> anyhow::Result<Option<Session>> {
        let Some(mut session) = self.load()? else {
            return Ok(None);
        };

        let api = auth_api.clone().with_token(session.token.clone());
        match api.me().await {
            Ok(user) => {
                session.user = user;
                Ok(Some(session))
            }
            Err(e) if e.is_auth_failure() => {
                info!("Stored token rejected, logging out");
                self.clear()?;
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Could not verify stored session");
                Ok(Some(session))
            }
        }
    }
}

/// Commands grouped by the access they need.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login, registration and OTP verification.
    Auth,
    /// Dashboard, reports and search.
    Protected,
    /// Available with or without a session.
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// No session: the user must log in first.
    RequireLogin,
    /// Already logged in: go to the dashboard instead.
    AlreadyLoggedIn,
}

pub fn guard(route: Route, session: Option<&Session>) -> Access {
    match (route, session) {
        (Route::Protected, None) => Access::RequireLogin,
        (Route::Auth, Some(_)) => Access::AlreadyLoggedIn,
        _ => Access::Allow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use atlas_common::Role;

    fn auth() -> AuthResponse {
        AuthResponse {
            token: "abc".to_string(),
            refresh_token: None,
            user: User {
                id: 1,
                email: "awa@mail.cm".to_string(),
                first_name: "Awa".to_string(),
                last_name: "Ndam".to_string(),
                role: Role::User,
            },
        }
    }

    #[test]
    fn test_expiry_is_one_day() {
        let now = Utc::now();
        let session = Session::from_auth(&auth(), now);
        assert!(!session.is_expired(now + Duration::hours(23)));
        assert!(session.is_expired(now + Duration::hours(24)));
    }

    #[test]
    fn test_guard() {
        let now = Utc::now();
        let session = Session::from_auth(&auth(), now);
        assert_eq!(guard(Route::Protected, None), Access::RequireLogin);
        assert_eq!(guard(Route::Protected, Some(&session)), Access::Allow);
        assert_eq!(guard(Route::Auth, Some(&session)), Access::AlreadyLoggedIn);
        assert_eq!(guard(Route::Auth, None), Access::Allow);
        assert_eq!(guard(Route::Public, None), Access::Allow);
    }
}
