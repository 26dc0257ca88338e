use crate::error::{NiyyahError, Result};
use crate::paths;
use crate::types::TokenPair;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// ─── Session ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    /// No tokens have been issued yet.
    #[default]
    Anonymous,
    Active { tokens: TokenPair },
    /// A refresh failed. Only a new login or registration leaves this state.
    LoggedOut,
}

/// Client-side authentication state.
///
/// Passed by `&mut` to every call that talks to the API, so token rotation
/// and expiry are visible to the caller instead of hidden in globals.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Session {
    state: SessionState,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: TokenPair) -> Self {
        Self {
            state: SessionState::Active { tokens },
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SessionState::Active { .. })
    }

    pub fn is_logged_out(&self) -> bool {
        matches!(self.state, SessionState::LoggedOut)
    }

    pub fn access_token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active { tokens } => Some(&tokens.access_token),
            _ => None,
        }
    }

    pub fn refresh_token(&self) -> Option<&str> {
        match &self.state {
            SessionState::Active { tokens } => Some(&tokens.refresh_token),
            _ => None,
        }
    }

    /// Start a fresh session from a login or registration response.
    pub fn establish(&mut self, tokens: TokenPair) {
        self.state = SessionState::Active { tokens };
    }

    /// Replace both tokens after a successful refresh.
    pub fn rotate(&mut self, tokens: TokenPair) -> Result<()> {
        match self.state {
            SessionState::Active { .. } => {
                self.state = SessionState::Active { tokens };
                Ok(())
            }
            SessionState::Anonymous => Err(NiyyahError::NotLoggedIn),
            SessionState::LoggedOut => Err(NiyyahError::SessionExpired),
        }
    }

    /// Enter the terminal logged-out state.
    pub fn expire(&mut self) {
        self.state = SessionState::LoggedOut;
    }

    /// Forget all tokens without marking the session expired.
    pub fn clear(&mut self) {
        self.state = SessionState::Anonymous;
    }
}

// ─── SessionStore ─────────────────────────────────────────────────────────

/// Persists the session between CLI invocations at `<home>/session.yaml`.
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(home: &Path) -> Self {
        SessionStore {
            path: paths::session_path(home),
        }
    }

    /// Return the stored session, or an anonymous one if none exists.
    pub fn load(&self) -> Result<Session> {
        if !self.path.exists() {
            return Ok(Session::anonymous());
        }
        let data = std::fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Session::anonymous());
        }
        Ok(serde_yaml::from_str(&data)?)
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        let data = serde_yaml::to_string(session)?;
        crate::io::atomic_write(&self.path, data.as_bytes())
    }

    /// Delete the stored session (no-op if none exists).
    pub fn clear(&self) -> Result<()> {
        crate::io::remove_if_exists(&self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────
