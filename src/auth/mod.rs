//! Password gate for the admin surface.
//!
//! A successful login writes a [`SessionToken`] next to the data directory and
//! hands back an [`AdminSession`] value. Admin operations take that value as
//! an argument; nothing reads the session file implicitly.
mod session;

pub use session::{AdminSession, SessionToken, SESSION_FILE};

pub use crate::config::AuthConfig;
use crate::config::ConfigError;
use crate::utils::{atomic_write, digest_matches};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tokio::fs;
use tracing::{debug, info, warn};

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Please enter the password")]
    EmptyPassword,

    #[error("Incorrect password, check it and try again")]
    InvalidPassword,

    #[error("No admin password is configured")]
    PasswordNotConfigured,

    #[error("Not logged in or the session has expired")]
    NotAuthenticated,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    ConfigError(#[from] ConfigError),
}

#[derive(Debug, Clone)]
pub struct AdminGate {
    config: AuthConfig,
    ttl: Duration,
    session_path: PathBuf,
}

impl AdminGate {
    pub fn new(config: AuthConfig, session_path: impl Into<PathBuf>) -> Result<Self, AuthError> {
        let ttl = config.session_ttl()?;
        Ok(Self {
            config,
            ttl,
            session_path: session_path.into(),
        })
    }

    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub async fn login(&self, password: &str) -> Result<AdminSession, AuthError> {
        self.login_at(password, Utc::now()).await
    }

    pub async fn login_at(
        &self,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AdminSession, AuthError> {
        if password.trim().is_empty() {
            return Err(AuthError::EmptyPassword);
        }
        let expected = self
            .config
            .password_sha256
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .ok_or(AuthError::PasswordNotConfigured)?;
        if !digest_matches(password, expected) {
            warn!("Rejected admin login");
            return Err(AuthError::InvalidPassword);
        }
        let token = SessionToken::issue(now);
        if let Some(parent) = self.session_path.parent() {
            fs::create_dir_all(parent).await?;
        }
        atomic_write(&self.session_path, &serde_json::to_string_pretty(&token)?).await?;
        info!("Admin session started");
        Ok(AdminSession::from_token(&token, self.ttl))
    }

    /// The stored session, if it is still valid. Expired or unreadable
    /// session files are removed.
    pub async fn current_session(&self) -> Result<Option<AdminSession>, AuthError> {
        self.current_session_at(Utc::now()).await
    }

    pub async fn current_session_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Option<AdminSession>, AuthError> {
        if !self.session_path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.session_path).await?;
        let token = match serde_json::from_str::<SessionToken>(&content) {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Discarding unreadable session file");
                self.discard().await?;
                return Ok(None);
            }
        };
        let session = AdminSession::from_token(&token, self.ttl);
        if token.authenticated && session.is_valid_at(now) {
            return Ok(Some(session));
        }
        debug!("Session expired");
        self.discard().await?;
        Ok(None)
    }

    /// Like [`Self::current_session`] but fails when there is none.
    pub async fn require_session(&self) -> Result<AdminSession, AuthError> {
        self.current_session()
            .await?
            .ok_or(AuthError::NotAuthenticated)
    }

    pub async fn logout(&self) -> Result<(), AuthError> {
        self.discard().await?;
        info!("Admin session ended");
        Ok(())
    }

    async fn discard(&self) -> Result<(), AuthError> {
        match fs::remove_file(&self.session_path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
