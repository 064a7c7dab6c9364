use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// File name of the persisted session inside the data directory.
pub const SESSION_FILE: &str = "session.json";

/// What is persisted between invocations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionToken {
    pub authenticated: bool,
    pub issued_at: DateTime<Utc>,
}

impl SessionToken {
    #[must_use]
    pub fn issue(now: DateTime<Utc>) -> Self {
        Self {
            authenticated: true,
            issued_at: now,
        }
    }
}

/// Proof of a valid login, passed explicitly to admin operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSession {
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AdminSession {
    #[must_use]
    pub fn from_token(token: &SessionToken, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            issued_at: token.issued_at,
            expires_at: token
                .issued_at
                .checked_add_signed(ttl)
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    #[must_use]
    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Valid from issue time up to, not including, expiry.
    #[must_use]
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.issued_at && now < self.expires_at
    }
}
