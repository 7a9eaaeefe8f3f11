//! Session types: the token and the record we keep alongside it.

use std::fmt;
use std::time::Instant;

use vonix_protocol::{PlayerIdentity, UserInfo};

// ---------------------------------------------------------------------------
// SessionToken
// ---------------------------------------------------------------------------

/// An opaque bearer credential issued by the registration API.
///
/// This is a newtype rather than a bare `String` so it can't be logged by
/// accident: both `Debug` and `Display` print `<redacted>`. Use
/// [`as_str`](Self::as_str) when you actually need the value (e.g. an
/// `Authorization` header).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("<redacted>")
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A logged-in player: the token plus what we knew when it was issued.
#[derive(Debug, Clone)]
pub struct Session {
    /// Who the token belongs to, as the game server saw them at login.
    pub player: PlayerIdentity,
    /// The bearer credential.
    pub token: SessionToken,
    /// Website account id, when the login response included the user.
    pub user_id: Option<i64>,
    /// When the session was stored.
    pub established_at: Instant,
}

impl Session {
    /// Creates a session for `player`, stamped with the current time.
    pub fn new(player: PlayerIdentity, token: SessionToken) -> Self {
        Self {
            player,
            token,
            user_id: None,
            established_at: Instant::now(),
        }
    }

    /// Attaches the website account the token was issued for.
    pub fn with_user(mut self, user: &UserInfo) -> Self {
        self.user_id = Some(user.id);
        self
    }
}
