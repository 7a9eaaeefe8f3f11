//! `SessionStore`: the central registry of logged-in players.

use std::collections::HashMap;

use vonix_protocol::{PlayerIdentity, Uuid};

use crate::{Session, SessionToken};

/// Holds at most one session per player, keyed by UUID.
///
/// The store is a plain struct with `&mut self` methods. It is owned by the
/// host's main context and only ever touched from there, so it needs no
/// locking of its own.
///
/// # Invariant
///
/// A token is present for a player iff their most recent successful login
/// has not been followed by [`remove`](Self::remove) or
/// [`clear`](Self::clear). Failed logins never touch the store.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<Uuid, Session>,
}

impl SessionStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `token` for `player`, replacing any previous session.
    ///
    /// Returns the replaced session, if there was one. Overwriting is
    /// unconditional: when two logins race, the last one to land wins.
    pub fn put(
        &mut self,
        player: &PlayerIdentity,
        token: SessionToken,
    ) -> Option<Session> {
        self.insert(Session::new(player.clone(), token))
    }

    /// Stores a fully built session, replacing any previous one.
    pub fn insert(&mut self, session: Session) -> Option<Session> {
        let uuid = session.player.uuid;
        let previous = self.sessions.insert(uuid, session);

        tracing::info!(
            %uuid,
            replaced = previous.is_some(),
            "session stored"
        );
        previous
    }

    /// Returns the token for `uuid`, if the player is logged in.
    pub fn get(&self, uuid: &Uuid) -> Option<&SessionToken> {
        self.sessions.get(uuid).map(|session| &session.token)
    }

    /// Returns the full session record for `uuid`.
    pub fn session(&self, uuid: &Uuid) -> Option<&Session> {
        self.sessions.get(uuid)
    }

    /// `true` if `uuid` currently holds a token.
    pub fn contains(&self, uuid: &Uuid) -> bool {
        self.sessions.contains_key(uuid)
    }

    /// Removes the session for `uuid`. Removing a missing session is fine.
    pub fn remove(&mut self, uuid: &Uuid) -> Option<Session> {
        let removed = self.sessions.remove(uuid);
        if removed.is_some() {
            tracing::info!(%uuid, "session removed");
        }
        removed
    }

    /// Drops every session. Called when the bridge shuts down.
    pub fn clear(&mut self) {
        let count = self.sessions.len();
        self.sessions.clear();
        tracing::info!(count, "all sessions cleared");
    }

    /// Number of logged-in players.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// `true` if nobody is logged in.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

// =========================================================================
// Tests
// =========================================================================
