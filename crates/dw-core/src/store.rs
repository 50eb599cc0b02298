//! Session store keyed by player or channel id
//!
//! Command handlers receive the store explicitly instead of reaching for a
//! process-wide game. Each id owns an independent session.

use core::fmt;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::session::{MapRenderer, RoomReport, Session, SessionError, SessionOptions};

/// Key of a session in the store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// All live sessions
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: HashMap<SessionId, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new game for `id`, replacing any existing one
    pub fn create(
        &mut self,
        id: SessionId,
        options: SessionOptions,
    ) -> Result<&mut Session, SessionError> {
        let session = Session::new(options)?;
        info!(session = %id, seed = options.seed, "new game");
        Ok(self.insert(id, session))
    }

    /// Put an existing session (e.g. a restored one) under `id`
    pub fn insert(&mut self, id: SessionId, session: Session) -> &mut Session {
        match self.sessions.entry(id) {
            Entry::Occupied(mut slot) => {
                slot.insert(session);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(session),
        }
    }

    pub fn get(&self, id: &SessionId) -> Option<&Session> {
        self.sessions.get(id)
    }

    pub fn get_mut(&mut self, id: &SessionId) -> Option<&mut Session> {
        self.sessions.get_mut(id)
    }

    pub fn remove(&mut self, id: &SessionId) -> Option<Session> {
        self.sessions.remove(id)
    }

    pub fn contains(&self, id: &SessionId) -> bool {
        self.sessions.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SessionId> {
        self.sessions.keys()
    }

    fn session_mut(&mut self, id: &SessionId) -> Result<&mut Session, SessionError> {
        self.sessions
            .get_mut(id)
            .ok_or_else(|| SessionError::UnknownSession(id.to_string()))
    }

    /// `map` action for one session
    pub fn show_map<R: MapRenderer + ?Sized>(
        &mut self,
        id: &SessionId,
        renderer: &R,
    ) -> Result<RoomReport, SessionError> {
        self.session_mut(id)?.show_map(renderer)
    }

    /// `move` action for one session
    pub fn move_to<R: MapRenderer + ?Sized>(
        &mut self,
        id: &SessionId,
        local_index: usize,
        renderer: &R,
    ) -> Result<RoomReport, SessionError> {
        self.session_mut(id)?.move_to(local_index, renderer)
    }
}
