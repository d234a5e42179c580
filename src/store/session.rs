use std::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use super::RoomId;

/// Handle returned by [`ChatStore::login`](super::ChatStore::login).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        SessionId(Uuid::now_v7())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) username: String,
    pub(crate) room: Option<RoomId>,
    pub(crate) last_seen: OffsetDateTime,
}

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Username as typed at login (trimmed, case preserved).
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn room(&self) -> Option<&RoomId> {
        self.room.as_ref()
    }

    pub fn last_seen(&self) -> OffsetDateTime {
        self.last_seen
    }
}
