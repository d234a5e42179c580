use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

use super::Message;

/// Room key derived from its display name: trimmed, lowercased, and every
/// whitespace character turned into `-`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoomId(String);

impl RoomId {
    pub fn from_name(name: &str) -> RoomId {
        RoomId(
            name.trim()
                .to_lowercase()
                .chars()
                .map(|c| if c.is_whitespace() { '-' } else { c })
                .collect(),
        )
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RoomId {
    /// Wraps an already-derived id, e.g. one taken from a URL path.
    fn from(id: &str) -> Self {
        RoomId(id.to_owned())
    }
}

#[derive(Debug, Clone)]
pub struct Room {
    pub(crate) id: RoomId,
    pub(crate) name: String,
    pub(crate) members: BTreeSet<String>,
    pub(crate) messages: Vec<Message>,
}

impl Room {
    pub(crate) fn new(id: RoomId, name: String) -> Self {
        Room {
            id,
            name,
            members: BTreeSet::new(),
            messages: Vec::new(),
        }
    }

    pub fn id(&self) -> &RoomId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn members(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(String::as_str)
    }

    pub fn has_member(&self, username: &str) -> bool {
        self.members.contains(username)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            members: self.members.len(),
        }
    }
}

/// What the room list shows for each room.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoomSummary {
    pub id: RoomId,
    pub name: String,
    pub members: usize,
}
