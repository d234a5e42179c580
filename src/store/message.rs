use serde::Serialize;
use time::OffsetDateTime;
use uuid::Uuid;

/// One entry of a room log. Never changed after it is appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    System {
        id: Uuid,
        content: String,
        #[serde(with = "time::serde::rfc3339")]
        timestamp: OffsetDateTime,
    },
    User {
        id: Uuid,
        author: String,
        content: String,
        #[serde(with = "time::serde::rfc3339")]
        timestamp: OffsetDateTime,
    },
}

impl Message {
    pub(crate) fn system(content: String) -> Self {
        Message::System {
            id: Uuid::now_v7(),
            content,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub(crate) fn user(author: String, content: String) -> Self {
        Message::User {
            id: Uuid::now_v7(),
            author,
            content,
            timestamp: OffsetDateTime::now_utc(),
        }
    }

    pub fn id(&self) -> Uuid {
        match self {
            Message::System { id, .. } | Message::User { id, .. } => *id,
        }
    }

    /// Raw stored content, never formatted.
    pub fn content(&self) -> &str {
        match self {
            Message::System { content, .. } | Message::User { content, .. } => content,
        }
    }

    pub fn timestamp(&self) -> OffsetDateTime {
        match self {
            Message::System { timestamp, .. } | Message::User { timestamp, .. } => *timestamp,
        }
    }

    pub fn author(&self) -> Option<&str> {
        match self {
            Message::System { .. } => None,
            Message::User { author, .. } => Some(author),
        }
    }
}
