use thiserror::Error;

use super::RoomId;

/// Why a login was refused. The messages are shown verbatim on the login form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoginError {
    #[error("Please enter a username")]
    Empty,
    #[error("Username must be at least 3 characters")]
    TooShort,
    #[error("Username already taken. Please choose another.")]
    Taken,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoomError {
    #[error("Please enter a room name")]
    EmptyName,
    #[error("A room with this name already exists: {0}")]
    AlreadyExists(RoomId),
    #[error("No such room: {0}")]
    NotFound(RoomId),
    #[error("Not logged in")]
    UnknownSession,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Message is empty")]
    Empty,
    #[error("Join a room before sending messages")]
    NoRoom,
    #[error("Not logged in")]
    UnknownSession,
}
