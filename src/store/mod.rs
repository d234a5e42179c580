//! In-memory session and room state.
//!
//! [`ChatStore`] is the only thing that mutates chat state. It knows nothing
//! about rendering: the web layer reads snapshots after each call and drains
//! the append journal to push new messages to live viewers.

mod error;
mod message;
mod room;
mod session;

use std::collections::{HashMap, HashSet};

use time::OffsetDateTime;
use tracing::{debug, info};

pub use error::{LoginError, RoomError, SendError};
pub use message::Message;
pub use room::{Room, RoomId, RoomSummary};
pub use session::{Session, SessionId};

pub const MIN_USERNAME_LEN: usize = 3;

pub const DEFAULT_ROOMS: [&str; 3] = ["General", "Random", "Tech Talk"];

/// A message that landed in a room log, as recorded by the journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appended {
    pub room: RoomId,
    pub message: Message,
}

#[derive(Debug, Default)]
pub struct ChatStore {
    /// Lowercased usernames of every live session.
    active: HashSet<String>,
    sessions: HashMap<SessionId, Session>,
    rooms: HashMap<RoomId, Room>,
    /// Creation order, for listing.
    order: Vec<RoomId>,
    journal: Option<Vec<Appended>>,
}

impl ChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store with the given rooms already created, in order.
    pub fn with_rooms<I, S>(names: I) -> Result<Self, RoomError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut store = Self::new();
        for name in names {
            store.create_room(name.as_ref())?;
        }
        Ok(store)
    }

    /// Start recording every appended message; see [`ChatStore::drain_appended`].
    pub fn with_journal(mut self) -> Self {
        self.journal = Some(Vec::new());
        self
    }

    pub fn login(&mut self, username: &str) -> Result<SessionId, LoginError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(LoginError::Empty);
        }
        if username.chars().count() < MIN_USERNAME_LEN {
            return Err(LoginError::TooShort);
        }

        let key = username.to_lowercase();
        if self.active.contains(&key) {
            return Err(LoginError::Taken);
        }
        self.active.insert(key);

        let id = SessionId::new();
        self.sessions.insert(
            id,
            Session {
                id,
                username: username.to_owned(),
                room: None,
                last_seen: OffsetDateTime::now_utc(),
            },
        );
        info!(%id, username, "logged in");
        Ok(id)
    }

    /// Leaves the current room, if any, and frees the username. Unknown or
    /// already logged-out sessions are ignored.
    pub fn logout(&mut self, id: SessionId) {
        let Some(session) = self.sessions.remove(&id) else {
            return;
        };
        if let Some(room) = &session.room {
            self.leave(&session.username, room);
        }
        self.active.remove(&session.username.to_lowercase());
        info!(%id, username = %session.username, "logged out");
    }

    pub fn create_room(&mut self, name: &str) -> Result<RoomId, RoomError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RoomError::EmptyName);
        }

        let id = RoomId::from_name(name);
        if self.rooms.contains_key(&id) {
            return Err(RoomError::AlreadyExists(id));
        }

        self.rooms
            .insert(id.clone(), Room::new(id.clone(), name.to_owned()));
        self.order.push(id.clone());
        info!(room = %id, name, "room created");
        Ok(id)
    }

    pub fn join_room(&mut self, id: SessionId, room_id: &RoomId) -> Result<(), RoomError> {
        let session = self.sessions.get(&id).ok_or(RoomError::UnknownSession)?;
        if session.room.as_ref() == Some(room_id) {
            return Ok(());
        }
        if !self.rooms.contains_key(room_id) {
            return Err(RoomError::NotFound(room_id.clone()));
        }

        let username = session.username.clone();
        let previous = session.room.clone();
        if let Some(previous) = previous {
            self.leave(&username, &previous);
        }

        let room = self
            .rooms
            .get_mut(room_id)
            .ok_or_else(|| RoomError::NotFound(room_id.clone()))?;
        room.members.insert(username.clone());
        self.append(room_id, Message::system(format!("{username} joined the room")));

        if let Some(session) = self.sessions.get_mut(&id) {
            session.room = Some(room_id.clone());
        }
        debug!(%id, room = %room_id, "joined");
        Ok(())
    }

    /// Drops the session's user from `room_id` and logs it. The session's
    /// current-room pointer is left as is.
    pub fn leave_room(&mut self, id: SessionId, room_id: &RoomId) {
        let Some(session) = self.sessions.get(&id) else {
            return;
        };
        let username = session.username.clone();
        self.leave(&username, room_id);
    }

    pub fn send_message(&mut self, id: SessionId, content: &str) -> Result<(), SendError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(SendError::Empty);
        }

        let session = self.sessions.get(&id).ok_or(SendError::UnknownSession)?;
        let room_id = session.room.clone().ok_or(SendError::NoRoom)?;
        if !self.rooms.contains_key(&room_id) {
            return Err(SendError::NoRoom);
        }

        let message = Message::user(session.username.clone(), content.to_owned());
        self.append(&room_id, message);
        Ok(())
    }

    /// Marks the session as seen now. Returns whether it is still live.
    pub fn touch(&mut self, id: SessionId) -> bool {
        match self.sessions.get_mut(&id) {
            Some(session) => {
                session.last_seen = OffsetDateTime::now_utc();
                true
            }
            None => false,
        }
    }

    /// Logs out every session last seen before `cutoff`, as if it had called
    /// [`logout`](ChatStore::logout), and returns their ids.
    pub fn expire_idle(&mut self, cutoff: OffsetDateTime) -> Vec<SessionId> {
        let idle: Vec<SessionId> = self
            .sessions
            .values()
            .filter(|session| session.last_seen < cutoff)
            .map(Session::id)
            .collect();
        for id in &idle {
            self.logout(*id);
        }
        idle
    }

    pub fn session(&self, id: SessionId) -> Option<&Session> {
        self.sessions.get(&id)
    }

    /// Whether a username is held by a live session, ignoring case.
    pub fn is_active(&self, username: &str) -> bool {
        self.active.contains(&username.trim().to_lowercase())
    }

    /// Rooms in creation order.
    pub fn rooms(&self) -> impl Iterator<Item = &Room> {
        self.order.iter().filter_map(|id| self.rooms.get(id))
    }

    pub fn summaries(&self) -> Vec<RoomSummary> {
        self.rooms().map(Room::summary).collect()
    }

    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub fn messages(&self, id: &RoomId) -> Option<&[Message]> {
        self.rooms.get(id).map(Room::messages)
    }

    pub fn current_room(&self, id: SessionId) -> Option<&Room> {
        self.session(id)?.room().and_then(|room| self.rooms.get(room))
    }

    /// Everything appended since the last drain, oldest first. Always empty
    /// unless the store was built [`with_journal`](ChatStore::with_journal).
    pub fn drain_appended(&mut self) -> Vec<Appended> {
        self.journal.as_mut().map(std::mem::take).unwrap_or_default()
    }

    fn leave(&mut self, username: &str, room_id: &RoomId) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };
        room.members.remove(username);
        self.append(room_id, Message::system(format!("{username} left the room")));
        debug!(username, room = %room_id, "left");
    }

    fn append(&mut self, room_id: &RoomId, message: Message) {
        let Some(room) = self.rooms.get_mut(room_id) else {
            return;
        };
        if let Some(journal) = &mut self.journal {
            journal.push(Appended {
                room: room_id.clone(),
                message: message.clone(),
            });
        }
        room.messages.push(message);
    }
}
