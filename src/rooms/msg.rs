use axum::{debug_handler, extract::{Path, State}, response::Redirect, Form};
use serde::Deserialize;
use time::macros::format_description;
use tower_sessions::Session;

use crate::{
    format::{escape, format_message_content},
    include_res,
    res::fill,
    session,
    store::{ChatStore, Message, RoomError, RoomId, SendError, SessionId},
    AppResult, AppState,
};

use super::room_path;

#[derive(Deserialize)]
pub(crate) struct SendMessageForm {
    pub(crate) content: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn send_msg(
    State(state): State<AppState>,
    session: Session,
    Path(room_id): Path<String>,

    Form(SendMessageForm { content }): Form<SendMessageForm>,
) -> AppResult<Redirect> {
    let Some(id) = session::live_session(&session, &state.store).await? else {
        return Err(SendError::UnknownSession.into());
    };
    let room_id = RoomId::from(room_id.as_str());

    let mut store = state.store.lock().await;
    send_to(&mut store, id, &room_id, &content)?;
    state.publish(&mut store);

    Ok(Redirect::to(&format!("/r/{}", room_path(&room_id))))
}

/// Sends into `room_id` only if that is still the session's current room; a
/// page or socket left open on another room must not move the user.
pub(crate) fn send_to(
    store: &mut ChatStore,
    id: SessionId,
    room_id: &RoomId,
    content: &str,
) -> AppResult<()> {
    if store.room(room_id).is_none() {
        return Err(RoomError::NotFound(room_id.clone()).into());
    }
    let session = store.session(id).ok_or(SendError::UnknownSession)?;
    if session.room() != Some(room_id) {
        return Err(SendError::NoRoom.into());
    }
    store.send_message(id, content)?;
    Ok(())
}

/// One log entry as it appears to `viewer`. Only user messages are formatted.
pub(crate) fn msg_to_html(message: &Message, viewer: &str) -> AppResult<String> {
    let time = message
        .timestamp()
        .format(format_description!("[hour repr:12]:[minute] [period]"))?;

    let html = match message {
        Message::System { id, content, .. } => fill(
            include_res!(str, "/pages/rooms/system_message.html"),
            &[
                ("id", &id.to_string()),
                ("time", &time),
                ("content", &escape(content)),
            ],
        ),
        Message::User { id, author, content, .. } => {
            let class = if author == viewer { "message own" } else { "message" };
            fill(
                include_res!(str, "/pages/rooms/message.html"),
                &[
                    ("id", &id.to_string()),
                    ("class", class),
                    ("time", &time),
                    ("author", &escape(author)),
                    ("content", &format_message_content(content)),
                ],
            )
        }
    };
    Ok(html)
}

#[cfg(test)]
mod tests {
    use super::{msg_to_html, send_to};
    use crate::store::{ChatStore, RoomId, SendError};

    #[test]
    fn own_messages_are_marked_and_formatted() {
        let mut store = ChatStore::with_rooms(["General"]).unwrap();
        let alice = store.login("alice").unwrap();
        let general = RoomId::from("general");
        store.join_room(alice, &general).unwrap();
        store.send_message(alice, "**hi** <there>").unwrap();

        let messages = store.messages(&general).unwrap();
        let joined = msg_to_html(&messages[0], "alice").unwrap();
        assert!(joined.contains("alice joined the room"));
        assert!(joined.contains("system-message"));

        let own = msg_to_html(&messages[1], "alice").unwrap();
        assert!(own.contains(r#"class="message own""#));
        assert!(own.contains("<strong>hi</strong> &lt;there&gt;"));

        let theirs = msg_to_html(&messages[1], "bob").unwrap();
        assert!(theirs.contains(r#"class="message""#));
    }

    #[test]
    fn sending_to_a_room_left_behind_is_refused() {
        let mut store = ChatStore::with_rooms(["General", "Random"]).unwrap();
        let alice = store.login("alice").unwrap();
        let general = RoomId::from("general");
        let random = RoomId::from("random");
        store.join_room(alice, &general).unwrap();
        store.join_room(alice, &random).unwrap();

        let err = send_to(&mut store, alice, &general, "stale").unwrap_err();
        assert_eq!(err.0.downcast_ref::<SendError>(), Some(&SendError::NoRoom));
        assert_eq!(store.session(alice).unwrap().room(), Some(&random));
        assert_eq!(store.messages(&general).unwrap().len(), 2);
        assert_eq!(store.messages(&random).unwrap().len(), 1);

        send_to(&mut store, alice, &random, "here").unwrap();
        assert_eq!(store.messages(&random).unwrap().last().unwrap().content(), "here");
    }
}
