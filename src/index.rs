use axum::{debug_handler, extract::State, response::{Html, IntoResponse, Redirect, Response}};
use tower_sessions::Session;

use crate::{
    format::escape,
    include_res,
    res::fill,
    rooms::{msg_to_html, room_path},
    session,
    store::{ChatStore, Room, RoomError, SessionId},
    AppResult, AppState, SharedStore,
};

#[debug_handler(state = AppState)]
pub async fn index(
    State(store): State<SharedStore>,
    session: Session,
) -> AppResult<Response> {
    let Some(id) = session::live_session(&session, &store).await? else {
        return Ok(Redirect::to("/login").into_response());
    };

    let store = store.lock().await;
    Ok(chat_page(&store, id)?.into_response())
}

/// Room list on the left, the session's current room (if any) on the right.
pub(crate) fn chat_page(store: &ChatStore, id: SessionId) -> AppResult<Html<String>> {
    let session = store.session(id).ok_or(RoomError::UnknownSession)?;
    let current = session.room();

    let mut room_items = String::new();
    for room in store.rooms() {
        let active = if Some(room.id()) == current { "room-item active" } else { "room-item" };
        room_items += &fill(
            include_res!(str, "/pages/room_item.html"),
            &[
                ("class", active),
                ("path", &room_path(room.id())),
                ("members", &room.members().count().to_string()),
                ("name", &escape(room.name())),
            ],
        );
    }

    let panel = match store.current_room(id) {
        Some(room) => room_panel(room, session.username())?,
        None => include_res!(str, "/pages/rooms/none.html").to_owned(),
    };

    Ok(Html(fill(
        include_res!(str, "/pages/index.html"),
        &[
            ("room_items", &room_items),
            ("room", &panel),
            ("username", &escape(session.username())),
        ],
    )))
}

fn room_panel(room: &Room, viewer: &str) -> AppResult<String> {
    let mut messages = String::new();
    for message in room.messages() {
        messages += &msg_to_html(message, viewer)?;
    }

    Ok(fill(
        include_res!(str, "/pages/rooms/room.html"),
        &[
            ("path", &room_path(room.id())),
            ("messages", &messages),
            ("room_name", &escape(room.name())),
        ],
    ))
}
