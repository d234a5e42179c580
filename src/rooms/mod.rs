mod msg;
mod new;
mod room;
mod ws;

use axum::{routing::{get, post}, Router};

use crate::{store::RoomId, AppState};

pub(crate) use msg::msg_to_html;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/new", post(new::new_room))
        .route("/{id}", get(room::room))
        .route("/{id}/msg", post(msg::send_msg))
        .route("/{id}/ws", get(ws::room_ws))
}

/// Path segment for a room id, safe to put in `/r/{..}` links.
pub(crate) fn room_path(id: &RoomId) -> String {
    url::form_urlencoded::byte_serialize(id.as_str().as_bytes()).collect()
}
