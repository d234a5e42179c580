use axum::{debug_handler, extract::State, response::Redirect, Form};
use serde::Deserialize;
use tower_sessions::Session;

use crate::{session, AppResult, AppState};

use super::room_path;

#[derive(Debug, Deserialize)]
pub(crate) struct NewRoomForm {
    name: String,
}

/// Creates the room and moves the creator into it.
#[debug_handler(state = AppState)]
pub(crate) async fn new_room(
    State(state): State<AppState>,
    session: Session,

    Form(NewRoomForm { name }): Form<NewRoomForm>,
) -> AppResult<Redirect> {
    let Some(id) = session::live_session(&session, &state.store).await? else {
        return Ok(Redirect::to("/login"));
    };

    let mut store = state.store.lock().await;
    let room_id = store.create_room(&name)?;
    let joined = store.join_room(id, &room_id);
    state.publish(&mut store);
    joined?;

    Ok(Redirect::to(&format!("/r/{}", room_path(&room_id))))
}
