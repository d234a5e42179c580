use axum::{debug_handler, extract::{Path, State}, response::{IntoResponse, Redirect, Response}};
use tower_sessions::Session;

use crate::{index, session, store::RoomId, AppResult, AppState};

/// Joins the room (a no-op when already there) and shows it.
#[debug_handler(state = AppState)]
pub(crate) async fn room(
    State(state): State<AppState>,
    session: Session,
    Path(room_id): Path<String>,
) -> AppResult<Response> {
    let Some(id) = session::live_session(&session, &state.store).await? else {
        return Ok(Redirect::to("/login").into_response());
    };
    let room_id = RoomId::from(room_id.as_str());

    let mut store = state.store.lock().await;
    store.join_room(id, &room_id)?;
    state.publish(&mut store);

    Ok(index::chat_page(&store, id)?.into_response())
}
