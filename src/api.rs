//! Read-only JSON snapshots of the store. Message content is the raw stored
//! text; clients format it themselves.

use axum::{debug_handler, extract::{Path, State}, routing::get, Json, Router};

use crate::{
    store::{Message, RoomError, RoomId, RoomSummary},
    AppResult, AppState, SharedStore,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/rooms", get(rooms))
        .route("/rooms/{id}/messages", get(messages))
}

#[debug_handler(state = AppState)]
async fn rooms(State(store): State<SharedStore>) -> Json<Vec<RoomSummary>> {
    Json(store.lock().await.summaries())
}

#[debug_handler(state = AppState)]
async fn messages(
    Path(id): Path<String>,
    State(store): State<SharedStore>,
) -> AppResult<Json<Vec<Message>>> {
    let id = RoomId::from(id.as_str());
    let store = store.lock().await;
    let messages = store.messages(&id).ok_or_else(|| RoomError::NotFound(id.clone()))?;
    Ok(Json(messages.to_vec()))
}
