use axum::{
    debug_handler,
    extract::{ws::{Message as WsMessage, WebSocket}, Path, State, WebSocketUpgrade},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tower_sessions::Session;
use tracing::{debug, warn};

use crate::{
    rooms::msg,
    session,
    store::{Appended, RoomError, RoomId, SessionId},
    AppResult, AppState,
};

#[derive(Deserialize)]
struct Outgoing {
    content: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn room_ws(
    Path(room_id): Path<String>,
    State(state): State<AppState>,
    session: Session,

    ws: WebSocketUpgrade,
) -> AppResult<Response> {
    let Some(id) = session::live_session(&session, &state.store).await? else {
        return Err(RoomError::UnknownSession.into());
    };
    let room_id = RoomId::from(room_id.as_str());

    let viewer = {
        let store = state.store.lock().await;
        if store.room(&room_id).is_none() {
            return Err(RoomError::NotFound(room_id).into());
        }
        store
            .session(id)
            .map(|s| s.username().to_owned())
            .ok_or(RoomError::UnknownSession)?
    };

    Ok(ws
        .on_upgrade(move |socket| feed(socket, state, id, room_id, viewer))
        .into_response())
}

/// Pushes the room's new messages to the socket and sends what the viewer
/// types, until either side goes away.
async fn feed(socket: WebSocket, state: AppState, id: SessionId, room_id: RoomId, viewer: String) {
    let mut rx = state.tx.subscribe();
    let (mut sender, mut receiver) = socket.split();

    let watched = room_id.clone();
    let mut broadcast_task = tokio::spawn(async move {
        loop {
            let Appended { room, message } = match rx.recv().await {
                Ok(appended) => appended,
                Err(RecvError::Lagged(skipped)) => {
                    warn!(room = %watched, skipped, "live feed lagged");
                    continue;
                }
                Err(RecvError::Closed) => break,
            };
            if room != watched {
                continue;
            }

            let html = match msg::msg_to_html(&message, &viewer) {
                Ok(html) => html,
                Err(err) => {
                    warn!(err = ?err.0, "could not render message");
                    continue;
                }
            };
            if sender.send(WsMessage::Text(html.into())).await.is_err() {
                break;
            }
        }
    });

    let mut receive_task = tokio::spawn(async move {
        while let Some(Ok(frame)) = receiver.next().await {
            let Ok(Outgoing { content }) = serde_json::from_slice(&frame.into_data()) else {
                continue;
            };

            let mut store = state.store.lock().await;
            store.touch(id);
            if let Err(err) = msg::send_to(&mut store, id, &room_id, &content) {
                debug!(%id, room = %room_id, err = %err.0, "message not sent");
                continue;
            }
            state.publish(&mut store);
        }
    });

    tokio::select! {
        _ = &mut broadcast_task => receive_task.abort(),
        _ = &mut receive_task => broadcast_task.abort(),
    };
}
