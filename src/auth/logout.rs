use axum::{debug_handler, extract::State, response::Redirect};
use tower_sessions::Session;

use crate::{session, AppResult, AppState};

#[debug_handler(state = AppState)]
pub(crate) async fn logout(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Redirect> {
    if let Some(id) = session::chat_session(&session).await? {
        let mut store = state.store.lock().await;
        store.logout(id);
        state.publish(&mut store);
    }
    session.clear().await;
    Ok(Redirect::to("/login"))
}
