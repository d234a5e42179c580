//! Cookie-session keys and the lookup of the chat session behind a request.

use time::OffsetDateTime;
use tokio::task::JoinHandle;
use tower_sessions::Session;
use tracing::info;

use crate::{store::SessionId, AppResult, AppState, SharedStore};

pub const CHAT_SESSION: &str = "chat_session";

pub async fn chat_session(session: &Session) -> AppResult<Option<SessionId>> {
    Ok(session.get::<SessionId>(CHAT_SESSION).await?)
}

/// The chat session for this cookie, if it is still live in the store, marked
/// as seen. A cookie pointing at a logged-out session is cleared.
pub async fn live_session(session: &Session, store: &SharedStore) -> AppResult<Option<SessionId>> {
    let Some(id) = chat_session(session).await? else {
        return Ok(None);
    };
    if store.lock().await.touch(id) {
        return Ok(Some(id));
    }
    session.clear().await;
    Ok(None)
}

/// Logs out chat sessions not seen for `idle`, the same window after which
/// their cookie session expires, so abandoned usernames become free again.
pub fn spawn_idle_sweep(state: AppState, idle: time::Duration) -> JoinHandle<()> {
    let period = idle
        .clamp(time::Duration::SECOND, time::Duration::MINUTE)
        .unsigned_abs();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            let mut store = state.store.lock().await;
            let expired = store.expire_idle(OffsetDateTime::now_utc() - idle);
            if !expired.is_empty() {
                info!(count = expired.len(), "expired idle sessions");
                state.publish(&mut store);
            }
        }
    })
}
