use axum::{debug_handler, extract::State, response::{IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::warn;

use crate::{res, session::{self, CHAT_SESSION}, AppError, AppResult, AppState, SharedStore};

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    username: String,
}

#[debug_handler(state = AppState)]
pub(crate) async fn login_page(
    State(store): State<SharedStore>,
    session: Session,
) -> AppResult<Response> {
    if session::live_session(&session, &store).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }
    Ok(res::login_page("").into_response())
}

#[debug_handler(state = AppState)]
pub(crate) async fn login(
    State(state): State<AppState>,
    session: Session,

    Form(LoginForm { username }): Form<LoginForm>,
) -> AppResult<Response> {
    let previous = session::chat_session(&session).await?;

    let result = {
        let mut store = state.store.lock().await;
        // a second login from the same browser replaces the first, but only
        // once it succeeds; the same name has to be freed up front
        let same_name = previous
            .and_then(|previous| store.session(previous))
            .is_some_and(|s| s.username().to_lowercase() == username.trim().to_lowercase());
        if let (true, Some(previous)) = (same_name, previous) {
            store.logout(previous);
        }
        let result = store.login(&username);
        if let (Ok(_), Some(previous)) = (&result, previous) {
            store.logout(previous);
        }
        state.publish(&mut store);
        result
    };

    match result {
        Ok(id) => {
            session.insert(CHAT_SESSION, id).await?;
            Ok(Redirect::to("/").into_response())
        }
        Err(err) => {
            warn!(%err, %username, "login refused");
            let status = AppError::from(err.clone()).status();
            Ok((status, res::login_page(&err.to_string())).into_response())
        }
    }
}
