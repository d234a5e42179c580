pub mod api;
pub mod auth;
pub mod config;
pub mod format;
pub mod index;
pub mod res;
pub mod rooms;
pub mod session;
pub mod store;

use std::sync::Arc;

use axum::{extract::FromRef, http::StatusCode, response::{IntoResponse, Response}, routing::get, Router};
use tokio::sync::{broadcast, Mutex};
use tracing::error;

use store::{Appended, ChatStore, LoginError, RoomError, SendError};

pub type SharedStore = Arc<Mutex<ChatStore>>;

#[derive(Clone, FromRef)]
pub struct AppState {
    pub store: SharedStore,
    pub tx: broadcast::Sender<Appended>,
}

impl AppState {
    pub fn new(store: ChatStore, capacity: usize) -> Self {
        AppState {
            store: Arc::new(Mutex::new(store)),
            tx: broadcast::channel(capacity.max(1)).0,
        }
    }

    /// Fan out whatever the last mutation appended to live room feeds.
    pub(crate) fn publish(&self, store: &mut ChatStore) {
        for appended in store.drain_appended() {
            // no subscribers is fine
            let _ = self.tx.send(appended);
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index::index))
        .merge(auth::router())
        .nest("/r", rooms::router())
        .nest("/api", api::router())
        .with_state(state)
}

pub type AppResult<T> = Result<T, AppError>;
#[derive(Debug)]
pub struct AppError(pub anyhow::Error);

impl AppError {
    pub(crate) fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<LoginError>() {
            return match err {
                LoginError::Empty | LoginError::TooShort => StatusCode::BAD_REQUEST,
                LoginError::Taken => StatusCode::CONFLICT,
            };
        }
        if let Some(err) = self.0.downcast_ref::<RoomError>() {
            return match err {
                RoomError::EmptyName => StatusCode::BAD_REQUEST,
                RoomError::AlreadyExists(_) => StatusCode::CONFLICT,
                RoomError::NotFound(_) => StatusCode::NOT_FOUND,
                RoomError::UnknownSession => StatusCode::UNAUTHORIZED,
            };
        }
        if let Some(err) = self.0.downcast_ref::<SendError>() {
            return match err {
                SendError::Empty => StatusCode::BAD_REQUEST,
                SendError::NoRoom => StatusCode::CONFLICT,
                SendError::UnknownSession => StatusCode::UNAUTHORIZED,
            };
        }
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{:?}", self.0);
        }
        (status, self.0.to_string()).into_response()
    }
}

macro_rules! apperr_impl {
    ($E:ty) => {
        impl From<$E> for AppError {
            fn from(err: $E) -> Self {
                Self(anyhow::Error::from(err))
            }
        }
    };
}

apperr_impl!(LoginError);
apperr_impl!(RoomError);
apperr_impl!(SendError);
apperr_impl!(serde_json::Error);
apperr_impl!(tower_sessions::session::Error);
apperr_impl!(axum::Error);
apperr_impl!(time::error::Format);

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;

    use crate::{
        store::{LoginError, RoomError, RoomId, SendError},
        AppError,
    };

    #[test]
    fn domain_errors_map_to_client_statuses() {
        assert_eq!(AppError::from(LoginError::Taken).status(), StatusCode::CONFLICT);
        assert_eq!(AppError::from(LoginError::TooShort).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::from(RoomError::NotFound(RoomId::from("x"))).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(AppError::from(SendError::NoRoom).status(), StatusCode::CONFLICT);
        assert_eq!(
            AppError(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
