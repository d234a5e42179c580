use anyhow::Context;
use roomchat::{config::Config, session, store::ChatStore, AppState};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let idle = time::Duration::minutes(config.session_minutes);
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(idle));

    let store = ChatStore::with_rooms(&config.rooms)?.with_journal();
    let app_state = AppState::new(store, config.broadcast_capacity);
    session::spawn_idle_sweep(app_state.clone(), idle);

    let mut app = roomchat::router(app_state)
        .layer(session_layer)
        .layer(TraceLayer::new_for_http());
    if config.cors_any {
        app = app.layer(CorsLayer::permissive());
    }

    let listener = tokio::net::TcpListener::bind(&config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    info!(addr = %config.addr, rooms = config.rooms.len(), "listening");
    axum::serve(listener, app).await?;
    Ok(())
}
