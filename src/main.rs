use std::time::Duration;

use axum::ServiceExt;
use tower_sessions::{cookie::SameSite, session_store::ExpiredDeletion, Expiry, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wanderlust::{config::Config, db, uploads::ImageStore, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,wanderlust=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    tracing::info!("configuration loaded: {config:?}");

    let db_pool = db::connect(&config.database_url).await?;
    tracing::info!("connected to {}", config.database_url);

    let session_store = SqliteStore::new(db_pool.clone());
    session_store.migrate().await?;

    let cleanup_store = session_store.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(60 * 60));
        loop {
            interval.tick().await;
            if let Err(e) = cleanup_store.delete_expired().await {
                tracing::error!("expired session cleanup failed: {e:?}");
            }
        }
    });

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::days(7)))
        .with_signed(config.session_key()?);

    let images = ImageStore::open(&config.upload_dir).await?;
    let app_state = AppState { db_pool, images };

    let app = wanderlust::with_method_override(
        wanderlust::router(app_state, config.max_upload_bytes).layer(session_layer),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    tracing::info!("server is listening on {}", config.bind_address());
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}
