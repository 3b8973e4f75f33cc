mod config;

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use social_api::rate_limit::RateLimiter;
use social_api::routes;
use social_api::state::{AppState, AppStateInner};
use social_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "insecure_social=debug,social_api=debug,social_db=info,tower_http=debug".into()
            }),
        )
        .init();

    let config = Config::from_env()?;

    if config.jwt_secret_is_fallback {
        warn!("JWT_SECRET is unset, signing sessions with the built-in development secret");
    }
    info!(
        "DB_HOST={} DB_USER={} are ignored by the embedded store",
        config.db.host, config.db.user
    );

    tokio::fs::create_dir_all(&config.uploads_dir).await?;

    let db = Arc::new(Database::open(&config.db.path, config.db.connection_limit)?);

    if config.seed_demo_data {
        social_db::seed::demo(&db)?;
        info!("Demo data seeded");
    }

    let state: AppState = Arc::new(AppStateInner {
        db: db.clone(),
        jwt_secret: config.jwt_secret.clone(),
        uploads_dir: config.uploads_dir.clone(),
        admin_uploads_dir: config.admin_uploads_dir.clone(),
        limiter: RateLimiter::default(),
    });

    let app = routes::router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Insecure social API listening on {}", addr);
    info!("Uploads stored under {}", config.uploads_dir.display());

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    let closed = tokio::task::spawn_blocking(move || db.close(Duration::from_secs(5))).await?;
    info!("Closed {} database connection(s)", closed);

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
                    _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
                }
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                ctrl_c.await.ok();
                info!("Received Ctrl+C, shutting down...");
            }
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
