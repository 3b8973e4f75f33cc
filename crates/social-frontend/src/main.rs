use std::net::SocketAddr;
use std::path::PathBuf;

use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "insecure_social_frontend=debug,tower_http=debug".into()),
        )
        .init();

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "8080".into())
        .parse()?;
    let api_base = std::env::var("PUBLIC_API_BASE")
        .or_else(|_| std::env::var("API_BASE"))
        .unwrap_or_else(|_| "http://localhost:3000".into());
    let frontend_dir: PathBuf = std::env::var("FRONTEND_DIR")
        .unwrap_or_else(|_| "./frontend".into())
        .into();

    let app = social_frontend::app(&api_base, frontend_dir.clone());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Frontend listening on {}", addr);
    info!("Serving {} with API_BASE={}", frontend_dir.display(), api_base);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
