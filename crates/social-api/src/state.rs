use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use tracing::error;

use social_db::Database;

use crate::rate_limit::RateLimiter;

pub type AppState = Arc<AppStateInner>;

/// Process-lifetime state handed to the router at startup.
pub struct AppStateInner {
    pub db: Arc<Database>,
    pub jwt_secret: String,
    /// Photo uploads; also served read-only under `/static-photos`.
    pub uploads_dir: PathBuf,
    pub admin_uploads_dir: PathBuf,
    pub limiter: RateLimiter,
}

impl AppStateInner {
    /// Run a blocking data-store call off the async runtime.
    pub async fn run_db<F, T>(&self, f: F) -> anyhow::Result<T>
    where
        F: FnOnce(&Database) -> anyhow::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| {
                error!("spawn_blocking join error: {}", e);
                anyhow!("database task failed: {}", e)
            })?
    }
}
