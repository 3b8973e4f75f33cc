use std::path::PathBuf;

use anyhow::{Context, Result};

use social_db::DEFAULT_POOL_SIZE;

/// Used when `JWT_SECRET` is unset. Anyone who knows it can mint sessions.
pub const FALLBACK_JWT_SECRET: &str = "devsecret";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    /// True when `jwt_secret` is [`FALLBACK_JWT_SECRET`] because nothing was set.
    pub jwt_secret_is_fallback: bool,
    pub db: DbConfig,
    pub uploads_dir: PathBuf,
    pub admin_uploads_dir: PathBuf,
    pub seed_demo_data: bool,
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub path: PathBuf,
    pub connection_limit: usize,
    /// Recognised for parity with networked deployments; the embedded
    /// store never connects anywhere.
    pub host: String,
    pub user: String,
    pub password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let port: u16 = var("PORT", "3000")
            .parse()
            .context("PORT must be a port number")?;

        let connection_limit: usize = match lookup("DB_CONNECTION_LIMIT") {
            Some(v) => v
                .parse()
                .context("DB_CONNECTION_LIMIT must be a positive integer")?,
            None => DEFAULT_POOL_SIZE,
        };

        let db_path = match lookup("DB_PATH") {
            Some(path) => PathBuf::from(path),
            None => PathBuf::from(format!("{}.db", var("DB_NAME", "social"))),
        };

        let (jwt_secret, jwt_secret_is_fallback) = match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => (secret, false),
            _ => (FALLBACK_JWT_SECRET.to_string(), true),
        };

        let uploads_dir = PathBuf::from(var("UPLOADS_DIR", "./uploads"));
        let admin_uploads_dir = lookup("ADMIN_UPLOADS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| uploads_dir.join("admin"));

        let seed_demo_data = matches!(
            var("SEED_DEMO_DATA", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes"
        );

        Ok(Self {
            host: var("HOST", "0.0.0.0"),
            port,
            jwt_secret,
            jwt_secret_is_fallback,
            db: DbConfig {
                path: db_path,
                connection_limit,
                host: var("DB_HOST", "mysql"),
                user: var("DB_USER", "root"),
                password: var("DB_PASSWORD", "root"),
            },
            uploads_dir,
            admin_uploads_dir,
            seed_demo_data,
        })
    }
}
