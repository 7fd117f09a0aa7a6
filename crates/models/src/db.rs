use std::time::Duration;

use configs::DatabaseConfig;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

/// Resolve the database configuration: `config.toml` first, then the
/// `DATABASE_URL` environment variable for the missing URL.
pub fn load_config() -> DatabaseConfig {
    let _ = dotenvy::dotenv();
    let mut cfg = configs::load_default()
        .map(|c| c.database)
        .unwrap_or_default();
    cfg.normalize_from_env();
    cfg
}

pub async fn connect() -> anyhow::Result<DatabaseConnection> {
    let cfg = load_config();
    cfg.validate()?;
    connect_with(&cfg).await
}

pub async fn connect_with(cfg: &DatabaseConfig) -> anyhow::Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(cfg.url.clone());
    options
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .sqlx_logging(cfg.sqlx_logging);
    let db = Database::connect(options).await?;
    Ok(db)
}
