use std::time::Duration;

use anyhow::Context;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions, MySqlSslMode};
use sqlx::MySqlPool;

use crate::config::DatabaseConfig;

/// With a CA on disk the server certificate and its hostname are both checked.
fn tls_mode(cfg: &DatabaseConfig) -> Option<MySqlSslMode> {
    cfg.ca_path.exists().then_some(MySqlSslMode::VerifyIdentity)
}

pub fn connect_options(cfg: &DatabaseConfig) -> MySqlConnectOptions {
    let options = MySqlConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.user)
        .password(&cfg.password)
        .database(&cfg.name);

    match tls_mode(cfg) {
        Some(mode) => {
            tracing::info!(ca = %cfg.ca_path.display(), "using CA certificate for database TLS");
            options.ssl_mode(mode).ssl_ca(&cfg.ca_path)
        }
        None => options,
    }
}

pub async fn connect(cfg: &DatabaseConfig) -> anyhow::Result<MySqlPool> {
    let pool = MySqlPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .connect_with(connect_options(cfg))
        .await
        .with_context(|| format!("connect to database {}:{}", cfg.host, cfg.port))?;
    Ok(pool)
}

/// Creates the `users` table if needed. Failures are logged, not fatal.
pub async fn migrate(pool: &MySqlPool) {
    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => tracing::info!("users table ready"),
        Err(e) => tracing::warn!(error = %e, "migration failed; continuing"),
    }
}
