use crate::paging::{PageLimits, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use anyhow::{bail, Context, Result};
use std::net::SocketAddr;

/// Runtime settings, read from `FINANCE_*` environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    /// SQLite file, or `:memory:`
    pub database_path: String,
    /// Prefix of the alert headers (`X-{app_name}-alert`)
    pub app_name: String,
    pub page_limits: PageLimits,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; missing keys take their defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let bind_addr = read("FINANCE_BIND_ADDR", "0.0.0.0:3000")
            .parse::<SocketAddr>()
            .context("FINANCE_BIND_ADDR must be a valid host:port")?;

        let database_path = read("FINANCE_DB_PATH", "finance.db");
        let app_name = read("FINANCE_APP_NAME", "financeApp");

        let default_size = read("FINANCE_DEFAULT_PAGE_SIZE", &DEFAULT_PAGE_SIZE.to_string())
            .parse::<u32>()
            .context("FINANCE_DEFAULT_PAGE_SIZE must be u32")?;
        let max_size = read("FINANCE_MAX_PAGE_SIZE", &MAX_PAGE_SIZE.to_string())
            .parse::<u32>()
            .context("FINANCE_MAX_PAGE_SIZE must be u32")?;

        if default_size == 0 || default_size > max_size {
            bail!(
                "FINANCE_DEFAULT_PAGE_SIZE must be between 1 and FINANCE_MAX_PAGE_SIZE ({})",
                max_size
            );
        }

        Ok(AppConfig {
            bind_addr,
            database_path,
            app_name,
            page_limits: PageLimits {
                default_size,
                max_size,
            },
        })
    }
}
