//! Process configuration read from the environment.

use anyhow::{Context, Result, anyhow};
use log::LevelFilter;
use std::net::SocketAddr;

use crate::logging::parse_level;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://liftlog.db";
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:3000";
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    pub log_level: LevelFilter,
    pub seed_on_start: bool,
    pub max_connections: u32,
}

impl Config {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());

        let bind_raw = lookup("LIFTLOG_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .trim()
            .parse::<SocketAddr>()
            .with_context(|| format!("LIFTLOG_BIND_ADDR is not a socket address: {bind_raw}"))?;

        let log_level = match lookup("LIFTLOG_LOG_LEVEL") {
            Some(raw) => {
                parse_level(&raw).ok_or_else(|| anyhow!("LIFTLOG_LOG_LEVEL is not a level: {raw}"))?
            }
            None => LevelFilter::Info,
        };

        let seed_on_start = match lookup("LIFTLOG_SEED") {
            Some(raw) => parse_bool(&raw)
                .ok_or_else(|| anyhow!("LIFTLOG_SEED is not a boolean: {raw}"))?,
            None => false,
        };

        let max_connections = match lookup("LIFTLOG_MAX_CONNECTIONS") {
            Some(raw) => raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow!("LIFTLOG_MAX_CONNECTIONS must be a positive integer: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            bind_addr,
            log_level,
            seed_on_start,
            max_connections,
        })
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim() {
        "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
        "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
        _ => None,
    }
}
