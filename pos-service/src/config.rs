use std::env;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use common_auth::{JwtConfig, DEFAULT_TOKEN_TTL_SECONDS};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 5;

/// Startup configuration, read once and never mutated.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub log_dir: Option<PathBuf>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::from((self.host, self.port))
    }
}

pub fn load_app_config() -> Result<AppConfig> {
    config_from_lookup(|key| env::var(key).ok())
}

/// Builds the config from an arbitrary key lookup so tests need not touch the process env.
pub fn config_from_lookup<F>(lookup: F) -> Result<AppConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).and_then(|value| normalize_optional(&value));
    let required = |key: &str| get(key).ok_or_else(|| anyhow!("{key} must be set"));

    let secret = required("JWT_SECRET")?;
    let issuer = required("JWT_ISSUER")?;
    let ttl_seconds = parse_or("JWT_TTL_SECONDS", get("JWT_TTL_SECONDS"), DEFAULT_TOKEN_TTL_SECONDS)?;
    if ttl_seconds <= 0 {
        return Err(anyhow!("JWT_TTL_SECONDS must be positive"));
    }
    let leeway_seconds = parse_or("JWT_LEEWAY_SECONDS", get("JWT_LEEWAY_SECONDS"), 0u32)?;
    let jwt = JwtConfig::new(secret, issuer)
        .with_ttl(ttl_seconds)
        .with_leeway(leeway_seconds);

    let database_url = match get("DATABASE_URL") {
        Some(url) => url,
        None => database_url_from_parts(&required)?,
    };

    let host = get("HOST")
        .unwrap_or_else(|| DEFAULT_HOST.to_string())
        .parse::<IpAddr>()
        .context("HOST must be an IP address")?;
    let port = parse_or("PORT", get("PORT"), DEFAULT_PORT)?;
    let db_max_connections = parse_or(
        "DB_MAX_CONNECTIONS",
        get("DB_MAX_CONNECTIONS"),
        DEFAULT_DB_MAX_CONNECTIONS,
    )?;
    let log_dir = get("LOG_DIR").map(PathBuf::from);

    Ok(AppConfig {
        host,
        port,
        database_url,
        db_max_connections,
        log_dir,
        jwt,
    })
}

fn database_url_from_parts(required: &dyn Fn(&str) -> Result<String>) -> Result<String> {
    let username = required("DB_USERNAME").context("DATABASE_URL or DB_* settings required")?;
    let password = required("DB_PASSWORD")?;
    let host = required("DB_HOST")?;
    let port = required("DB_PORT")?;
    let name = required("DB_NAME")?;
    Ok(format!("postgres://{username}:{password}@{host}:{port}/{name}"))
}

fn parse_or<T>(key: &str, value: Option<String>, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .parse::<T>()
            .map_err(|err| anyhow!("Invalid {key} '{raw}': {err}")),
        None => Ok(default),
    }
}

fn normalize_optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
