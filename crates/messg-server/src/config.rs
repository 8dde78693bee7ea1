use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use uuid::Uuid;

/// Log filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "messg=debug,messg_api=debug,messg_db=info,tower_http=debug";

pub struct Config {
    pub host: String,
    pub port: u16,
    pub db_path: PathBuf,
    /// Mount point of the message routes, e.g. `/api`. Empty mounts at the root.
    pub base_path: String,
    /// Keys inserted at startup if not already stored.
    pub api_keys: Vec<Uuid>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("MESSG_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = lookup("MESSG_PORT")
            .unwrap_or_else(|| "8000".into())
            .parse()
            .context("MESSG_PORT must be a port number")?;
        let db_path: PathBuf = lookup("MESSG_DB_PATH")
            .unwrap_or_else(|| "messg.db".into())
            .into();
        let base_path = normalize_base_path(
            &lookup("MESSG_BASE_PATH").unwrap_or_else(|| "/api".into()),
        )?;
        let api_keys = parse_api_keys(&lookup("MESSG_API_KEYS").unwrap_or_default())?;

        Ok(Self {
            host,
            port,
            db_path,
            base_path,
            api_keys,
        })
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}

fn normalize_base_path(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed == "/" {
        return Ok(String::new());
    }
    if !trimmed.starts_with('/') || trimmed.ends_with('/') {
        bail!("MESSG_BASE_PATH must start with '/' and not end with '/' (got {:?})", raw);
    }
    Ok(trimmed.to_string())
}

fn parse_api_keys(raw: &str) -> Result<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Uuid::parse_str(s).with_context(|| format!("MESSG_API_KEYS: {:?} is not a UUID", s)))
        .collect()
}
