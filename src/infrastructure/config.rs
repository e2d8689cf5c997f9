use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::warn;

const DEV_JWT_SECRET: &str = "dev-only-insecure-secret";
const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKind {
    Memory,
    File,
}

/// Runtime configuration, read once from the environment at startup
/// (`.env` files are honored via dotenv in `main`).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
    pub token_ttl_secs: u64,
    pub storage: StorageKind,
    pub data_file: PathBuf,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().context("PORT must be a number")?,
            Err(_) => 8080,
        };

        let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET is not set, using an insecure development secret");
            DEV_JWT_SECRET.to_string()
        });

        let token_ttl_secs = match std::env::var("TOKEN_TTL_SECS") {
            Ok(raw) => raw.parse().context("TOKEN_TTL_SECS must be a number")?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        let storage = match std::env::var("STORAGE").as_deref() {
            Ok("file") => StorageKind::File,
            Ok("memory") | Err(_) => StorageKind::Memory,
            Ok(other) => anyhow::bail!("STORAGE must be 'memory' or 'file', got '{other}'"),
        };

        let data_file = std::env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data.json"));

        Ok(Self {
            host,
            port,
            jwt_secret,
            token_ttl_secs,
            storage,
            data_file,
        })
    }
}
