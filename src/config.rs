use std::{env, path::PathBuf};

use anyhow::{Result, bail};

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_DATABASE_PATH: &str = "instance/feedback.db";
// Development fallback; set SECRET_KEY in production.
const DEFAULT_SECRET_KEY: &str = "feedback-app-secret-key-change-in-production";

// Key::derive_from rejects anything shorter.
const MIN_SECRET_LEN: usize = 32;

/// Process-wide configuration, read once at startup and immutable thereafter.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_path: PathBuf,
    pub secret_key: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let database_path = env::var("DATABASE_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));

        let secret_key =
            env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());
        if secret_key.len() < MIN_SECRET_LEN {
            bail!("SECRET_KEY must be at least {MIN_SECRET_LEN} bytes");
        }

        Ok(Self {
            port,
            database_path,
            secret_key,
        })
    }
}
