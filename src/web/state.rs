use std::fs;

use anyhow::{Context, Result};
use axum::extract::FromRef;
use axum_extra::extract::cookie::Key;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};

use crate::{config::AppConfig, web::schema};

#[derive(Clone)]
pub struct AppState {
    pool: SqlitePool,
    signing_key: Key,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> Result<Self> {
        if let Some(parent) = config.database_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .context("failed to create database directory")?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.database_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to open SQLite database")?;

        schema::ensure_schema(&pool)
            .await
            .context("failed to create database schema")?;

        let signing_key = Key::derive_from(config.secret_key.as_bytes());

        Ok(Self { pool, signing_key })
    }

    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    pub fn pool_ref(&self) -> &SqlitePool {
        &self.pool
    }
}

impl FromRef<AppState> for Key {
    fn from_ref(state: &AppState) -> Self {
        state.signing_key.clone()
    }
}
