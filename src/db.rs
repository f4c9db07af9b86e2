use std::time::Duration;

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use thiserror::Error;
use uuid::Uuid;

use crate::config::AppConfig;

/// Failures surfaced by the user and meal plan stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The caller passed an identifier that is not a well-formed id.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("not found")]
    NotFound,

    /// A unique index rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("password hashing failed: {0}")]
    Password(String),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub async fn create_pool(config: &AppConfig) -> anyhow::Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db.max_connections)
        .acquire_timeout(Duration::from_secs(config.db.acquire_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("connect to database")
}

/// Parses a store-generated id. `what` names the parameter in the error.
pub fn parse_id(raw: &str, what: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| StoreError::InvalidArgument(format!("{what} is not a valid id: {raw:?}")))
}

/// Turns a unique index violation into `Conflict`, everything else into `Database`.
pub fn conflict_on_unique(e: sqlx::Error, message: &str) -> StoreError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return StoreError::Conflict(message.to_owned());
        }
    }
    StoreError::Database(e)
}
