pub mod migrate;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

/// Handle to the backing store. Cheap to clone; all services borrow it
/// and run plain sqlx queries against the pool.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect using `DATABASE_URL`, e.g. `sqlite:wortquiz.db?mode=rwc`.
    pub async fn from_env() -> Result<Self, DbInitError> {
        let url = std::env::var("DATABASE_URL").map_err(|_| DbInitError::Missing {
            key: "DATABASE_URL",
        })?;
        Self::connect(&url).await
    }

    pub async fn connect(url: &str) -> Result<Self, DbInitError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(DbInitError::Sqlx)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .connect_with(options)
            .await
            .map_err(DbInitError::Sqlx)?;

        Ok(Self { pool })
    }

    /// Open (or create) a database file at `path`.
    pub async fn open(path: &Path) -> Result<Self, DbInitError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DbInitError::Io)?;
        }
        let url = format!("sqlite:{}?mode=rwc", path.display());
        Self::connect(&url).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("missing environment variable {key}")]
    Missing { key: &'static str },
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
    #[error("failed to prepare database directory: {0}")]
    Io(#[source] std::io::Error),
}
