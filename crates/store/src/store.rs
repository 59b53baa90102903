//! Connection pool and schema bootstrap.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool};

use crate::error::ServiceError;
use crate::MIGRATION_001_INITIAL;

/// Handle on the SQLite database.
#[derive(Debug, Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to the database at `database_url`, creating the file if it
    /// does not exist yet.
    pub async fn connect(database_url: &str) -> Result<Self, ServiceError> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(ServiceError::Storage)?
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Run embedded schema migrations.
    pub async fn migrate(&self) -> Result<(), ServiceError> {
        sqlx::raw_sql(MIGRATION_001_INITIAL).execute(&self.pool).await?;
        Ok(())
    }

    /// Connect and migrate in one step.
    pub async fn init(database_url: &str) -> Result<Self, ServiceError> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
