use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::domain::{Team, decode_teams, encode_teams};

use super::{MIGRATION_001_KV_STORE, TEAMS_KEY, TeamStore};

/// SQLite-backed key-value store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Connect to a SQLite database at the given URL.
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = SqlitePool::connect(database_url)
            .await
            .context("Failed to connect to database")?;
        Ok(Self::new(pool))
    }

    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(MIGRATION_001_KV_STORE)
            .execute(&self.pool)
            .await
            .context("Failed to run migration 001")?;
        Ok(())
    }

    /// Connect and migrate.
    pub async fn init(database_url: &str) -> Result<Self> {
        let store = Self::connect(database_url).await?;
        store.migrate().await?;
        Ok(store)
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("Failed to read key '{}'", key))?;

        Ok(row.map(|row| row.get::<String, _>("value")))
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await
        .with_context(|| format!("Failed to write key '{}'", key))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl TeamStore for SqliteStore {
    async fn load(&self) -> Result<Option<Vec<Team>>> {
        let Some(json) = self.get(TEAMS_KEY).await? else {
            debug!("no stored teams");
            return Ok(None);
        };
        let teams = decode_teams(&json).context("Failed to decode stored teams")?;
        debug!(count = teams.len(), "loaded teams");
        Ok(Some(teams))
    }

    async fn save(&self, teams: &[Team]) -> Result<()> {
        let json = encode_teams(teams).context("Failed to serialize teams")?;
        self.put(TEAMS_KEY, &json).await?;
        debug!(count = teams.len(), "saved teams");
        Ok(())
    }
}
