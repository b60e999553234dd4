// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::{Result, bail};
use teamfunds::application::LedgerService;
use teamfunds::domain::{SeedTeam, Team};
use teamfunds::storage::{MemoryStore, SqliteStore, TeamStore};
use tempfile::TempDir;

/// Three teams; "Design" matches the worked example (budget 1000.00).
pub fn standard_seed() -> Vec<SeedTeam> {
    vec![
        SeedTeam {
            id: 1,
            name: "Design".into(),
            budget: 100000,
        },
        SeedTeam {
            id: 2,
            name: "Hardware".into(),
            budget: 250000,
        },
        SeedTeam {
            id: 3,
            name: "Software".into(),
            budget: 50000,
        },
    ]
}

/// Helper to create a service backed by an in-memory store
pub async fn memory_service() -> Result<LedgerService<MemoryStore>> {
    Ok(LedgerService::open(MemoryStore::new(), standard_seed()).await?)
}

/// Helper to create a service with a temporary SQLite database
pub async fn sqlite_service() -> Result<(LedgerService<SqliteStore>, TempDir, String)> {
    let temp_dir = TempDir::new()?;
    let db_path = temp_dir.path().join("test.db");
    let db_path = db_path.to_str().unwrap().to_string();
    let service = LedgerService::init(&db_path, standard_seed()).await?;
    Ok((service, temp_dir, db_path))
}

/// Memory store whose saves can be switched to fail, like a full disk.
#[derive(Debug, Default)]
pub struct FailingStore {
    pub inner: MemoryStore,
    failing: AtomicBool,
}

impl FailingStore {
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl TeamStore for FailingStore {
    async fn load(&self) -> Result<Option<Vec<Team>>> {
        self.inner.load().await
    }

    async fn save(&self, teams: &[Team]) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            bail!("disk full");
        }
        self.inner.save(teams).await
    }
}
