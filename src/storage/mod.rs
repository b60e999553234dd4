mod memory;
mod sqlite;

pub use memory::*;
pub use sqlite::*;

use anyhow::Result;

use crate::domain::Team;

/// SQL migration for the key-value table
pub const MIGRATION_001_KV_STORE: &str = include_str!("migrations/001_kv_store.sql");

/// Key under which the team collection is stored.
pub const TEAMS_KEY: &str = "teams";

/// Persistence for the team collection. Loaded once when a service opens,
/// written after every change.
#[allow(async_fn_in_trait)]
pub trait TeamStore {
    /// Returns `None` when nothing has been stored yet.
    async fn load(&self) -> Result<Option<Vec<Team>>>;

    async fn save(&self, teams: &[Team]) -> Result<()>;
}
