use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};

use crate::domain::{Team, decode_teams, encode_teams};

use super::TeamStore;

/// In-process store holding the serialized teams. Goes through the same
/// JSON encoding as the SQLite store, so reloads behave identically.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with raw stored JSON, as if written by an earlier run.
    pub fn with_raw(json: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(json.into())),
            saves: Mutex::new(0),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Number of completed saves.
    pub fn save_count(&self) -> usize {
        self.saves.lock().map(|n| *n).unwrap_or(0)
    }
}

impl TeamStore for MemoryStore {
    async fn load(&self) -> Result<Option<Vec<Team>>> {
        let raw = self.raw();
        raw.map(|json| decode_teams(&json).context("Failed to decode stored teams"))
            .transpose()
    }

    async fn save(&self, teams: &[Team]) -> Result<()> {
        let json = encode_teams(teams).context("Failed to serialize teams")?;
        *self.slot.lock().map_err(|_| anyhow!("memory store poisoned"))? = Some(json);
        *self.saves.lock().map_err(|_| anyhow!("memory store poisoned"))? += 1;
        Ok(())
    }
}
