use std::collections::HashSet;

use tracing::{debug, info};

use crate::domain::{
    Cents, DeductOutcome, ExpenseRecord, SeedTeam, Team, TeamId, TeamLedger, parse_seed,
};
use crate::storage::{SqliteStore, TeamStore};

use super::AppError;

/// Application service owning the team ledger and its store.
/// Every state change is written through to the store before returning.
pub struct LedgerService<S: TeamStore> {
    ledger: TeamLedger,
    store: S,
    seed: Vec<SeedTeam>,
}

/// Result of a deduction attempt
pub struct DeductResult {
    pub team: Team,
    pub outcome: DeductOutcome,
}

impl DeductResult {
    pub fn notice(&self) -> &'static str {
        self.outcome.notice()
    }
}

/// Result of adding money back to a team
pub struct AddResult {
    pub team: Team,
    pub record: ExpenseRecord,
}

impl AddResult {
    pub fn notice(&self) -> &'static str {
        crate::domain::ADD_NOTICE
    }
}

/// Parse and validate a JSON seed list.
pub fn load_seed(json: &str) -> Result<Vec<SeedTeam>, AppError> {
    let seed = parse_seed(json).map_err(|e| AppError::InvalidSeed(e.to_string()))?;
    let mut seen = HashSet::new();
    for team in &seed {
        if !seen.insert(team.id) {
            return Err(AppError::DuplicateTeam(team.id));
        }
    }
    Ok(seed)
}

fn ledger_from_seed(seed: &[SeedTeam]) -> TeamLedger {
    TeamLedger::new(seed.iter().cloned().map(Team::from).collect())
}

impl<S: TeamStore> LedgerService<S> {
    /// Load the ledger from the store, or build it from the seed list and
    /// store it when nothing has been persisted yet.
    pub async fn open(store: S, seed: Vec<SeedTeam>) -> Result<Self, AppError> {
        let ledger = match store.load().await? {
            Some(teams) => {
                debug!(count = teams.len(), "opened stored ledger");
                TeamLedger::new(teams)
            }
            None => {
                info!(count = seed.len(), "no stored teams, seeding");
                let ledger = ledger_from_seed(&seed);
                store.save(ledger.teams()).await?;
                ledger
            }
        };

        Ok(Self {
            ledger,
            store,
            seed,
        })
    }

    pub fn ledger(&self) -> &TeamLedger {
        &self.ledger
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn list_teams(&self) -> &[Team] {
        self.ledger.teams()
    }

    pub fn get_team(&self, id: TeamId) -> Result<&Team, AppError> {
        self.ledger
            .team(id)
            .ok_or_else(|| AppError::TeamNotFound(id.to_string()))
    }

    /// Look a team up by numeric id, falling back to its exact name.
    pub fn resolve_team(&self, key: &str) -> Result<&Team, AppError> {
        let by_id = key.trim().parse::<TeamId>().ok().and_then(|id| self.ledger.team(id));
        by_id
            .or_else(|| self.ledger.find_by_name(key))
            .ok_or_else(|| AppError::TeamNotFound(key.to_string()))
    }

    pub fn list_expenses(&self, id: TeamId) -> Result<&[ExpenseRecord], AppError> {
        self.ledger
            .list_expenses(id)
            .ok_or_else(|| AppError::TeamNotFound(id.to_string()))
    }

    pub async fn set_pending_expense(&mut self, id: TeamId, amount: Cents) -> Result<(), AppError> {
        let mut next = self.ledger.clone();
        next
            .set_pending_expense(id, amount)
            .ok_or_else(|| AppError::TeamNotFound(id.to_string()))?;
        self.commit(next).await
    }

    /// Deduct the team's pending amount. A deduction that would overdraw the
    /// remaining budget is reported in the outcome, not as an error.
    pub async fn deduct(&mut self, id: TeamId) -> Result<DeductResult, AppError> {
        let mut next = self.ledger.clone();
        let outcome = next
            .deduct(id)
            .ok_or_else(|| AppError::TeamNotFound(id.to_string()))?;
        if outcome.is_applied() {
            self.commit(next).await?;
        }
        Ok(DeductResult {
            team: self.get_team(id)?.clone(),
            outcome,
        })
    }

    pub async fn add_expense(&mut self, id: TeamId) -> Result<AddResult, AppError> {
        let mut next = self.ledger.clone();
        let record = next
            .add_expense(id)
            .ok_or_else(|| AppError::TeamNotFound(id.to_string()))??;
        self.commit(next).await?;
        Ok(AddResult {
            team: self.get_team(id)?.clone(),
            record,
        })
    }

    /// Set the pending amount and deduct it in one step.
    pub async fn deduct_amount(
        &mut self,
        id: TeamId,
        amount: Cents,
    ) -> Result<DeductResult, AppError> {
        self.set_pending_expense(id, amount).await?;
        self.deduct(id).await
    }

    /// Set the pending amount and add it in one step.
    pub async fn add_amount(&mut self, id: TeamId, amount: Cents) -> Result<AddResult, AppError> {
        self.set_pending_expense(id, amount).await?;
        self.add_expense(id).await
    }

    /// Rebuild every team from the seed list, discarding all history.
    pub async fn reset(&mut self) -> Result<(), AppError> {
        info!(count = self.seed.len(), "resetting ledger from seed");
        let next = ledger_from_seed(&self.seed);
        self.commit(next).await
    }

    /// Store `next`, and only then make it the current ledger, so a failed
    /// save leaves memory matching what is stored.
    async fn commit(&mut self, next: TeamLedger) -> Result<(), AppError> {
        self.store.save(next.teams()).await?;
        self.ledger = next;
        Ok(())
    }
}

impl LedgerService<SqliteStore> {
    /// Create (if needed) and migrate the database at `database_path`, then open.
    pub async fn init(database_path: &str, seed: Vec<SeedTeam>) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}?mode=rwc", database_path);
        let store = SqliteStore::init(&db_url).await?;
        Self::open(store, seed).await
    }

    /// Open an existing database.
    pub async fn connect(database_path: &str, seed: Vec<SeedTeam>) -> Result<Self, AppError> {
        let db_url = format!("sqlite:{}", database_path);
        let store = SqliteStore::connect(&db_url).await?;
        store.migrate().await?;
        Self::open(store, seed).await
    }
}
