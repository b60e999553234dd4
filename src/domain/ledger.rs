use tracing::debug;

use super::{BudgetOverflow, Cents, DeductOutcome, ExpenseRecord, Team, TeamId};

/// The full set of teams. Teams are fixed once the ledger is built; only
/// their budget fields and histories change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeamLedger {
    teams: Vec<Team>,
}

impl TeamLedger {
    pub fn new(teams: Vec<Team>) -> Self {
        Self { teams }
    }

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Team> {
        self.teams.iter().find(|t| t.name == name)
    }

    fn team_mut(&mut self, id: TeamId) -> Option<&mut Team> {
        self.teams.iter_mut().find(|t| t.id == id)
    }

    pub fn set_pending_expense(&mut self, id: TeamId, amount: Cents) -> Option<()> {
        let team = self.team_mut(id)?;
        team.set_pending_expense(amount);
        Some(())
    }

    pub fn deduct(&mut self, id: TeamId) -> Option<DeductOutcome> {
        let team = self.team_mut(id)?;
        let outcome = team.deduct();
        debug!(
            team = team.id,
            applied = outcome.is_applied(),
            remaining = team.remaining_budget,
            "deduct"
        );
        Some(outcome)
    }

    pub fn add_expense(
        &mut self,
        id: TeamId,
    ) -> Option<Result<ExpenseRecord, BudgetOverflow>> {
        let team = self.team_mut(id)?;
        let result = team.add_expense();
        debug!(
            team = team.id,
            applied = result.is_ok(),
            remaining = team.remaining_budget,
            "add expense"
        );
        Some(result)
    }

    pub fn list_expenses(&self, id: TeamId) -> Option<&[ExpenseRecord]> {
        self.team(id).map(Team::expenses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseKind;

    fn ledger() -> TeamLedger {
        TeamLedger::new(vec![
            Team::new(1, "Design", 1000),
            Team::new(2, "Hardware", 5000),
        ])
    }

    #[test]
    fn test_scenario_reject_then_deduct_then_add() {
        let mut ledger = ledger();

        ledger.set_pending_expense(1, 1200).unwrap();
        let outcome = ledger.deduct(1).unwrap();
        assert!(!outcome.is_applied());
        assert_eq!(ledger.team(1).unwrap().remaining_budget, 1000);
        assert!(ledger.list_expenses(1).unwrap().is_empty());

        ledger.set_pending_expense(1, 300).unwrap();
        assert!(ledger.deduct(1).unwrap().is_applied());
        assert_eq!(ledger.team(1).unwrap().remaining_budget, 700);

        ledger.set_pending_expense(1, 50).unwrap();
        ledger.add_expense(1).unwrap().unwrap();
        assert_eq!(ledger.team(1).unwrap().remaining_budget, 750);

        let expenses = ledger.list_expenses(1).unwrap();
        assert_eq!(
            expenses,
            &[
                ExpenseRecord {
                    amount: 300,
                    kind: ExpenseKind::Deducted
                },
                ExpenseRecord {
                    amount: 50,
                    kind: ExpenseKind::Added
                },
            ]
        );
    }

    #[test]
    fn test_operations_touch_only_target_team() {
        let mut ledger = ledger();
        ledger.set_pending_expense(2, 400).unwrap();
        ledger.deduct(2).unwrap();

        let design = ledger.team(1).unwrap();
        assert_eq!(design.remaining_budget, 1000);
        assert!(design.expenses().is_empty());
        assert_eq!(ledger.team(2).unwrap().remaining_budget, 4600);
    }

    #[test]
    fn test_unknown_team() {
        let mut ledger = ledger();
        assert!(ledger.set_pending_expense(99, 10).is_none());
        assert!(ledger.deduct(99).is_none());
        assert!(ledger.add_expense(99).is_none());
        assert!(ledger.list_expenses(99).is_none());
    }

    #[test]
    fn test_find_by_name() {
        let ledger = ledger();
        assert_eq!(ledger.find_by_name("Hardware").map(|t| t.id), Some(2));
        assert!(ledger.find_by_name("hardware").is_none());
    }
}
