use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::{Cents, ExpenseRecord, Team, TeamId};

/// Seed list bundled with the binary, used when nothing has been persisted yet.
pub const DEFAULT_SEED: &str = include_str!("seed.json");

/// Initial team definition from a seed list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedTeam {
    pub id: TeamId,
    pub name: String,
    pub budget: Cents,
}

impl From<SeedTeam> for Team {
    fn from(seed: SeedTeam) -> Self {
        Team::new(seed.id, seed.name, seed.budget)
    }
}

pub fn parse_seed(json: &str) -> Result<Vec<SeedTeam>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Team as found in storage. Older or hand-edited data may lack fields or
/// carry a non-array `expenses`, so decoding is lenient here and strict
/// nowhere else.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTeam {
    id: TeamId,
    name: String,
    budget: Cents,
    #[serde(default)]
    remaining_budget: Option<Cents>,
    #[serde(default)]
    expenses: serde_json::Value,
}

impl StoredTeam {
    fn into_team(self) -> Team {
        let expenses = match self.expenses {
            serde_json::Value::Array(items) => items
                .into_iter()
                .filter_map(|item| match serde_json::from_value::<ExpenseRecord>(item) {
                    Ok(record) => Some(record),
                    Err(e) => {
                        warn!(team = self.id, error = %e, "dropping malformed expense record");
                        None
                    }
                })
                .collect(),
            serde_json::Value::Null => Vec::new(),
            other => {
                warn!(team = self.id, found = %other, "expenses is not an array, resetting");
                Vec::new()
            }
        };

        Team {
            id: self.id,
            name: self.name,
            budget: self.budget,
            remaining_budget: self.remaining_budget.unwrap_or(self.budget),
            // Pending input never survives a reload.
            current_expense: 0,
            expenses,
        }
    }
}

/// Serialize teams into the stored JSON form.
pub fn encode_teams(teams: &[Team]) -> Result<String, serde_json::Error> {
    serde_json::to_string(teams)
}

#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("invalid stored teams: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate team id in stored teams: {0}")]
    DuplicateTeam(TeamId),
}

/// Decode teams from the stored JSON form. Team ids must be unique.
pub fn decode_teams(json: &str) -> Result<Vec<Team>, DecodeError> {
    let stored: Vec<StoredTeam> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for team in &stored {
        if !seen.insert(team.id) {
            return Err(DecodeError::DuplicateTeam(team.id));
        }
    }
    Ok(stored.into_iter().map(StoredTeam::into_team).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseKind;

    #[test]
    fn test_default_seed_parses() {
        let seed = parse_seed(DEFAULT_SEED).unwrap();
        assert!(!seed.is_empty());
        let mut ids: Vec<_> = seed.iter().map(|s| s.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), seed.len(), "seed ids must be unique");
    }

    #[test]
    fn test_team_from_seed() {
        let team: Team = SeedTeam {
            id: 3,
            name: "Software".into(),
            budget: 250000,
        }
        .into();
        assert_eq!(team.remaining_budget, 250000);
        assert_eq!(team.current_expense, 0);
        assert!(team.expenses.is_empty());
    }

    #[test]
    fn test_encode_uses_camel_case() {
        let json = encode_teams(&[Team::new(1, "Design", 1000)]).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"name":"Design","budget":1000,"remainingBudget":1000,"currentExpense":0,"expenses":[]}]"#
        );
    }

    #[test]
    fn test_roundtrip_resets_pending() {
        let mut team = Team::new(1, "Design", 1000);
        team.set_pending_expense(300);
        team.deduct();
        team.set_pending_expense(77);

        let decoded = decode_teams(&encode_teams(&[team.clone()]).unwrap()).unwrap();

        assert_eq!(decoded.len(), 1);
        let back = &decoded[0];
        assert_eq!(back.id, team.id);
        assert_eq!(back.name, team.name);
        assert_eq!(back.budget, team.budget);
        assert_eq!(back.remaining_budget, 700);
        assert_eq!(back.expenses, team.expenses);
        assert_eq!(back.current_expense, 0);
    }

    #[test]
    fn test_decode_coerces_non_array_expenses() {
        let json = r#"[
            {"id":1,"name":"Design","budget":1000,"remainingBudget":400,"currentExpense":5,"expenses":"oops"},
            {"id":2,"name":"Hardware","budget":500,"remainingBudget":500,"expenses":{"amount":1}}
        ]"#;
        let teams = decode_teams(json).unwrap();
        assert!(teams.iter().all(|t| t.expenses.is_empty()));
        assert_eq!(teams[0].remaining_budget, 400);
        assert_eq!(teams[0].current_expense, 0);
    }

    #[test]
    fn test_decode_missing_fields() {
        let teams = decode_teams(r#"[{"id":1,"name":"Design","budget":1000}]"#).unwrap();
        assert_eq!(teams[0].remaining_budget, 1000);
        assert!(teams[0].expenses.is_empty());
    }

    #[test]
    fn test_decode_skips_malformed_records() {
        let json = r#"[{"id":1,"name":"Design","budget":1000,"remainingBudget":900,
            "expenses":[{"amount":100,"type":"Deducted"},{"amount":"x"},{"amount":5,"type":"Refund"}]}]"#;
        let teams = decode_teams(json).unwrap();
        assert_eq!(
            teams[0].expenses,
            vec![ExpenseRecord {
                amount: 100,
                kind: ExpenseKind::Deducted
            }]
        );
    }

    #[test]
    fn test_decode_rejects_non_array_document() {
        assert!(matches!(
            decode_teams(r#"{"id":1}"#),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_decode_rejects_duplicate_ids() {
        let json = r#"[{"id":1,"name":"Design","budget":1000},
            {"id":2,"name":"Hardware","budget":500},
            {"id":1,"name":"Design again","budget":10}]"#;
        assert!(matches!(
            decode_teams(json),
            Err(DecodeError::DuplicateTeam(1))
        ));
    }
}
