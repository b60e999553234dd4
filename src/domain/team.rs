use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::Cents;

pub type TeamId = i64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExpenseKind {
    /// Amount taken out of the remaining budget
    Deducted,
    /// Amount put back into the remaining budget
    Added,
}

impl ExpenseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseKind::Deducted => "Deducted",
            ExpenseKind::Added => "Added",
        }
    }
}

impl std::fmt::Display for ExpenseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One entry in a team's expense history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub amount: Cents,
    #[serde(rename = "type")]
    pub kind: ExpenseKind,
}

/// Result of a deduction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeductOutcome {
    Applied(ExpenseRecord),
    /// The pending amount exceeds what is left; nothing was changed.
    Rejected { remaining: Cents, requested: Cents },
}

impl DeductOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, DeductOutcome::Applied(_))
    }

    /// Message shown to the user after the attempt.
    pub fn notice(&self) -> &'static str {
        match self {
            DeductOutcome::Applied(_) => "Amount deducted successfully.",
            DeductOutcome::Rejected { .. } => {
                "Insufficient remaining budget. Nothing was deducted."
            }
        }
    }
}

/// Adding the pending amount would push the remaining budget out of range.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("adding {requested} cents to remaining budget {remaining} overflows")]
pub struct BudgetOverflow {
    pub remaining: Cents,
    pub requested: Cents,
}

pub const ADD_NOTICE: &str = "Money added successfully to the remaining budget.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub budget: Cents,
    pub remaining_budget: Cents,
    pub current_expense: Cents,
    pub expenses: Vec<ExpenseRecord>,
}

impl Team {
    pub fn new(id: TeamId, name: impl Into<String>, budget: Cents) -> Self {
        Self {
            id,
            name: name.into(),
            budget,
            remaining_budget: budget,
            current_expense: 0,
            expenses: Vec::new(),
        }
    }

    pub fn set_pending_expense(&mut self, amount: Cents) {
        self.current_expense = amount;
    }

    /// Take the pending amount out of the remaining budget, unless that
    /// would leave it negative or out of range.
    pub fn deduct(&mut self) -> DeductOutcome {
        let remaining = match self.remaining_budget.checked_sub(self.current_expense) {
            Some(remaining) if remaining >= 0 => remaining,
            _ => {
                return DeductOutcome::Rejected {
                    remaining: self.remaining_budget,
                    requested: self.current_expense,
                };
            }
        };

        let record = ExpenseRecord {
            amount: self.current_expense,
            kind: ExpenseKind::Deducted,
        };
        self.remaining_budget = remaining;
        self.expenses.push(record);
        self.current_expense = 0;
        DeductOutcome::Applied(record)
    }

    /// Put the pending amount back into the remaining budget. Only refused
    /// when the result does not fit; the team is then left untouched.
    pub fn add_expense(&mut self) -> Result<ExpenseRecord, BudgetOverflow> {
        let remaining = self
            .remaining_budget
            .checked_add(self.current_expense)
            .ok_or(BudgetOverflow {
                remaining: self.remaining_budget,
                requested: self.current_expense,
            })?;

        let record = ExpenseRecord {
            amount: self.current_expense,
            kind: ExpenseKind::Added,
        };
        self.remaining_budget = remaining;
        self.expenses.push(record);
        self.current_expense = 0;
        Ok(record)
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    /// Net amount spent so far (budget minus what is left).
    pub fn spent(&self) -> Cents {
        self.budget.saturating_sub(self.remaining_budget)
    }
}
