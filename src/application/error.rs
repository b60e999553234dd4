use thiserror::Error;

use crate::domain::{BudgetOverflow, ParseAmountError, TeamId};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Team not found: {0}")]
    TeamNotFound(String),

    #[error("Duplicate team id in seed list: {0}")]
    DuplicateTeam(TeamId),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] ParseAmountError),

    #[error("Amount out of range: {0}")]
    BudgetOverflow(#[from] BudgetOverflow),

    #[error("Invalid seed list: {0}")]
    InvalidSeed(String),

    #[error("Storage error: {0}")]
    Storage(#[from] anyhow::Error),
}
