use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::domain::{Team, format_cents};

/// Full ledger snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub teams: Vec<Team>,
}

/// Writes team data out as JSON or CSV.
pub struct Exporter<'a> {
    teams: &'a [Team],
}

impl<'a> Exporter<'a> {
    pub fn new(teams: &'a [Team]) -> Self {
        Self { teams }
    }

    /// Export every team, with history, as pretty-printed JSON.
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Utc::now(),
            teams: self.teams.to_vec(),
        };
        serde_json::to_writer_pretty(&mut writer, &snapshot)?;
        writeln!(writer)?;
        Ok(snapshot)
    }

    /// Export every expense record as one CSV row. Returns the row count.
    pub fn export_expenses_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["team_id", "team_name", "index", "amount", "type"])?;

        let mut count = 0;
        for team in self.teams {
            for (index, expense) in team.expenses().iter().enumerate() {
                csv_writer.write_record(&[
                    team.id.to_string(),
                    team.name.clone(),
                    (index + 1).to_string(),
                    format_cents(expense.amount),
                    expense.kind.to_string(),
                ])?;
                count += 1;
            }
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export current balances, one row per team.
    pub fn export_teams_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["team_id", "team_name", "budget", "remaining_budget", "spent"])?;

        for team in self.teams {
            csv_writer.write_record(&[
                team.id.to_string(),
                team.name.clone(),
                format_cents(team.budget),
                format_cents(team.remaining_budget),
                format_cents(team.spent()),
            ])?;
        }

        csv_writer.flush()?;
        Ok(self.teams.len())
    }
}
