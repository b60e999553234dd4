use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::application::{AddResult, DeductResult, LedgerService, load_seed};
use crate::domain::{
    DEFAULT_SEED, DeductOutcome, SeedTeam, TeamId, format_cents, parse_cents,
};
use crate::storage::SqliteStore;

/// Teamfunds - Team Budget Ledger
#[derive(Parser)]
#[command(name = "teamfunds")]
#[command(about = "Track per-team budgets and the expenses drawn against them")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, default_value = "teamfunds.db")]
    pub database: String,

    /// JSON seed list used when the database holds no teams yet
    #[arg(long, global = true)]
    pub seed: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database and seed the teams
    Init,

    /// Show every team with its budget and remaining budget
    List,

    /// Deduct an amount from a team's remaining budget
    Deduct {
        /// Team id or name
        team: String,

        /// Amount to deduct (e.g., "300.00" or "300")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Add an amount back to a team's remaining budget
    Add {
        /// Team id or name
        team: String,

        /// Amount to add (e.g., "50.00" or "50")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show the expense history of a team
    Expenses {
        /// Team id or name
        team: String,
    },

    /// Restore every team to its seeded budget, discarding history
    Reset,

    /// Export data to CSV or JSON
    Export {
        /// What to export: teams, expenses, full
        export_type: String,

        /// Output file (stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Install the tracing subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_tracing(verbose: bool) {
    let default = if verbose { "teamfunds=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

impl Cli {
    fn read_seed(&self) -> Result<Vec<SeedTeam>> {
        let json = match &self.seed {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read seed file: {}", path))?,
            None => DEFAULT_SEED.to_string(),
        };
        Ok(load_seed(&json)?)
    }

    pub async fn run(self) -> Result<()> {
        init_tracing(self.verbose);
        let seed = self.read_seed()?;

        let mut service = if matches!(self.command, Commands::Init) {
            LedgerService::init(&self.database, seed).await?
        } else {
            LedgerService::connect(&self.database, seed)
                .await
                .with_context(|| {
                    format!(
                        "Failed to open database '{}'. Run 'teamfunds init' first",
                        self.database
                    )
                })?
        };

        match self.command {
            Commands::Init => {
                println!(
                    "Database initialized: {} ({} teams)",
                    self.database,
                    service.list_teams().len()
                );
            }

            Commands::List => run_list_command(&service),

            Commands::Deduct { team, amount } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let id = service.resolve_team(&team)?.id;
                let result = service.deduct_amount(id, amount_cents).await?;

                println!("{}", result.notice());
                println!("{}", describe_deduct(&result));
            }

            Commands::Add { team, amount } => {
                let amount_cents =
                    parse_cents(&amount).context("Invalid amount format. Use '50.00' or '50'")?;
                let id = service.resolve_team(&team)?.id;
                let result = service.add_amount(id, amount_cents).await?;

                println!("{}", result.notice());
                println!("{}", describe_add(&result));
            }

            Commands::Expenses { team } => {
                let id = service.resolve_team(&team)?.id;
                run_expenses_command(&service, id)?;
            }

            Commands::Reset => {
                service.reset().await?;
                println!("Reset {} teams to their seeded budgets", service.list_teams().len());
            }

            Commands::Export {
                export_type,
                output,
            } => {
                run_export_command(&service, &export_type, output.as_deref())?;
            }
        }

        service.store().close().await;
        Ok(())
    }
}

fn describe_deduct(result: &DeductResult) -> String {
    match result.outcome {
        DeductOutcome::Applied(record) => format!(
            "{}: deducted {} (remaining {})",
            result.team.name,
            format_cents(record.amount),
            format_cents(result.team.remaining_budget)
        ),
        DeductOutcome::Rejected {
            remaining,
            requested,
        } => format!(
            "{}: requested {}, remaining {}",
            result.team.name,
            format_cents(requested),
            format_cents(remaining)
        ),
    }
}

fn describe_add(result: &AddResult) -> String {
    format!(
        "{}: added {} (remaining {})",
        result.team.name,
        format_cents(result.record.amount),
        format_cents(result.team.remaining_budget)
    )
}

fn run_list_command(service: &LedgerService<SqliteStore>) {
    let teams = service.list_teams();
    if teams.is_empty() {
        println!("No teams found.");
        return;
    }

    println!("{:<4} {:<20} {:>12} {:>12}", "ID", "TEAM", "BUDGET", "REMAINING");
    println!("{}", "-".repeat(51));
    for team in teams {
        println!(
            "{:<4} {:<20} {:>12} {:>12}",
            team.id,
            truncate(&team.name, 20),
            format_cents(team.budget),
            format_cents(team.remaining_budget)
        );
    }
}

fn run_expenses_command(service: &LedgerService<SqliteStore>, id: TeamId) -> Result<()> {
    let team = service.get_team(id)?;
    println!("Expenses for {}", team.name);

    let expenses = service.list_expenses(id)?;
    if expenses.is_empty() {
        println!("No expenses recorded.");
        return Ok(());
    }
    for (index, expense) in expenses.iter().enumerate() {
        println!(
            "Expense {}: {} ({})",
            index + 1,
            format_cents(expense.amount),
            expense.kind
        );
    }
    Ok(())
}

fn run_export_command(
    service: &LedgerService<SqliteStore>,
    export_type: &str,
    output: Option<&str>,
) -> Result<()> {
    use crate::io::Exporter;
    use std::fs::File;
    use std::io::{Write, stdout};

    let exporter = Exporter::new(service.list_teams());

    let writer: Box<dyn Write> = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path))?;
            Box::new(file)
        }
        None => Box::new(stdout()),
    };

    match export_type {
        "teams" => {
            let count = exporter.export_teams_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} teams", count);
            }
        }
        "expenses" => {
            let count = exporter.export_expenses_csv(writer)?;
            if output.is_some() {
                eprintln!("Exported {} expense records", count);
            }
        }
        "full" => {
            let snapshot = exporter.export_full_json(writer)?;
            if output.is_some() {
                eprintln!("Exported full ledger: {} teams", snapshot.teams.len());
            }
        }
        _ => {
            anyhow::bail!(
                "Invalid export type '{}'. Valid types: teams, expenses, full",
                export_type
            );
        }
    }

    Ok(())
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", head)
    }
}
