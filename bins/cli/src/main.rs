//! Ohada command-line front.
//!
//! Usage:
//!   ohada balance <accounts.json> [--flat] [--rollup] [--tolerance N]
//!   ohada ledger <ledger.json> [--account CODE]
//!   ohada closure <period.json> [--execute] [--validate]
//!
//! Results are printed to stdout as JSON; logs go to stderr.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ohada_core::balance::{BalanceAccount, BalanceService, EquilibriumPolicy};
use ohada_core::closure::{
    ClosurePeriod, ClosureService, OpenPeriodInput, StepCategory, StepStatus, compliance_score,
    global_progress, progress_by_phase,
};
use ohada_core::reports::{LedgerAccountInput, ReportService};
use ohada_shared::AppConfig;
use ohada_shared::types::{Currency, Money};

#[derive(Parser)]
#[command(name = "ohada")]
#[command(about = "SYSCOHADA balance, ledger and closure tools")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true, env = "OHADA_JSON_LOGS")]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trial balance with class subtotals and equilibrium checks
    Balance {
        /// JSON array of accounts
        file: PathBuf,

        /// Accounts are a flat list linked by `parent` codes
        #[arg(long)]
        flat: bool,

        /// Recompute parent figures from their leaves
        #[arg(long)]
        rollup: bool,

        /// Accept a debit/credit gap up to this amount
        #[arg(long)]
        tolerance: Option<Decimal>,
    },

    /// General ledger with running balances
    Ledger {
        /// JSON object with `from`, `to` and `accounts`
        file: PathBuf,

        /// Print a single account section
        #[arg(long)]
        account: Option<String>,
    },

    /// Closure checklist progress
    Closure {
        /// JSON closure period (name, kind, start, end, steps)
        file: PathBuf,

        /// Run every step that can start, in checklist order
        #[arg(long)]
        execute: bool,

        /// Validate the period afterwards
        #[arg(long)]
        validate: bool,
    },
}

#[derive(Deserialize)]
struct LedgerFile {
    from: NaiveDate,
    to: NaiveDate,
    accounts: Vec<LedgerAccountInput>,
}

#[derive(Serialize)]
struct PhaseProgress {
    category: StepCategory,
    progress: u8,
}

#[derive(Serialize)]
struct ClosureSummary {
    global_progress: u8,
    phases: Vec<PhaseProgress>,
    compliance_score: u8,
    missing_approvals: Vec<String>,
    period: ClosurePeriod,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let config = AppConfig::load().context("Failed to load configuration")?;

    match cli.command {
        Commands::Balance {
            file,
            flat,
            rollup,
            tolerance,
        } => balance(&config, &file, flat, rollup, tolerance),
        Commands::Ledger { file, account } => ledger(&file, account.as_deref()),
        Commands::Closure {
            file,
            execute,
            validate,
        } => closure(&config, &file, execute, validate).await,
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "ohada_core=info,ohada=info".into());

    tracing_subscriber::registry()
        .with(filter)
        .with(json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .init();
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("Invalid JSON in {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn balance(
    config: &AppConfig,
    file: &Path,
    flat: bool,
    rollup: bool,
    tolerance: Option<Decimal>,
) -> anyhow::Result<()> {
    let accounts: Vec<BalanceAccount> = read_json(file)?;
    let mut forest = if flat {
        BalanceService::build_forest(accounts)?
    } else {
        accounts
    };

    if rollup {
        forest = BalanceService::rollup(forest);
    } else {
        for mismatch in BalanceService::verify_rollup(&forest) {
            warn!(code = %mismatch.code, "Parent figures differ from the sum of its children");
        }
    }

    let policy = tolerance.map_or(EquilibriumPolicy::Strict, EquilibriumPolicy::Tolerance);
    let report = ReportService::generate_trial_balance(&forest, &config.ledger.currency, policy);
    info!(
        accounts = BalanceService::count_accounts(&forest),
        balanced = report.equilibrium.is_balanced,
        "Trial balance generated"
    );
    if let Ok(currency) = config.ledger.currency.parse::<Currency>() {
        info!(
            closing_debit = %Money::new(report.totals.closing_debit, currency).format_fr(),
            closing_credit = %Money::new(report.totals.closing_credit, currency).format_fr(),
            "Closing totals"
        );
    }
    print_json(&report)
}

fn ledger(file: &Path, account: Option<&str>) -> anyhow::Result<()> {
    let input: LedgerFile = read_json(file)?;
    let ledger = ReportService::generate_general_ledger(input.accounts, input.from, input.to)?;
    info!(
        accounts = ledger.accounts.len(),
        balanced = ledger.is_balanced,
        "General ledger generated"
    );

    match account {
        Some(code) => print_json(ReportService::ledger_account(&ledger, code)?),
        None => print_json(&ledger),
    }
}

async fn closure(
    config: &AppConfig,
    file: &Path,
    execute: bool,
    validate: bool,
) -> anyhow::Result<()> {
    let input: OpenPeriodInput = read_json(file)?;
    let service = ClosureService::new(config.closure.clone());
    let period = service.open_period(input)?;

    if execute {
        for step in service.list_steps(period.id)? {
            if !step.status.can_transition_to(StepStatus::InProgress) {
                continue;
            }
            if let Err(err) = service.execute_step(period.id, step.id).await {
                warn!(step = %step.name, error = %err, "Step not executed");
            }
        }
    }

    if validate {
        service.validate_period(period.id)?;
    }

    let period = service.period(period.id)?;
    let summary = ClosureSummary {
        global_progress: global_progress(&period.steps),
        phases: progress_by_phase(&period.steps)
            .into_iter()
            .map(|(category, progress)| PhaseProgress { category, progress })
            .collect(),
        compliance_score: compliance_score(&period.steps),
        missing_approvals: period.missing_approvals(),
        period,
    };
    print_json(&summary)
}
