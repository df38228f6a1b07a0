//! CLI command definitions.

pub mod categories;
pub mod environment;
pub mod planning;
pub mod recurring;
pub mod transactions;

use clap::{Args, Parser, Subcommand, ValueEnum};

use finanzas_core::finance::TransactionKind;

use crate::config::Environment;

/// Cached CLI client for the finanzas services.
#[derive(Debug, Parser)]
#[command(name = "finanzas")]
#[command(version, about = "Cached CLI client for the finanzas services", long_about = None)]
pub struct Cli {
    /// Target environment. Overrides any forced or detected environment.
    #[arg(long = "env", env = "FINANZAS_ENV", value_enum, global = true)]
    pub environment: Option<EnvironmentArg>,

    /// Output format.
    #[arg(long, default_value = "pretty", global = true)]
    pub format: OutputFormat,

    /// Suppress non-essential output.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Mask monetary values in pretty output.
    #[arg(long, global = true)]
    pub hide_balances: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Raw JSON output.
    Json,
    /// Human-readable output.
    #[default]
    Pretty,
}

/// Environment names accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum EnvironmentArg {
    Local,
    Docker,
    Hosted,
    #[value(alias = "prod")]
    Production,
}

impl From<EnvironmentArg> for Environment {
    fn from(arg: EnvironmentArg) -> Self {
        match arg {
            EnvironmentArg::Local => Environment::Local,
            EnvironmentArg::Docker => Environment::Docker,
            EnvironmentArg::Hosted => Environment::Hosted,
            EnvironmentArg::Production => Environment::Production,
        }
    }
}

/// Transaction kind accepted on the command line.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KindArg {
    Expense,
    Income,
}

impl From<KindArg> for TransactionKind {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Expense => TransactionKind::Expense,
            KindArg::Income => TransactionKind::Income,
        }
    }
}

/// Period selection for the dashboard.
#[derive(Debug, Default, Args)]
pub struct DashboardArgs {
    /// Year to report on. Defaults to the most recent month with data.
    #[arg(long)]
    pub year: Option<i32>,
    /// Month (1-12) within `--year`.
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
    /// Report on every period.
    #[arg(long, conflicts_with_all = ["year", "month"])]
    pub all: bool,
    /// Aggregate raw lists locally instead of using the analytics endpoints.
    #[arg(long)]
    pub legacy: bool,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Summary and breakdowns for a period.
    Dashboard(DashboardArgs),
    /// Years and months that have data.
    Periods,
    /// Expense management.
    Expenses(transactions::TransactionsCommand),
    /// Income management.
    Incomes(transactions::TransactionsCommand),
    /// Category management.
    Categories(categories::CategoriesCommand),
    /// Recurring transaction management.
    Recurring(recurring::RecurringCommand),
    /// Budgets.
    Budgets(planning::BudgetsCommand),
    /// Savings goals.
    Goals(planning::GoalsCommand),
    /// AI insights for a period, with a local fallback.
    Insights(DashboardArgs),
    /// Reload the dashboard whenever data changes.
    Watch(DashboardArgs),
    /// Environment selection.
    Env(environment::EnvCommand),
    /// Local cache maintenance.
    Cache(environment::CacheCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_dashboard() {
        let cli = Cli::try_parse_from([
            "finanzas", "dashboard", "--year", "2024", "--month", "3", "--hide-balances",
        ])
        .unwrap();
        assert!(cli.hide_balances);
        match cli.command {
            Commands::Dashboard(args) => {
                assert_eq!(args.year, Some(2024));
                assert_eq!(args.month, Some(3));
                assert!(!args.legacy);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_month_requires_year() {
        assert!(Cli::try_parse_from(["finanzas", "dashboard", "--month", "3"]).is_err());
        assert!(Cli::try_parse_from(["finanzas", "dashboard", "--year", "2024", "--month", "13"]).is_err());
    }

    #[test]
    fn test_environment_alias() {
        let cli = Cli::try_parse_from(["finanzas", "--env", "prod", "periods"]).unwrap();
        assert!(matches!(cli.environment, Some(EnvironmentArg::Production)));
    }
}
