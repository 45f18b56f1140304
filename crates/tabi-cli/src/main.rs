mod budget_cmds;
mod config;
mod plan_cmd;
#[cfg(test)]
mod test_util;
mod wikipedia;

use clap::{Parser, Subcommand};

use config::TabiConfig;
use plan_cmd::PlanArgs;

#[derive(Parser)]
#[command(name = "tabi", about = "Travel itinerary generator and trip budget ledger")]
struct Cli {
    /// Ledger data directory (overrides TABI_DATA_DIR env var)
    #[arg(long, global = true)]
    data_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a tabi config file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Generate a day-by-day itinerary
    Plan {
        /// Where to go (e.g. 京都)
        destination: String,
        /// Trip length in days (1-7)
        #[arg(long, default_value_t = 3)]
        days: usize,
        /// Travel style, e.g. 食べ歩き, ゆったり, 写真映え, 落ち着いた
        #[arg(long, default_value = "")]
        style: String,
        /// Seed for a reproducible plan
        #[arg(long)]
        seed: Option<u64>,
        /// Give every day a theme
        #[arg(long)]
        themed: bool,
        /// Vary the tip on each slot
        #[arg(long)]
        random_tips: bool,
        /// Print the itinerary as JSON
        #[arg(long)]
        json: bool,
    },
    /// Trip budget ledger
    Budget {
        #[command(subcommand)]
        command: BudgetCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum BudgetCommands {
    /// Show budget, spend and expense history
    Show,
    /// Set the total budget in yen
    Set {
        amount: u64,
    },
    /// Record an expense in yen
    Add {
        amount: u64,
        /// Expense category (default: 未分類)
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete an expense by its history index
    Delete {
        index: usize,
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// Record an expense from receipt text (reads stdin when omitted)
    Receipt {
        text: Option<String>,
    },
    /// Clear the budget and all expenses
    Reset {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Execute the `tabi init` command: write config file.
fn cmd_init(data_dir: Option<&str>, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        store: config::StoreSection {
            data_dir: data_dir.map(str::to_string),
        },
        ..Default::default()
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    match data_dir {
        Some(dir) => println!("  store.data_dir = {dir}"),
        None => println!(
            "  store.data_dir = (default: {})",
            tabi_store::StoreConfig::default_data_dir().display()
        ),
    }
    println!("  search.endpoint = {}", cfg.search.endpoint);
    println!();
    println!("Next: run `tabi budget set <AMOUNT>` or `tabi plan <DESTINATION>`.");

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { force } => {
            cmd_init(cli.data_dir.as_deref(), force)?;
        }
        Commands::Plan {
            destination,
            days,
            style,
            seed,
            themed,
            random_tips,
            json,
        } => {
            let resolved = TabiConfig::resolve(cli.data_dir.as_deref())?;
            let args = PlanArgs {
                destination,
                days,
                style,
                seed,
                themed,
                random_tips,
                json,
            };
            plan_cmd::run_plan(&args, &resolved).await?;
        }
        Commands::Budget { command } => {
            let resolved = TabiConfig::resolve(cli.data_dir.as_deref())?;
            budget_cmds::run_budget_command(command, &resolved)?;
        }
    }

    Ok(())
}
