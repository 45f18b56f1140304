//! `tabi budget` subcommands: show, set, add, delete, receipt, reset.

use std::io::{BufRead, Read, Write};
use std::sync::Arc;

use anyhow::{Context, Result};

use tabi_core::ledger::{DEFAULT_CATEGORY, DEFAULT_LEDGER_KEY, Expense, LedgerService};
use tabi_store::JsonFileStore;

use crate::BudgetCommands;
use crate::config::TabiConfig;

/// Open the ledger under the configured data dir and run `command`.
pub fn run_budget_command(command: BudgetCommands, config: &TabiConfig) -> Result<()> {
    let store = Arc::new(JsonFileStore::new(config.store_config.clone()));
    let path = config.store_config.ledger_path(DEFAULT_LEDGER_KEY);
    let ledger = LedgerService::open(store, DEFAULT_LEDGER_KEY)
        .with_context(|| format!("failed to load ledger from {}", path.display()))?;

    // Receipt text may come from a pipe; prompts read from the terminal.
    let receipt_text = match &command {
        BudgetCommands::Receipt { text: None } => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read receipt text from stdin")?;
            Some(buf)
        }
        _ => None,
    };

    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let mut stdout = std::io::stdout().lock();
    execute(command, &ledger, receipt_text, &mut input, &mut stdout)
}

/// Run one subcommand against an open ledger.
///
/// `stdin_receipt` supplies the receipt text when the command carried none.
pub fn execute(
    command: BudgetCommands,
    ledger: &LedgerService,
    stdin_receipt: Option<String>,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        BudgetCommands::Show => show(ledger, out),
        BudgetCommands::Set { amount } => {
            ledger.set_budget(amount)?;
            writeln!(out, "Budget set.")?;
            print_summary(ledger, out)
        }
        BudgetCommands::Add { amount, category } => {
            let category = category.unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
            let expense = ledger.add_expense(amount, &category)?;
            writeln!(out, "Added: {}", describe(&expense))?;
            print_summary(ledger, out)
        }
        BudgetCommands::Delete { index, yes } => delete(ledger, index, yes, input, out),
        BudgetCommands::Receipt { text } => {
            let raw = text.or(stdin_receipt).unwrap_or_default();
            let expense = ledger.ingest_receipt_amount(&raw)?;
            writeln!(out, "Added from receipt: {}", describe(&expense))?;
            print_summary(ledger, out)
        }
        BudgetCommands::Reset { yes } => {
            if !yes && !confirm("Clear the budget and all expenses?", input, out)? {
                writeln!(out, "Reset cancelled.")?;
                return Ok(());
            }
            ledger.reset();
            writeln!(out, "Ledger cleared.")?;
            Ok(())
        }
    }
}

/// Two-phase delete: request, confirm (or cancel) in one command.
fn delete(
    ledger: &LedgerService,
    index: usize,
    yes: bool,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<()> {
    let pending = ledger.request_delete(index)?;
    let question = format!("Delete #{index} {}?", describe(&pending));

    if yes || confirm(&question, input, out)? {
        let removed = ledger.confirm_delete()?;
        writeln!(out, "Deleted: {}", describe(&removed))?;
        print_summary(ledger, out)
    } else {
        ledger.cancel_delete()?;
        writeln!(out, "Delete cancelled.")?;
        Ok(())
    }
}

fn show(ledger: &LedgerService, out: &mut dyn Write) -> Result<()> {
    print_summary(ledger, out)?;
    let state = ledger.snapshot();
    writeln!(out)?;
    if state.history.is_empty() {
        writeln!(out, "No expenses recorded.")?;
        return Ok(());
    }
    writeln!(out, "History:")?;
    for (i, expense) in state.history.iter().enumerate() {
        writeln!(out, "  [{i}] {}", describe(expense))?;
    }
    Ok(())
}

fn print_summary(ledger: &LedgerService, out: &mut dyn Write) -> Result<()> {
    let state = ledger.snapshot();
    writeln!(
        out,
        "Used: {} ({:.0}%)",
        state.summary(),
        state.percent_used().round()
    )?;
    Ok(())
}

fn describe(expense: &Expense) -> String {
    format!(
        "{} {} {} {}",
        expense.date,
        expense.time.format("%H:%M"),
        expense.category,
        tabi_core::ledger::format_yen(expense.amount)
    )
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm(question: &str, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<bool> {
    write!(out, "{question} [y/N] ")?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    let answer = answer.trim().to_ascii_lowercase();
    Ok(answer == "y" || answer == "yes")
}
