// Bank command - per-type counts of a committed question bank

use anyhow::{Context, Result};

use crate::bank;
use crate::cli::args::{BankArgs, is_json};
use crate::config::Config;

pub fn handle_bank(args: &BankArgs, config: &Config) -> Result<()> {
    let bank_path = args.bank.as_ref().unwrap_or(&config.paths.question_bank);

    let records = bank::load_bank(bank_path)
        .with_context(|| format!("Failed to load question bank {}", bank_path.display()))?;
    let summary = bank::count_by_type(&records);

    if is_json(args.format.as_deref(), &config.output.format) {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("{}", bank_path.display());
    for entry in &summary.by_type {
        println!("  {:<6} {:>4}", entry.label, entry.count);
    }
    if summary.unknown > 0 {
        println!("  {:<6} {:>4}", "other", summary.unknown);
    }
    println!("  total  {:>4}", summary.total);

    Ok(())
}
