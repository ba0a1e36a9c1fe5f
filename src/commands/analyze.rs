// Analyze command - semantic checks and question bank commit

use anyhow::Result;
use serde_json::json;

use super::print_stage_errors;
use crate::bank;
use crate::cli::args::{AnalyzeArgs, is_json};
use crate::config::Config;
use crate::pipeline;

pub fn handle_analyze(args: &AnalyzeArgs, config: &Config) -> Result<()> {
    let tokens_path = args.tokens.as_ref().unwrap_or(&config.paths.tokens);
    let bank_path = args.bank.as_ref().unwrap_or(&config.paths.question_bank);
    let symbols = config.symbol_table()?;

    let run = pipeline::run_semantic_analysis(tokens_path, bank_path, &symbols)?;
    let output = &run.output;

    if is_json(args.format.as_deref(), &config.output.format) {
        let report = json!({
            "stage": "semantic",
            "ok": output.is_clean(),
            "committed": run.committed,
            "bank_file": bank_path,
            "records": output.records,
            "errors": output.errors,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for record in &output.records {
            println!("{}", bank::format_record(record));
        }
        print_stage_errors("Semantic", &output.errors);
        if run.committed {
            println!(
                "{} record(s) committed to {}",
                output.records.len(),
                bank_path.display()
            );
        } else {
            println!("Question bank not written");
        }
    }

    if !output.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
