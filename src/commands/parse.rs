// Parse command - check the token file against the exam grammar

use anyhow::Result;
use serde_json::json;

use super::print_stage_errors;
use crate::cli::args::{ParseArgs, is_json};
use crate::config::Config;
use crate::pipeline;

pub fn handle_parse(args: &ParseArgs, config: &Config) -> Result<()> {
    let tokens_path = args.tokens.as_ref().unwrap_or(&config.paths.tokens);
    let trace_path = if args.no_trace {
        None
    } else {
        Some(args.trace.as_ref().unwrap_or(&config.paths.trace))
    };
    let symbols = config.symbol_table()?;

    let report =
        pipeline::run_syntax_analysis(tokens_path, trace_path.map(|p| p.as_path()), &symbols)?;

    if is_json(args.format.as_deref(), &config.output.format) {
        let out = json!({
            "stage": "syntax",
            "ok": report.ok,
            "trace_file": trace_path,
            "errors": report.errors,
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        print_stage_errors("Syntax", &report.errors);
        if let Some(path) = trace_path {
            println!("Trace written to {}", path.display());
        }
    }

    if !report.ok {
        std::process::exit(1);
    }
    Ok(())
}
