// Lex command - scan a document and write its token file

use anyhow::Result;
use serde_json::json;

use super::print_stage_errors;
use crate::cli::args::{LexArgs, is_json};
use crate::config::Config;
use crate::pipeline;

pub fn handle_lex(args: &LexArgs, config: &Config) -> Result<()> {
    let source = args.source.as_ref().unwrap_or(&config.paths.source);
    let tokens_path = args.tokens.as_ref().unwrap_or(&config.paths.tokens);
    let symbols = config.symbol_table()?;

    let output = pipeline::run_lexical_analysis(source, tokens_path, &symbols)?;

    if is_json(args.format.as_deref(), &config.output.format) {
        let report = json!({
            "stage": "lexical",
            "ok": output.is_clean(),
            "tokens_file": tokens_path,
            "tokens": output.tokens,
            "errors": output.errors,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for token in &output.tokens {
            println!("{}", token.encode(&symbols));
        }
        println!(
            "{} question(s) in {} section(s), tokens written to {}",
            output.question_count(),
            output.sections.len(),
            tokens_path.display()
        );
        print_stage_errors("Lexical", &output.errors);
    }

    if !output.is_clean() {
        std::process::exit(1);
    }
    Ok(())
}
