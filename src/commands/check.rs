// Check command - run every stage in memory over exam documents

use anyhow::Result;
use tracing::info;

use crate::cli::args::{CheckArgs, is_json};
use crate::config::Config;
use crate::diagnostics::{CheckReport, Diagnostic, DiagnosticCode, Stage};
use crate::pipeline;
use crate::utils::FileUtils;

pub fn handle_check(args: &CheckArgs, config: &Config) -> Result<()> {
    let json = is_json(args.format.as_deref(), &config.output.format);
    let symbols = config.symbol_table()?;
    let mut report = CheckReport::new();
    let mut files = Vec::new();

    for path in &args.files {
        if path.exists() {
            files.extend(FileUtils::collect_exam_files(path));
        } else {
            report.add_file(
                vec![Diagnostic::error(
                    &path.to_string_lossy(),
                    Stage::Input,
                    DiagnosticCode::PathNotFound,
                    "Path not found",
                    None,
                )],
                0,
            );
        }
    }

    info!("Checking {} file(s)...", files.len());

    for file in &files {
        let file_str = file.to_string_lossy().to_string();

        let source = match FileUtils::read_file(file) {
            Ok(source) => source,
            Err(e) => {
                report.add_file(
                    vec![Diagnostic::error(
                        &file_str,
                        Stage::Input,
                        DiagnosticCode::UnreadableFile,
                        format!("{:#}", e),
                        None,
                    )],
                    0,
                );
                continue;
            }
        };

        let check = pipeline::check_document(&source, &symbols);
        let diagnostics = check.diagnostics(&file_str);

        if !json {
            if check.is_clean() {
                println!(
                    "{} ... OK ({} question(s))",
                    file.display(),
                    check.semantic.records.len()
                );
            } else {
                println!("{} ... FAILED", file.display());
            }
        }

        report.add_file(diagnostics, check.semantic.records.len());
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for d in &report.diagnostics {
            println!("{}", d);
        }
        let summary = &report.summary;
        println!(
            "\n{} file(s) checked, {} with errors: {} error(s), {} warning(s)",
            summary.total_files,
            summary.files_with_errors,
            summary.total_errors,
            summary.total_warnings
        );
    }

    if report.has_errors() {
        std::process::exit(1);
    }
    Ok(())
}
