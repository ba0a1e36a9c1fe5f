// CLI argument definitions using Clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Exam document validator and question bank extractor
#[derive(Parser, Debug)]
#[command(name = "exambank")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Validate exam documents and extract a checked question bank", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose debug output
    #[arg(short = 'v', long, global = true, default_value_t = false)]
    pub verbose: bool,

    /// Use this configuration file instead of .exambankrc.toml
    #[arg(long, global = true, value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Show the effective configuration and exit
    #[arg(long, default_value_t = false)]
    pub show_config: bool,

    /// Create default configuration file
    #[arg(long, value_name = "CONFIG_FILE")]
    pub init_config: Option<PathBuf>,

    /// Print shell completion script (bash, zsh, fish, elvish, powershell)
    #[arg(long, value_name = "SHELL_TYPE", value_parser = ["bash", "zsh", "fish", "elvish", "powershell"])]
    pub completion: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan an exam document and write its token file
    Lex(LexArgs),

    /// Check the token file against the exam grammar
    Parse(ParseArgs),

    /// Check scores, counts and options; commit the question bank when clean
    Analyze(AnalyzeArgs),

    /// Run every stage in memory over documents or directories
    Check(CheckArgs),

    /// Summarize a committed question bank per question type
    Bank(BankArgs),
}

#[derive(Args, Debug, Clone)]
pub struct LexArgs {
    /// Exam document (defaults to paths.source)
    pub source: Option<PathBuf>,

    /// Token file to write (defaults to paths.tokens)
    #[arg(long, value_name = "FILE")]
    pub tokens: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Token file to read (defaults to paths.tokens)
    #[arg(long, value_name = "FILE")]
    pub tokens: Option<PathBuf>,

    /// Matched-token trace to write (defaults to paths.trace)
    #[arg(long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Do not write the trace file
    #[arg(long, default_value_t = false, conflicts_with = "trace")]
    pub no_trace: bool,

    /// Output format (text, json)
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct AnalyzeArgs {
    /// Token file to read (defaults to paths.tokens)
    #[arg(long, value_name = "FILE")]
    pub tokens: Option<PathBuf>,

    /// Question bank to commit (defaults to paths.question_bank)
    #[arg(long, value_name = "FILE")]
    pub bank: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Documents or directories to validate
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Output format (text, json)
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct BankArgs {
    /// Question bank to read (defaults to paths.question_bank)
    #[arg(long, value_name = "FILE")]
    pub bank: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(long)]
    pub format: Option<String>,
}

/// Resolve the output format: the flag wins over the configured default
pub fn is_json(flag: Option<&str>, configured: &str) -> bool {
    flag.unwrap_or(configured).eq_ignore_ascii_case("json")
}
