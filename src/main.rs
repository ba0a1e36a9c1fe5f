// Main entry point for exambank

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use exambank::cli::{Cli, Commands};
use exambank::commands;
use exambank::config::{self, Config};
use exambank::logging;
use exambank::utils::FileUtils;

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .event_format(logging::StageFormatter)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(logging::default_filter(cli.verbose))),
        )
        .init();

    if cli.verbose {
        info!("Starting exambank v{}", env!("CARGO_PKG_VERSION"));
    }

    // Handle completion flag
    if let Some(shell_type) = &cli.completion {
        return commands::handle_completion(shell_type);
    }

    // Handle init_config flag
    if let Some(config_file) = &cli.init_config {
        FileUtils::write_file(config_file, &Config::default().to_toml())?;
        println!("Configuration file created: {}", config_file.display());
        println!("\nYou can now edit the file to customize your settings.");
        return Ok(());
    }

    // Explicit --config-file must load; discovered files are best effort
    let (config, origin) = match &cli.config_file {
        Some(path) => (
            Config::load_from_file(path)?,
            Some(path.display().to_string()),
        ),
        None => match Config::load() {
            Some(config) => (config, Some(config::CONFIG_FILE_NAME.to_string())),
            None => (Config::default(), None),
        },
    };

    if cli.show_config {
        match origin {
            Some(origin) => println!("# Loaded from {}", origin),
            None => println!("# No configuration file loaded, using built-in defaults"),
        }
        print!("{}", config.to_toml());
        return Ok(());
    }

    match &cli.command {
        Some(Commands::Lex(args)) => commands::handle_lex(args, &config),
        Some(Commands::Parse(args)) => commands::handle_parse(args, &config),
        Some(Commands::Analyze(args)) => commands::handle_analyze(args, &config),
        Some(Commands::Check(args)) => commands::handle_check(args, &config),
        Some(Commands::Bank(args)) => commands::handle_bank(args, &config),
        None => {
            warn!("No command given. Use 'exambank --help' for usage.");
            Ok(())
        }
    }
}
