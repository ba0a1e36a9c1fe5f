// Commands module - handles CLI command execution

use anyhow::Result;

pub mod analyze;
pub mod bank;
pub mod check;
pub mod lex;
pub mod parse;

pub use analyze::handle_analyze;
pub use bank::handle_bank;
pub use check::handle_check;
pub use lex::handle_lex;
pub use parse::handle_parse;

/// Handle shell completion
pub fn handle_completion(shell_type: &str) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{Shell, generate};

    let shell = match shell_type.to_lowercase().as_str() {
        "bash" => Shell::Bash,
        "zsh" => Shell::Zsh,
        "fish" => Shell::Fish,
        "elvish" => Shell::Elvish,
        "powershell" => Shell::PowerShell,
        _ => {
            anyhow::bail!(
                "Unsupported shell: {}. Supported: bash, zsh, fish, elvish, powershell",
                shell_type
            );
        }
    };

    let mut cmd = crate::cli::Cli::command();
    let name = cmd.get_name().to_string();
    let mut stdout = std::io::stdout();

    generate(shell, &mut cmd, name, &mut stdout);

    Ok(())
}

/// Print one stage's errors, or `OK`, in text mode
fn print_stage_errors<E: std::fmt::Display>(stage: &str, errors: &[E]) {
    if errors.is_empty() {
        println!("{} analysis ... OK", stage);
        return;
    }
    println!("{} analysis ... {} error(s)", stage, errors.len());
    for error in errors {
        println!("  {}", error);
    }
}
