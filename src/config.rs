// Configuration file handling

use crate::symbols::{SymbolTable, SymbolTableError};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Config file name looked up in the current and home directories
pub const CONFIG_FILE_NAME: &str = ".exambankrc.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Exam document read by the lexer
    #[serde(default = "default_source")]
    pub source: PathBuf,

    /// Token file written by `lex`, read by `parse` and `analyze`
    #[serde(default = "default_tokens")]
    pub tokens: PathBuf,

    /// Matched-token trace written by `parse`
    #[serde(default = "default_trace")]
    pub trace: PathBuf,

    /// Question bank committed by `analyze`
    #[serde(default = "default_question_bank")]
    pub question_bank: PathBuf,

    /// Symbol table JSON; the built-in table is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbols: Option<PathBuf>,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source: default_source(),
            tokens: default_tokens(),
            trace: default_trace(),
            question_bank: default_question_bank(),
            symbols: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Default report format: text or json
    #[serde(default = "default_format")]
    pub format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
        }
    }
}

// Default values
pub fn default_source() -> PathBuf {
    PathBuf::from("exam.txt")
}

pub fn default_tokens() -> PathBuf {
    PathBuf::from("output/tokens.txt")
}

pub fn default_trace() -> PathBuf {
    PathBuf::from("output/parsed_tokens.txt")
}

pub fn default_question_bank() -> PathBuf {
    PathBuf::from("output/QuestionBank.txt")
}

fn default_format() -> String {
    String::from("text")
}

impl Config {
    /// Load configuration from default locations
    pub fn load() -> Option<Self> {
        // Check locations in order:
        // 1. .exambankrc.toml (current directory)
        // 2. ~/.exambankrc.toml (home directory)
        let mut paths = Vec::new();
        if let Ok(cwd) = std::env::current_dir() {
            paths.push(cwd.join(CONFIG_FILE_NAME));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(CONFIG_FILE_NAME));
        }

        let path = paths.iter().find(|path| path.exists())?;
        match Self::load_from_file(path) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!("Ignoring config {}: {:#}", path.display(), e);
                None
            }
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Generate configuration as TOML
    pub fn to_toml(&self) -> String {
        toml::to_string_pretty(self).unwrap_or_else(|_| String::new())
    }

    /// Symbol table named by `paths.symbols`, or the built-in one
    pub fn symbol_table(&self) -> Result<SymbolTable, SymbolTableError> {
        match &self.paths.symbols {
            Some(path) => SymbolTable::load(path),
            None => Ok(SymbolTable::default()),
        }
    }

    pub fn is_json(&self) -> bool {
        self.output.format.eq_ignore_ascii_case("json")
    }
}
