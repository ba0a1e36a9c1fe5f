// Stage entry points over files, plus an in-memory check of a whole document
//
// Each file-based stage re-reads the persisted token file, so stages can be run
// (and re-run) independently of each other.

use crate::bank;
use crate::diagnostics::{Diagnostic, DiagnosticCode, Stage};
use crate::lexer::{self, LexOutput};
use crate::parser::{Parser, SyntaxReport};
use crate::semantics::{self, SemanticOutput};
use crate::symbols::SymbolTable;
use crate::token::{self, Token};
use crate::utils::FileUtils;
use anyhow::{Context, Result};
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

/// Lex `source` and persist the token file
pub fn run_lexical_analysis(
    source: &Path,
    tokens_out: &Path,
    symbols: &SymbolTable,
) -> Result<LexOutput> {
    let text = FileUtils::read_file(source)?;
    let output = lexer::lex(&text);

    FileUtils::write_file(tokens_out, &token::write_tokens(&output.tokens, symbols))?;
    info!(
        "Wrote {} token(s) from {} to {}",
        output.tokens.len(),
        source.display(),
        tokens_out.display()
    );

    Ok(output)
}

/// Read a persisted token file
pub fn load_tokens(path: &Path, symbols: &SymbolTable) -> Result<Vec<Token>> {
    let text = FileUtils::read_file(path)?;
    token::read_tokens(&text, symbols)
        .with_context(|| format!("Invalid token file: {}", path.display()))
}

/// Parse the token file, optionally writing the matched-token trace
pub fn run_syntax_analysis(
    tokens_path: &Path,
    trace_out: Option<&Path>,
    symbols: &SymbolTable,
) -> Result<SyntaxReport> {
    let tokens = load_tokens(tokens_path, symbols)?;

    let mut trace = match trace_out {
        Some(path) => {
            FileUtils::ensure_parent_dir(path)?;
            let file = std::fs::File::create(path)
                .with_context(|| format!("Failed to create trace file: {}", path.display()))?;
            Some(BufWriter::new(file))
        }
        None => None,
    };

    let mut parser = Parser::new(&tokens, symbols);
    if let Some(writer) = trace.as_mut() {
        parser = parser.with_trace(writer);
    }
    let ok = parser.parse();
    let errors = parser.into_errors();

    if let (Some(mut writer), Some(path)) = (trace, trace_out) {
        writer
            .flush()
            .with_context(|| format!("Failed to write trace file: {}", path.display()))?;
    }

    Ok(SyntaxReport { ok, errors })
}

/// Outcome of the semantic stage over a token file
#[derive(Debug, Clone)]
pub struct SemanticRun {
    pub output: SemanticOutput,
    /// Whether the question bank was (re)written
    pub committed: bool,
}

/// Analyze the token file and commit the question bank on a clean pass
pub fn run_semantic_analysis(
    tokens_path: &Path,
    bank_out: &Path,
    symbols: &SymbolTable,
) -> Result<SemanticRun> {
    let tokens = load_tokens(tokens_path, symbols)?;
    let output = semantics::analyze_tokens(&tokens, symbols);
    let committed = bank::commit(bank_out, &output)?;
    Ok(SemanticRun { output, committed })
}

/// All three stages over one document, nothing written
#[derive(Debug, Clone)]
pub struct DocumentCheck {
    pub lex: LexOutput,
    pub syntax: SyntaxReport,
    pub semantic: SemanticOutput,
}

impl DocumentCheck {
    pub fn is_clean(&self) -> bool {
        self.lex.is_clean() && self.syntax.ok && self.semantic.is_clean()
    }

    /// Every stage's findings for `file`, in stage order
    pub fn diagnostics(&self, file: &str) -> Vec<Diagnostic> {
        let mut diagnostics: Vec<Diagnostic> = Vec::new();

        if self.lex.sections.is_empty() {
            diagnostics.push(Diagnostic::warning(
                file,
                Stage::Lexical,
                DiagnosticCode::EmptyDocument,
                "no section headers found",
                None,
            ));
        }

        diagnostics.extend(self.lex.errors.iter().map(|e| Diagnostic::from_lex(file, e)));
        diagnostics.extend(
            self.syntax
                .errors
                .iter()
                .map(|e| Diagnostic::from_syntax(file, e)),
        );
        diagnostics.extend(
            self.semantic
                .errors
                .iter()
                .map(|e| Diagnostic::from_semantic(file, e)),
        );
        diagnostics
    }
}

pub fn check_document(source: &str, symbols: &SymbolTable) -> DocumentCheck {
    let lex = lexer::lex(source);
    let syntax = crate::parser::parse_tokens(&lex.tokens, symbols);
    let semantic = semantics::analyze_tokens(&lex.tokens, symbols);
    DocumentCheck {
        lex,
        syntax,
        semantic,
    }
}
