// Uniform diagnostics for the three analysis stages
// Every stage defect maps to one Diagnostic so reports can mix them.

use crate::error::{
    LexError, LexErrorKind, SemanticError, SemanticErrorKind, SyntaxError, SyntaxErrorKind,
};
use serde::Serialize;
use std::fmt;

/// Stage that produced a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Reading the document itself
    Input,
    Lexical,
    Syntax,
    Semantic,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Input => "input",
            Stage::Lexical => "lexical",
            Stage::Syntax => "syntax",
            Stage::Semantic => "semantic",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSeverity {
    /// Blocks the question bank commit
    Error,
    /// Worth a look, never blocks anything
    Warning,
}

/// Diagnostic error codes for categorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    // Lexical errors (1000-1999)
    InvalidType = 1001,
    InvalidDifficulty = 1002,
    OrphanQuestion = 1003,
    OrphanOption = 1004,

    // Syntax errors (2000-2999)
    UnexpectedToken = 2001,
    OptionLetterOutOfOrder = 2002,
    EmptyOptionContent = 2003,

    // Semantic errors (3000-3999)
    HeaderMismatch = 3001,
    InvalidValue = 3002,
    InconsistentDifficultyScore = 3003,
    ScoreOrderingViolation = 3004,
    CountMismatch = 3005,
    TotalScoreMismatch = 3006,
    MissingOptions = 3007,
    UnexpectedOptions = 3008,

    // Document errors (4000-4999)
    EmptyDocument = 4001,
    PathNotFound = 4002,
    UnreadableFile = 4003,
}

impl DiagnosticCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticCode::InvalidType => "invalid_type",
            DiagnosticCode::InvalidDifficulty => "invalid_difficulty",
            DiagnosticCode::OrphanQuestion => "orphan_question",
            DiagnosticCode::OrphanOption => "orphan_option",

            DiagnosticCode::UnexpectedToken => "unexpected_token",
            DiagnosticCode::OptionLetterOutOfOrder => "option_letter_out_of_order",
            DiagnosticCode::EmptyOptionContent => "empty_option_content",

            DiagnosticCode::HeaderMismatch => "header_mismatch",
            DiagnosticCode::InvalidValue => "invalid_value",
            DiagnosticCode::InconsistentDifficultyScore => "inconsistent_difficulty_score",
            DiagnosticCode::ScoreOrderingViolation => "score_ordering_violation",
            DiagnosticCode::CountMismatch => "count_mismatch",
            DiagnosticCode::TotalScoreMismatch => "total_score_mismatch",
            DiagnosticCode::MissingOptions => "missing_options",
            DiagnosticCode::UnexpectedOptions => "unexpected_options",

            DiagnosticCode::EmptyDocument => "empty_document",
            DiagnosticCode::PathNotFound => "path_not_found",
            DiagnosticCode::UnreadableFile => "unreadable_file",
        }
    }

    /// Numeric form, e.g. 3005
    pub fn number(&self) -> u16 {
        *self as u16
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub file: String,
    /// 1-based source line; `None` means end of input, or the whole file for input problems
    pub line: Option<usize>,
    pub stage: Stage,
    pub severity: DiagnosticSeverity,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn error(
        file: &str,
        stage: Stage,
        code: DiagnosticCode,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self {
            file: file.to_string(),
            line,
            stage,
            severity: DiagnosticSeverity::Error,
            code,
            message: message.into(),
        }
    }

    pub fn warning(
        file: &str,
        stage: Stage,
        code: DiagnosticCode,
        message: impl Into<String>,
        line: Option<usize>,
    ) -> Self {
        Self {
            severity: DiagnosticSeverity::Warning,
            ..Self::error(file, stage, code, message, line)
        }
    }

    pub fn from_lex(file: &str, error: &LexError) -> Self {
        let code = match error.kind {
            LexErrorKind::InvalidType { .. } => DiagnosticCode::InvalidType,
            LexErrorKind::InvalidDifficulty { .. } => DiagnosticCode::InvalidDifficulty,
            LexErrorKind::OrphanQuestion => DiagnosticCode::OrphanQuestion,
            LexErrorKind::OrphanOption => DiagnosticCode::OrphanOption,
        };
        Self::error(file, Stage::Lexical, code, error.message(), Some(error.line))
    }

    pub fn from_syntax(file: &str, error: &SyntaxError) -> Self {
        let code = match error.kind {
            SyntaxErrorKind::UnexpectedToken { .. } => DiagnosticCode::UnexpectedToken,
            SyntaxErrorKind::OptionLetterOutOfOrder { .. } => {
                DiagnosticCode::OptionLetterOutOfOrder
            }
            SyntaxErrorKind::EmptyOptionContent { .. } => DiagnosticCode::EmptyOptionContent,
        };
        Self::error(file, Stage::Syntax, code, error.message(), error.line.line())
    }

    pub fn from_semantic(file: &str, error: &SemanticError) -> Self {
        let code = match error.kind {
            SemanticErrorKind::UnexpectedToken { .. } => DiagnosticCode::HeaderMismatch,
            SemanticErrorKind::InvalidValue { .. } => DiagnosticCode::InvalidValue,
            SemanticErrorKind::InconsistentDifficultyScore { .. } => {
                DiagnosticCode::InconsistentDifficultyScore
            }
            SemanticErrorKind::ScoreOrderingViolation { .. } => {
                DiagnosticCode::ScoreOrderingViolation
            }
            SemanticErrorKind::CountMismatch { .. } => DiagnosticCode::CountMismatch,
            SemanticErrorKind::TotalScoreMismatch { .. } => DiagnosticCode::TotalScoreMismatch,
            SemanticErrorKind::MissingOptions { .. } => DiagnosticCode::MissingOptions,
            SemanticErrorKind::UnexpectedOptions { .. } => DiagnosticCode::UnexpectedOptions,
        };
        Self::error(file, Stage::Semantic, code, error.message(), error.line.line())
    }

    pub fn is_error(&self) -> bool {
        self.severity == DiagnosticSeverity::Error
    }
}

impl fmt::Display for Diagnostic {
    /// exam.txt:12: error[E3005] semantic: section declares 2 questions but contains 1
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let severity = match self.severity {
            DiagnosticSeverity::Error => "error",
            DiagnosticSeverity::Warning => "warning",
        };
        match (self.line, self.stage) {
            (Some(line), _) => write!(f, "{}:{}: ", self.file, line)?,
            (None, Stage::Syntax | Stage::Semantic) => write!(f, "{}:EOF: ", self.file)?,
            (None, _) => write!(f, "{}: ", self.file)?,
        }
        write!(
            f,
            "{}[E{}] {}: {}",
            severity,
            self.code.number(),
            self.stage.as_str(),
            self.message
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CheckSummary {
    pub total_files: usize,
    pub files_with_errors: usize,
    pub total_errors: usize,
    pub total_warnings: usize,
    /// Records that would be committed from the clean files
    pub total_records: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub diagnostics: Vec<Diagnostic>,
    pub summary: CheckSummary,
}

impl CheckReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one checked file and its diagnostics
    pub fn add_file(&mut self, diagnostics: Vec<Diagnostic>, records: usize) {
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();

        self.summary.total_files += 1;
        self.summary.total_errors += errors;
        self.summary.total_warnings += diagnostics.len() - errors;
        if errors > 0 {
            self.summary.files_with_errors += 1;
        } else {
            self.summary.total_records += records;
        }
        self.diagnostics.extend(diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        self.summary.total_errors > 0
    }
}
