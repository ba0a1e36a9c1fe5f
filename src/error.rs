// Defects reported by the three analysis stages
// Each stage collects these into a list instead of failing on the first one.

use crate::exam::Difficulty;
use serde::{Serialize, Serializer};
use std::fmt;
use thiserror::Error;

/// Where a defect was found. Serialized as the bare line number, or "EOF".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Line(usize),
    Eof,
}

impl Location {
    pub fn line(&self) -> Option<usize> {
        match self {
            Location::Line(line) => Some(*line),
            Location::Eof => None,
        }
    }
}

impl Serialize for Location {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Location::Line(line) => serializer.serialize_u64(*line as u64),
            Location::Eof => serializer.serialize_str("EOF"),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Line(line) => write!(f, "line {}", line),
            Location::Eof => f.write_str("EOF"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LexErrorKind {
    /// Section header names a type outside the four known labels
    InvalidType { label: String },
    /// Bracketed difficulty is not 简单/中等/困难
    InvalidDifficulty { label: String },
    /// Question line before any section header
    OrphanQuestion,
    /// Option line before any question
    OrphanOption,
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("lexical error at line {line}: {}", describe_lex(.kind))]
pub struct LexError {
    #[serde(flatten)]
    pub kind: LexErrorKind,
    pub line: usize,
}

impl LexError {
    /// Description without the location prefix
    pub fn message(&self) -> String {
        describe_lex(&self.kind)
    }
}

fn describe_lex(kind: &LexErrorKind) -> String {
    match kind {
        LexErrorKind::InvalidType { label } => format!("invalid question type '{}'", label),
        LexErrorKind::InvalidDifficulty { label } => format!("invalid difficulty '{}'", label),
        LexErrorKind::OrphanQuestion => "question appears before any section header".to_string(),
        LexErrorKind::OrphanOption => "option appears before any question".to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SyntaxErrorKind {
    /// Wrong category at a position where `expected` was required
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    OptionLetterOutOfOrder {
        expected: char,
        found: String,
    },
    EmptyOptionContent {
        letter: char,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("syntax error at token {position} ({line}): {}", describe_syntax(.kind))]
pub struct SyntaxError {
    #[serde(flatten)]
    pub kind: SyntaxErrorKind,
    /// Index of the offending token in the sequence
    pub position: usize,
    pub line: Location,
}

impl SyntaxError {
    pub fn message(&self) -> String {
        describe_syntax(&self.kind)
    }
}

fn describe_syntax(kind: &SyntaxErrorKind) -> String {
    match kind {
        SyntaxErrorKind::UnexpectedToken { expected, found } => {
            format!("expected {}, found {}", expected, found)
        }
        SyntaxErrorKind::OptionLetterOutOfOrder { expected, found } => {
            format!("expected option {}, found '{}'", expected, found)
        }
        SyntaxErrorKind::EmptyOptionContent { letter } => {
            format!("option {} has no content", letter)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SemanticErrorKind {
    /// Section header token missing or out of place
    UnexpectedToken {
        expected: &'static str,
        found: String,
    },
    /// Token value outside the numeric or label vocabulary of its category
    InvalidValue {
        category: &'static str,
        value: String,
    },
    InconsistentDifficultyScore {
        difficulty: Difficulty,
        expected: u32,
        found: u32,
    },
    ScoreOrderingViolation {
        easy: u32,
        medium: u32,
        hard: u32,
    },
    CountMismatch {
        declared: u32,
        actual: u32,
    },
    TotalScoreMismatch {
        declared: u32,
        actual: u64,
    },
    MissingOptions {
        question_type: String,
    },
    UnexpectedOptions {
        question_type: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("semantic error at {line}: {}", describe_semantic(.kind))]
pub struct SemanticError {
    #[serde(flatten)]
    pub kind: SemanticErrorKind,
    pub line: Location,
}

impl SemanticError {
    pub fn message(&self) -> String {
        describe_semantic(&self.kind)
    }
}

fn describe_semantic(kind: &SemanticErrorKind) -> String {
    match kind {
        SemanticErrorKind::UnexpectedToken { expected, found } => {
            format!("expected {}, found {}", expected, found)
        }
        SemanticErrorKind::InvalidValue { category, value } => {
            format!("invalid {} value '{}'", category, value)
        }
        SemanticErrorKind::InconsistentDifficultyScore {
            difficulty,
            expected,
            found,
        } => format!(
            "questions of difficulty '{}' score {} but this one scores {}",
            difficulty, expected, found
        ),
        SemanticErrorKind::ScoreOrderingViolation { easy, medium, hard } => format!(
            "scores must satisfy 简单 < 中等 < 困难, got {} / {} / {}",
            easy, medium, hard
        ),
        SemanticErrorKind::CountMismatch { declared, actual } => format!(
            "section declares {} questions but contains {}",
            declared, actual
        ),
        SemanticErrorKind::TotalScoreMismatch { declared, actual } => format!(
            "section declares a total of {} points but its questions add up to {}",
            declared, actual
        ),
        SemanticErrorKind::MissingOptions { question_type } => {
            format!("'{}' question has no options", question_type)
        }
        SemanticErrorKind::UnexpectedOptions { question_type } => {
            format!("'{}' question must not have options", question_type)
        }
    }
}
