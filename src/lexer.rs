// Lexer - classifies exam document lines and produces the token sequence
// Lines are matched against three shapes: section header, question, option.
// Anything else is ignored. Bad labels are flagged but never stop the scan.

use crate::error::{LexError, LexErrorKind};
use crate::exam::{Difficulty, Question, QuestionOption, QuestionType, Section};
use crate::token::{Token, TokenCategory};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::debug;

static SECTION_HEADER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(SECTION_HEADER_PATTERN).expect("invalid section header regex"));

static QUESTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(QUESTION_PATTERN).expect("invalid question regex"));

static SCORE_SUFFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(SCORE_SUFFIX_PATTERN).expect("invalid score regex"));

static DIFFICULTY_PREFIX_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(DIFFICULTY_PREFIX_PATTERN).expect("invalid difficulty regex"));

static OPTION_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(OPTION_PATTERN).expect("invalid option regex"));

/// 第一部分 单选题（10题，共20分）; both full-width and ASCII brackets/commas are accepted
const SECTION_HEADER_PATTERN: &str =
    r"^第\s*\w+?\s*部分\s*(.*?)\s*[（(]\s*(\d{1,9})\s*题\s*[，,]\s*共\s*(\d{1,9})\s*分\s*[）)]$";

/// 12、<rest>
const QUESTION_PATTERN: &str = r"^\d+\s*、\s*(.*)$";

/// <rest>（2分）
const SCORE_SUFFIX_PATTERN: &str = r"^(.*?)\s*[（(]\s*(\d{1,9})\s*分\s*[）)]$";

/// （简单）<rest>
const DIFFICULTY_PREFIX_PATTERN: &str = r"^[（(]\s*([^（()）]*?)\s*[）)]\s*(.*)$";

/// A、<text>
const OPTION_PATTERN: &str = r"^([A-D])\s*、\s*(.*)$";

/// Option marker between letter and text
pub const OPTION_SEPARATOR: char = '、';

/// Everything the lexer produces for one document
#[derive(Debug, Clone, Default, Serialize)]
pub struct LexOutput {
    /// Structured view, kept for diagnostics only
    pub sections: Vec<Section>,
    /// Token sequence terminated by exactly one END token
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }
}

/// Header fields captured from a section line
struct Header<'a> {
    label: &'a str,
    count: u32,
    total: u32,
}

/// Question fields captured from a question line
struct QuestionLine<'a> {
    difficulty: Option<&'a str>,
    content: &'a str,
    score: Option<u32>,
}

/// Scan a document and produce sections, tokens and lexical errors
pub fn lex(source: &str) -> LexOutput {
    let mut sections: Vec<Section> = Vec::new();
    let mut errors = Vec::new();
    let mut last_line = 0;

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        last_line = line_no;
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = match_header(line) {
            let question_type = QuestionType::from_label(header.label);
            if question_type.is_none() {
                errors.push(LexError {
                    kind: LexErrorKind::InvalidType {
                        label: header.label.to_string(),
                    },
                    line: line_no,
                });
            }
            sections.push(Section {
                label: header.label.to_string(),
                question_type,
                declared_count: header.count,
                declared_total_score: header.total,
                questions: Vec::new(),
                line: line_no,
            });
            continue;
        }

        if let Some(parsed) = match_question(line) {
            let Some(section) = sections.last_mut() else {
                errors.push(LexError {
                    kind: LexErrorKind::OrphanQuestion,
                    line: line_no,
                });
                continue;
            };

            // Any leading bracket group is a difficulty, including an empty one
            let difficulty = parsed.difficulty.and_then(|label| {
                let known = Difficulty::from_label(label);
                if known.is_none() {
                    errors.push(LexError {
                        kind: LexErrorKind::InvalidDifficulty {
                            label: label.to_string(),
                        },
                        line: line_no,
                    });
                }
                known
            });

            section.questions.push(Question {
                difficulty,
                score: parsed.score,
                content: (!parsed.content.is_empty()).then(|| parsed.content.to_string()),
                options: Vec::new(),
                line: line_no,
            });
            continue;
        }

        if let Some(captures) = OPTION_REGEX.captures(line) {
            let text = format!(
                "{}{}{}",
                &captures[1],
                OPTION_SEPARATOR,
                captures[2].trim()
            );
            match sections
                .last_mut()
                .and_then(|section| section.questions.last_mut())
            {
                Some(question) => question.options.push(QuestionOption {
                    text,
                    line: line_no,
                }),
                None => errors.push(LexError {
                    kind: LexErrorKind::OrphanOption,
                    line: line_no,
                }),
            }
            continue;
        }

        debug!("Ignoring unrecognized line {}: {}", line_no, line);
    }

    let tokens = generate_tokens(&sections, last_line + 1);

    debug!(
        "Lexed {} section(s), {} token(s), {} error(s)",
        sections.len(),
        tokens.len(),
        errors.len()
    );

    LexOutput {
        sections,
        tokens,
        errors,
    }
}

fn match_header(line: &str) -> Option<Header<'_>> {
    let captures = SECTION_HEADER_REGEX.captures(line)?;
    Some(Header {
        label: captures.get(1)?.as_str(),
        count: captures.get(2)?.as_str().parse().ok()?,
        total: captures.get(3)?.as_str().parse().ok()?,
    })
}

fn match_question(line: &str) -> Option<QuestionLine<'_>> {
    let rest = QUESTION_REGEX.captures(line)?.get(1)?.as_str().trim();

    let (rest, score) = match SCORE_SUFFIX_REGEX.captures(rest) {
        Some(captures) => (
            captures.get(1)?.as_str(),
            Some(captures.get(2)?.as_str().parse::<u32>().ok()?),
        ),
        None => (rest, None),
    };

    let (difficulty, content) = match DIFFICULTY_PREFIX_REGEX.captures(rest) {
        Some(captures) => (Some(captures.get(1)?.as_str()), captures.get(2)?.as_str()),
        None => (None, rest),
    };

    Some(QuestionLine {
        difficulty,
        content: content.trim(),
        score,
    })
}

/// Flatten sections into tokens. Absent difficulty/score/content produce no token.
pub fn generate_tokens(sections: &[Section], end_line: usize) -> Vec<Token> {
    let mut tokens = Vec::new();

    for section in sections {
        tokens.push(Token::new(TokenCategory::Type, &section.label, section.line));
        tokens.push(Token::new(
            TokenCategory::Count,
            section.declared_count.to_string(),
            section.line,
        ));
        tokens.push(Token::new(
            TokenCategory::TotalScore,
            section.declared_total_score.to_string(),
            section.line,
        ));

        for question in &section.questions {
            if let Some(difficulty) = question.difficulty {
                tokens.push(Token::new(
                    TokenCategory::Difficulty,
                    difficulty.label(),
                    question.line,
                ));
            }
            if let Some(score) = question.score {
                tokens.push(Token::new(
                    TokenCategory::Score,
                    score.to_string(),
                    question.line,
                ));
            }
            if let Some(content) = &question.content {
                tokens.push(Token::new(TokenCategory::Content, content, question.line));
            }
            for option in &question.options {
                tokens.push(Token::new(TokenCategory::Option, &option.text, option.line));
            }
        }
    }

    tokens.push(Token::end(end_line));
    tokens
}
