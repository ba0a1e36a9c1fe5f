// Semantic stage - cross-record checks over the token sequence
//
// Walks the tokens on its own (it never looks at the parser's recovery path),
// so a question with missing DIFFICULTY/SCORE/CONTENT tokens is still counted.

use crate::error::{Location, SemanticError, SemanticErrorKind};
use crate::exam::{Difficulty, DifficultyScoreMap, QuestionRecord, QuestionType};
use crate::symbols::SymbolTable;
use crate::token::{Token, TokenCategory};
use serde::Serialize;
use tracing::{debug, info};

/// Records in document order plus every semantic defect found
#[derive(Debug, Clone, Default, Serialize)]
pub struct SemanticOutput {
    pub records: Vec<QuestionRecord>,
    pub errors: Vec<SemanticError>,
}

impl SemanticOutput {
    /// Records may only be committed when this holds
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

pub fn analyze_tokens(tokens: &[Token], symbols: &SymbolTable) -> SemanticOutput {
    SemanticAnalyzer::new(tokens, symbols).analyze()
}

pub struct SemanticAnalyzer<'a> {
    tokens: &'a [Token],
    symbols: &'a SymbolTable,
    position: usize,
    records: Vec<QuestionRecord>,
    errors: Vec<SemanticError>,
}

/// Running totals for the section being analyzed
#[derive(Default)]
struct SectionState {
    question_type: Option<QuestionType>,
    label: String,
    scores: DifficultyScoreMap,
    ordering_reported: bool,
    actual_count: u32,
    /// Wide enough that no run of 9-digit scores can overflow it
    actual_total_score: u64,
}

impl<'a> SemanticAnalyzer<'a> {
    pub fn new(tokens: &'a [Token], symbols: &'a SymbolTable) -> Self {
        Self {
            tokens,
            symbols,
            position: 0,
            records: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn analyze(mut self) -> SemanticOutput {
        while !self.at_end() {
            let start = self.position;
            self.analyze_section();
            if self.position == start {
                self.position += 1;
            }
        }

        info!(
            "Semantic pass produced {} record(s) with {} error(s)",
            self.records.len(),
            self.errors.len()
        );

        SemanticOutput {
            records: self.records,
            errors: self.errors,
        }
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn lookahead(&self) -> TokenCategory {
        self.current()
            .map(|token| token.category)
            .unwrap_or(TokenCategory::End)
    }

    fn at_end(&self) -> bool {
        self.lookahead() == TokenCategory::End
    }

    /// Line of the next unconsumed token, EOF once only the sentinel is left
    fn location(&self) -> Location {
        match self.current() {
            Some(token) if !token.is_end() => Location::Line(token.source_line),
            _ => Location::Eof,
        }
    }

    fn error(&mut self, kind: SemanticErrorKind, line: Location) {
        let error = SemanticError { kind, line };
        debug!("{}", error);
        self.errors.push(error);
    }

    /// Consume the lookahead when it has the given category
    fn accept(&mut self, category: TokenCategory) -> Option<&'a Token> {
        let token = self.current().filter(|token| token.category == category)?;
        self.position += 1;
        Some(token)
    }

    /// Header tokens are mandatory. A mismatch is reported and the offending token skipped;
    /// the END sentinel is never skipped.
    fn expect(&mut self, category: TokenCategory) -> Option<&'a Token> {
        if let Some(token) = self.accept(category) {
            return Some(token);
        }

        let found = match self.current() {
            Some(token) => token.describe(self.symbols),
            None => "end of input".to_string(),
        };
        let line = self.location();
        self.error(
            SemanticErrorKind::UnexpectedToken {
                expected: self.symbols.name(category),
                found,
            },
            line,
        );
        if !self.at_end() {
            self.position += 1;
        }
        None
    }

    fn number(&mut self, token: &Token) -> Option<u32> {
        match token.value.trim().parse::<u32>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.invalid_value(token);
                None
            }
        }
    }

    fn invalid_value(&mut self, token: &Token) {
        self.error(
            SemanticErrorKind::InvalidValue {
                category: self.symbols.name(token.category),
                value: token.value.clone(),
            },
            Location::Line(token.source_line),
        );
    }

    fn analyze_section(&mut self) {
        let mut state = SectionState::default();

        if let Some(token) = self.expect(TokenCategory::Type) {
            state.label = token.value.clone();
            state.question_type = QuestionType::from_label(&token.value);
            if state.question_type.is_none() {
                self.invalid_value(token);
            }
        }
        let declared_count = self
            .expect(TokenCategory::Count)
            .and_then(|token| self.number(token));
        let declared_total_score = self
            .expect(TokenCategory::TotalScore)
            .and_then(|token| self.number(token));

        while matches!(
            self.lookahead(),
            TokenCategory::Difficulty | TokenCategory::Score | TokenCategory::Content
        ) {
            self.analyze_question(&mut state);
        }

        debug!(
            "Section '{}': {} question(s), {} point(s)",
            state.label, state.actual_count, state.actual_total_score
        );

        let line = self.location();
        if let Some(declared) = declared_count
            && declared != state.actual_count
        {
            self.error(
                SemanticErrorKind::CountMismatch {
                    declared,
                    actual: state.actual_count,
                },
                line,
            );
        }
        if let Some(declared) = declared_total_score
            && u64::from(declared) != state.actual_total_score
        {
            self.error(
                SemanticErrorKind::TotalScoreMismatch {
                    declared,
                    actual: state.actual_total_score,
                },
                line,
            );
        }
    }

    fn analyze_question(&mut self, state: &mut SectionState) {
        let question_line = self.location();

        let difficulty = self
            .accept(TokenCategory::Difficulty)
            .and_then(|token| match Difficulty::from_label(&token.value) {
                Some(difficulty) => Some(difficulty),
                None => {
                    self.invalid_value(token);
                    None
                }
            });
        let score = self
            .accept(TokenCategory::Score)
            .and_then(|token| self.number(token));
        let content = self
            .accept(TokenCategory::Content)
            .map(|token| token.value.clone())
            .unwrap_or_default();

        if let (Some(difficulty), Some(score)) = (difficulty, score) {
            self.check_difficulty_score(state, difficulty, score, question_line);
        }

        state.actual_count += 1;
        state.actual_total_score += u64::from(score.unwrap_or(0));

        let first_option_line = self.location();
        let mut options = Vec::new();
        while let Some(token) = self.accept(TokenCategory::Option) {
            options.push(token.value.clone());
        }

        if let Some(question_type) = state.question_type {
            if question_type.requires_options() && options.is_empty() {
                self.error(
                    SemanticErrorKind::MissingOptions {
                        question_type: state.label.clone(),
                    },
                    question_line,
                );
            } else if !question_type.requires_options() && !options.is_empty() {
                self.error(
                    SemanticErrorKind::UnexpectedOptions {
                        question_type: state.label.clone(),
                    },
                    first_option_line,
                );
            }
        }

        self.records.push(QuestionRecord {
            question_type: state.label.clone(),
            difficulty,
            score: score.unwrap_or(0),
            content,
            options,
        });
    }

    fn check_difficulty_score(
        &mut self,
        state: &mut SectionState,
        difficulty: Difficulty,
        score: u32,
        line: Location,
    ) {
        if let Err(expected) = state.scores.record(difficulty, score) {
            self.error(
                SemanticErrorKind::InconsistentDifficultyScore {
                    difficulty,
                    expected,
                    found: score,
                },
                line,
            );
        }

        if state.ordering_reported || state.scores.is_ascending() != Some(false) {
            return;
        }
        state.ordering_reported = true;
        if let (Some(easy), Some(medium), Some(hard)) = (
            state.scores.get(Difficulty::Easy),
            state.scores.get(Difficulty::Medium),
            state.scores.get(Difficulty::Hard),
        ) {
            self.error(
                SemanticErrorKind::ScoreOrderingViolation { easy, medium, hard },
                line,
            );
        }
    }
}
