// Syntax stage - validates the token sequence against the exam grammar
//
//   Document      := TypeBlock* END
//   TypeBlock     := TYPE COUNT TOTAL_SCORE QuestionBlock
//   QuestionBlock := Question*            (until TYPE or END)
//   Question      := DIFFICULTY SCORE CONTENT OptionRun
//   OptionRun     := OPTION*              (lettered A, B, C, ... with content)
//
// Errors never abort the parse: the parser records the defect and skips ahead
// to the next DIFFICULTY, TYPE or END token.

use crate::error::{Location, SyntaxError, SyntaxErrorKind};
use crate::lexer::OPTION_SEPARATOR;
use crate::symbols::SymbolTable;
use crate::token::{Token, TokenCategory};
use serde::Serialize;
use std::io::Write;
use tracing::{debug, warn};

/// Written once at the start of the matched-token trace
pub const TRACE_HEADER: &str = "<试卷> ";

/// Result of a syntax pass
#[derive(Debug, Clone, Serialize)]
pub struct SyntaxReport {
    pub ok: bool,
    pub errors: Vec<SyntaxError>,
}

/// Parse a token sequence without a trace sink
pub fn parse_tokens(tokens: &[Token], symbols: &SymbolTable) -> SyntaxReport {
    let mut parser = Parser::new(tokens, symbols);
    let ok = parser.parse();
    SyntaxReport {
        ok,
        errors: parser.into_errors(),
    }
}

pub struct Parser<'a> {
    tokens: &'a [Token],
    symbols: &'a SymbolTable,
    position: usize,
    errors: Vec<SyntaxError>,
    trace: Option<&'a mut dyn Write>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token], symbols: &'a SymbolTable) -> Self {
        Self {
            tokens,
            symbols,
            position: 0,
            errors: Vec::new(),
            trace: None,
        }
    }

    /// Append every successfully matched token to `sink`. Write failures only disable the trace.
    pub fn with_trace(mut self, sink: &'a mut dyn Write) -> Self {
        self.trace = Some(sink);
        self
    }

    pub fn into_errors(self) -> Vec<SyntaxError> {
        self.errors
    }

    /// Run the whole parse. Always consumes the full sequence; returns true when error-free.
    pub fn parse(&mut self) -> bool {
        self.write_trace(TRACE_HEADER);

        while !self.at_end() {
            let start = self.position;
            self.parse_type_block();
            if self.position == start {
                // Every path above consumes at least one token; never spin.
                self.position += 1;
            }
        }

        // Consume the sentinel
        if self.current().is_some() {
            self.position += 1;
        }

        debug!(
            "Syntax pass consumed {} token(s) with {} error(s)",
            self.position,
            self.errors.len()
        );
        self.errors.is_empty()
    }

    fn current(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    /// Category of the lookahead; running past the slice reads as END
    fn lookahead(&self) -> TokenCategory {
        self.current()
            .map(|token| token.category)
            .unwrap_or(TokenCategory::End)
    }

    fn at_end(&self) -> bool {
        self.lookahead() == TokenCategory::End
    }

    fn location(&self) -> Location {
        match self.current() {
            Some(token) if !token.is_end() => Location::Line(token.source_line),
            _ => Location::Eof,
        }
    }

    fn describe_current(&self) -> String {
        match self.current() {
            Some(token) => token.describe(self.symbols),
            None => "end of input".to_string(),
        }
    }

    fn error(&mut self, kind: SyntaxErrorKind) {
        let error = SyntaxError {
            kind,
            position: self.position,
            line: self.location(),
        };
        debug!("{}", error);
        self.errors.push(error);
    }

    /// Consume the lookahead and append it to the trace
    fn accept(&mut self) {
        if let Some(token) = self.current() {
            let entry = format!("{} ", token.encode(self.symbols));
            self.write_trace(&entry);
            self.position += 1;
        }
    }

    fn expect(&mut self, category: TokenCategory) -> bool {
        if self.lookahead() == category {
            self.accept();
            return true;
        }

        let found = self.describe_current();
        self.error(SyntaxErrorKind::UnexpectedToken {
            expected: self.symbols.name(category),
            found,
        });
        false
    }

    fn parse_type_block(&mut self) {
        let header_ok = self.expect(TokenCategory::Type)
            && self.expect(TokenCategory::Count)
            && self.expect(TokenCategory::TotalScore);
        if !header_ok {
            self.recover();
        }
        self.parse_question_block();
    }

    fn parse_question_block(&mut self) {
        while !matches!(self.lookahead(), TokenCategory::Type | TokenCategory::End) {
            self.parse_question();
        }
    }

    fn parse_question(&mut self) -> bool {
        let fields_ok = self.expect(TokenCategory::Difficulty)
            && self.expect(TokenCategory::Score)
            && self.expect(TokenCategory::Content);
        if !fields_ok {
            self.recover();
            return false;
        }
        self.parse_option_run()
    }

    fn parse_option_run(&mut self) -> bool {
        let mut expected = 'A';

        while let Some(token) = self
            .current()
            .filter(|token| token.category == TokenCategory::Option)
        {
            let marker = format!("{}{}", expected, OPTION_SEPARATOR);

            if !token.value.starts_with(&marker) {
                self.error(SyntaxErrorKind::OptionLetterOutOfOrder {
                    expected,
                    found: token.value.clone(),
                });
                self.recover();
                return false;
            }
            if token.value.trim() == marker {
                self.error(SyntaxErrorKind::EmptyOptionContent { letter: expected });
                self.recover();
                return false;
            }

            self.accept();
            expected = char::from_u32(expected as u32 + 1).unwrap_or(expected);
        }

        true
    }

    /// Skip to the next safe restart point: a DIFFICULTY (next question), TYPE (next section) or END
    fn recover(&mut self) {
        let start = self.position;
        while !matches!(
            self.lookahead(),
            TokenCategory::Difficulty | TokenCategory::Type | TokenCategory::End
        ) {
            self.position += 1;
        }
        if self.position > start {
            debug!(
                "Recovered by skipping tokens {}..{}",
                start, self.position
            );
        }
    }

    fn write_trace(&mut self, text: &str) {
        let result = match self.trace.as_mut() {
            Some(sink) => sink.write_all(text.as_bytes()),
            None => return,
        };
        if let Err(error) = result {
            warn!("Disabling parse trace after write failure: {}", error);
            self.trace = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    fn tokens_of(source: &str) -> Vec<Token> {
        lex(source).tokens
    }

    fn kinds(report: &SyntaxReport) -> Vec<&SyntaxErrorKind> {
        report.errors.iter().map(|e| &e.kind).collect()
    }

    const CLEAN: &str = "第1部分 单选题（2题，共4分）\n1、（简单）内容一（2分）\nA、甲\nB、乙\n2、（简单）内容二（2分）\nA、丙\nB、丁\n第2部分 判断题（1题，共1分）\n1、（简单）对吗（1分）\n";

    #[test]
    fn test_clean_document_parses() {
        let symbols = SymbolTable::default();
        let report = parse_tokens(&tokens_of(CLEAN), &symbols);
        assert!(report.ok);
        assert!(report.errors.is_empty());
    }

    #[test]
    fn test_trace_records_matched_tokens() {
        let symbols = SymbolTable::default();
        let tokens = tokens_of("第1部分 判断题（1题，共1分）\n1、（简单）对吗（1分）\n");
        let mut sink: Vec<u8> = Vec::new();

        let ok = Parser::new(&tokens, &symbols).with_trace(&mut sink).parse();

        assert!(ok);
        assert_eq!(
            String::from_utf8(sink).unwrap(),
            "<试卷> <1, \"判断题\"> <2, \"1\"> <3, \"1\"> <4, \"简单\"> <5, \"1\"> <6, \"对吗\"> "
        );
    }

    #[test]
    fn test_out_of_order_option() {
        let symbols = SymbolTable::default();
        let tokens = tokens_of("第1部分 单选题（1题，共2分）\n1、（简单）题（2分）\nA、甲\nC、丙\n");
        let report = parse_tokens(&tokens, &symbols);

        assert!(!report.ok);
        assert_eq!(
            kinds(&report),
            vec![&SyntaxErrorKind::OptionLetterOutOfOrder {
                expected: 'B',
                found: "C、丙".to_string()
            }]
        );
        assert_eq!(report.errors[0].position, 7);
        assert_eq!(report.errors[0].line, Location::Line(4));
    }

    #[test]
    fn test_option_run_must_start_at_a() {
        let symbols = SymbolTable::default();
        let tokens = tokens_of("第1部分 单选题（1题，共2分）\n1、（简单）题（2分）\nB、乙\n");
        let report = parse_tokens(&tokens, &symbols);
        assert!(matches!(
            report.errors[0].kind,
            SyntaxErrorKind::OptionLetterOutOfOrder { expected: 'A', .. }
        ));
    }

    #[test]
    fn test_empty_option_content() {
        let symbols = SymbolTable::default();
        let tokens = tokens_of("第1部分 单选题（1题，共2分）\n1、（简单）题（2分）\nA、甲\nB、\n");
        let report = parse_tokens(&tokens, &symbols);
        assert_eq!(
            kinds(&report),
            vec![&SyntaxErrorKind::EmptyOptionContent { letter: 'B' }]
        );
    }

    #[test]
    fn test_missing_difficulty_recovers_at_next_question() {
        let symbols = SymbolTable::default();
        let source = "第1部分 判断题（3题，共3分）\n1、没有难度（1分）\n2、（简单）第二题（1分）\n3、（简单）第三题（1分）\n";
        let report = parse_tokens(&tokens_of(source), &symbols);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(
            report.errors[0].kind,
            SyntaxErrorKind::UnexpectedToken {
                expected: "DIFFICULTY",
                found: "SCORE \"1\"".to_string()
            }
        );
        assert_eq!(report.errors[0].line, Location::Line(2));
    }

    #[test]
    fn test_multiple_errors_are_all_reported() {
        let symbols = SymbolTable::default();
        let source = "第1部分 单选题（2题，共4分）\n1、（简单）（2分）\nA、甲\n2、（简单）题二（2分）\nB、乙\n第2部分 简答题（1题，共5分）\n1、（困难）论述\n";
        let report = parse_tokens(&tokens_of(source), &symbols);

        let kinds = kinds(&report);
        assert_eq!(kinds.len(), 3);
        assert!(matches!(
            kinds[0],
            SyntaxErrorKind::UnexpectedToken {
                expected: "CONTENT",
                ..
            }
        ));
        assert!(matches!(
            kinds[1],
            SyntaxErrorKind::OptionLetterOutOfOrder { .. }
        ));
        assert!(matches!(
            kinds[2],
            SyntaxErrorKind::UnexpectedToken {
                expected: "SCORE",
                ..
            }
        ));
    }

    #[test]
    fn test_broken_header_still_checks_questions() {
        let symbols = SymbolTable::default();
        let tokens = vec![
            Token::new(TokenCategory::Type, "单选题", 1),
            Token::new(TokenCategory::TotalScore, "2", 1),
            Token::new(TokenCategory::Difficulty, "简单", 2),
            Token::new(TokenCategory::Score, "2", 2),
            Token::new(TokenCategory::Content, "题", 2),
            Token::new(TokenCategory::Option, "B、乙", 3),
            Token::end(4),
        ];
        let report = parse_tokens(&tokens, &symbols);

        assert_eq!(report.errors.len(), 2);
        assert!(matches!(
            report.errors[0].kind,
            SyntaxErrorKind::UnexpectedToken {
                expected: "COUNT",
                ..
            }
        ));
        assert!(matches!(
            report.errors[1].kind,
            SyntaxErrorKind::OptionLetterOutOfOrder { .. }
        ));
    }

    #[test]
    fn test_leading_garbage_and_missing_end() {
        let symbols = SymbolTable::default();
        let tokens = vec![
            Token::new(TokenCategory::Option, "A、甲", 1),
            Token::new(TokenCategory::Content, "游离", 2),
        ];
        let report = parse_tokens(&tokens, &symbols);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, Location::Line(1));
    }

    #[test]
    fn test_end_sentinel_reported_as_eof() {
        let symbols = SymbolTable::default();
        let tokens = vec![Token::new(TokenCategory::Type, "单选题", 1), Token::end(2)];
        let report = parse_tokens(&tokens, &symbols);

        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].line, Location::Eof);
        assert_eq!(
            report.errors[0].kind,
            SyntaxErrorKind::UnexpectedToken {
                expected: "COUNT",
                found: "end of input".to_string()
            }
        );
    }
}
