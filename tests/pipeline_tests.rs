use exambank::bank;
use exambank::error::{Location, SemanticErrorKind};
use exambank::exam::{Difficulty, QuestionType};
use exambank::pipeline;
use exambank::token::{read_tokens, write_tokens};
use exambank::{SymbolTable, analyze_tokens, check_document, lex, parse_tokens};
use std::path::{Path, PathBuf};

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/data/exams")
        .join(name)
}

fn read_fixture(name: &str) -> String {
    std::fs::read_to_string(fixture(name)).expect("fixture should exist")
}

#[test]
fn test_scenario_a_single_question() {
    let symbols = SymbolTable::default();
    let source = "第1部分 单选题（1题，共2分）\n1、（简单）内容？（2分）\nA、选项一\nB、选项二\n";

    let lexed = lex(source);
    assert!(lexed.is_clean());
    assert_eq!(
        write_tokens(&lexed.tokens, &symbols),
        "<1, \"单选题\">\n<2, \"1\">\n<3, \"2\">\n<4, \"简单\">\n<5, \"2\">\n<6, \"内容？\">\n<7, \"A、选项一\">\n<7, \"B、选项二\">\n$\n"
    );

    let syntax = parse_tokens(&lexed.tokens, &symbols);
    assert!(syntax.ok);

    let semantic = analyze_tokens(&lexed.tokens, &symbols);
    assert!(semantic.is_clean());
    assert_eq!(semantic.records.len(), 1);
}

#[test]
fn test_round_trip_through_token_file() {
    let symbols = SymbolTable::default();
    let source = read_fixture("valid.txt");

    let lexed = lex(&source);
    assert!(lexed.is_clean());
    assert_eq!(lexed.question_count(), 8);

    let text = write_tokens(&lexed.tokens, &symbols);
    let tokens = read_tokens(&text, &symbols).unwrap();
    assert_eq!(tokens.len(), lexed.tokens.len());
    assert!(tokens.last().unwrap().is_end());

    let syntax = parse_tokens(&tokens, &symbols);
    assert!(syntax.ok, "unexpected syntax errors: {:?}", syntax.errors);

    let semantic = analyze_tokens(&tokens, &symbols);
    assert!(semantic.is_clean(), "unexpected errors: {:?}", semantic.errors);

    let types: Vec<&str> = semantic
        .records
        .iter()
        .map(|r| r.question_type.as_str())
        .collect();
    assert_eq!(
        types,
        vec![
            "单选题", "单选题", "多选题", "判断题", "判断题", "简答题", "简答题", "简答题"
        ]
    );
    assert_eq!(semantic.records[0].content, "项目章程由谁批准？");
    assert_eq!(semantic.records[0].options.len(), 4);
    assert_eq!(semantic.records[7].difficulty, Some(Difficulty::Hard));
    assert_eq!(semantic.records[7].score, 10);
}

#[test]
fn test_type_option_correspondence_on_clean_pass() {
    let symbols = SymbolTable::default();
    let check = check_document(&read_fixture("valid.txt"), &symbols);
    assert!(check.is_clean());

    for record in &check.semantic.records {
        let question_type = QuestionType::from_label(&record.question_type).unwrap();
        assert_eq!(
            question_type.requires_options(),
            !record.options.is_empty(),
            "record {:?}",
            record
        );
    }
}

#[test]
fn test_stages_are_idempotent_over_files() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("output/tokens.txt");
    let trace = dir.path().join("output/parsed_tokens.txt");
    let bank_path = dir.path().join("output/QuestionBank.txt");
    let symbols = SymbolTable::default();

    pipeline::run_lexical_analysis(&fixture("valid.txt"), &tokens, &symbols).unwrap();

    let first_syntax = pipeline::run_syntax_analysis(&tokens, Some(&trace), &symbols).unwrap();
    let first_trace = std::fs::read_to_string(&trace).unwrap();
    let first = pipeline::run_semantic_analysis(&tokens, &bank_path, &symbols).unwrap();
    let first_bank = std::fs::read_to_string(&bank_path).unwrap();

    let second_syntax = pipeline::run_syntax_analysis(&tokens, Some(&trace), &symbols).unwrap();
    let second = pipeline::run_semantic_analysis(&tokens, &bank_path, &symbols).unwrap();

    assert!(first_syntax.ok && second_syntax.ok);
    assert!(first_syntax.errors.is_empty() && second_syntax.errors.is_empty());
    assert_eq!(std::fs::read_to_string(&trace).unwrap(), first_trace);
    assert!(first.committed && second.committed);
    assert_eq!(first.output.records, second.output.records);
    assert!(first.output.errors.is_empty() && second.output.errors.is_empty());
    assert_eq!(std::fs::read_to_string(&bank_path).unwrap(), first_bank);
    assert_eq!(bank::read_bank(&first_bank).unwrap(), first.output.records);
}

#[test]
fn test_scenario_b_count_mismatch_blocks_commit() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.txt");
    let bank_path = dir.path().join("QuestionBank.txt");
    let symbols = SymbolTable::default();

    let lexed =
        pipeline::run_lexical_analysis(&fixture("count_mismatch.txt"), &tokens, &symbols).unwrap();
    assert!(lexed.is_clean());
    assert!(pipeline::run_syntax_analysis(&tokens, None, &symbols).unwrap().ok);

    let run = pipeline::run_semantic_analysis(&tokens, &bank_path, &symbols).unwrap();
    assert!(!run.committed);
    assert!(!bank_path.exists());
    assert_eq!(run.output.errors.len(), 1);
    assert_eq!(
        run.output.errors[0].kind,
        SemanticErrorKind::CountMismatch {
            declared: 2,
            actual: 1
        }
    );
    assert_eq!(run.output.errors[0].line, Location::Eof);
}

#[test]
fn test_failed_pass_keeps_previous_bank() {
    let dir = tempfile::tempdir().unwrap();
    let tokens = dir.path().join("tokens.txt");
    let bank_path = dir.path().join("QuestionBank.txt");
    let symbols = SymbolTable::default();

    pipeline::run_lexical_analysis(&fixture("valid.txt"), &tokens, &symbols).unwrap();
    assert!(
        pipeline::run_semantic_analysis(&tokens, &bank_path, &symbols)
            .unwrap()
            .committed
    );
    let committed = std::fs::read_to_string(&bank_path).unwrap();

    pipeline::run_lexical_analysis(&fixture("count_mismatch.txt"), &tokens, &symbols).unwrap();
    let run = pipeline::run_semantic_analysis(&tokens, &bank_path, &symbols).unwrap();
    assert!(!run.committed);
    assert_eq!(std::fs::read_to_string(&bank_path).unwrap(), committed);
}

#[test]
fn test_scenario_c_true_false_with_option() {
    let symbols = SymbolTable::default();
    let check = check_document(&read_fixture("true_false_option.txt"), &symbols);

    assert!(check.lex.is_clean());
    assert!(check.syntax.ok);
    assert_eq!(check.semantic.errors.len(), 1);
    assert_eq!(
        check.semantic.errors[0].kind,
        SemanticErrorKind::UnexpectedOptions {
            question_type: "判断题".to_string()
        }
    );
    assert_eq!(check.semantic.errors[0].line, Location::Line(3));
}

#[test]
fn test_scenario_d_inconsistent_easy_scores() {
    let symbols = SymbolTable::default();
    let check = check_document(&read_fixture("inconsistent_score.txt"), &symbols);

    assert!(check.syntax.ok);
    assert_eq!(check.semantic.errors.len(), 1);
    assert_eq!(
        check.semantic.errors[0].kind,
        SemanticErrorKind::InconsistentDifficultyScore {
            difficulty: Difficulty::Easy,
            expected: 2,
            found: 3
        }
    );
    assert_eq!(check.semantic.errors[0].line, Location::Line(3));
}

#[test]
fn test_stages_report_independently() {
    let symbols = SymbolTable::default();
    let check = check_document(&read_fixture("broken.txt"), &symbols);

    assert_eq!(check.lex.errors.len(), 2);
    assert_eq!(check.syntax.errors.len(), 2);
    assert_eq!(check.semantic.errors.len(), 1);
    assert!(matches!(
        &check.semantic.errors[0].kind,
        SemanticErrorKind::InvalidValue { category: "TYPE", value } if value == "填空题"
    ));
    // Every question line still yields a record
    assert_eq!(check.semantic.records.len(), 3);
    assert!(!check.is_clean());
}

#[test]
fn test_custom_symbol_codes_flow_through_token_file() {
    let dir = tempfile::tempdir().unwrap();
    let symbols_path = dir.path().join("word_category.json");
    std::fs::write(
        &symbols_path,
        r#"{"TYPE": 21, "COUNT": 22, "TOTAL SCORE": 23, "DIFFICULTY": 24, "SCORE": 25, "CONTENT": 26, "OPTION": 27}"#,
    )
    .unwrap();
    let symbols = SymbolTable::load(&symbols_path).unwrap();
    let tokens = dir.path().join("tokens.txt");

    pipeline::run_lexical_analysis(&fixture("true_false_option.txt"), &tokens, &symbols).unwrap();
    let text = std::fs::read_to_string(&tokens).unwrap();
    assert!(text.starts_with("<21, \"判断题\">\n"));
    assert!(text.contains("<27, \"A、正确\">"));

    // The default table cannot read this file
    assert!(pipeline::load_tokens(&tokens, &SymbolTable::default()).is_err());
    assert_eq!(pipeline::load_tokens(&tokens, &symbols).unwrap().len(), 8);
}
