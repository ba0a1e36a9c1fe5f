use exambank::SymbolTable;
use exambank::config::Config;
use exambank::token::TokenCategory;
use std::path::PathBuf;

#[test]
fn test_default_config_values() {
    let config = Config::default();

    // Output locations of the original three-step workflow
    assert_eq!(config.paths.source, PathBuf::from("exam.txt"));
    assert_eq!(config.paths.tokens, PathBuf::from("output/tokens.txt"));
    assert_eq!(config.paths.trace, PathBuf::from("output/parsed_tokens.txt"));
    assert_eq!(
        config.paths.question_bank,
        PathBuf::from("output/QuestionBank.txt")
    );
    assert_eq!(config.paths.symbols, None);
    assert_eq!(config.output.format, "text");
}

#[test]
fn test_default_symbol_codes() {
    let table = Config::default().symbol_table().unwrap();
    let codes: Vec<Option<u32>> = TokenCategory::CODED
        .iter()
        .map(|category| table.code(*category))
        .collect();
    assert_eq!(
        codes,
        vec![
            Some(1),
            Some(2),
            Some(3),
            Some(4),
            Some(5),
            Some(6),
            Some(7)
        ]
    );
    assert_eq!(table, SymbolTable::default());
}

#[test]
fn test_empty_file_is_all_defaults() {
    assert_eq!(Config::parse("").unwrap(), Config::default());
}

#[test]
fn test_load_from_file_reports_bad_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".exambankrc.toml");
    std::fs::write(&path, "[output\nformat = ").unwrap();

    let err = Config::load_from_file(&path).unwrap_err();
    assert!(format!("{:#}", err).contains(".exambankrc.toml"));
}
