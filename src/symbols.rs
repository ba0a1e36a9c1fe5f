// Symbol table: token category names <-> integer codes
// Loaded once from a JSON object such as {"TYPE": 1, "COUNT": 2, "TOTAL SCORE": 3, ...}

use crate::token::TokenCategory;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SymbolTableError {
    #[error("failed to read symbol table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid symbol table JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("symbol table is missing key \"{0}\"")]
    MissingKey(&'static str),

    #[error("symbol table has unknown key \"{0}\"")]
    UnknownKey(String),

    #[error("symbol table assigns code {code} to both \"{first}\" and \"{second}\"")]
    DuplicateCode {
        code: u32,
        first: &'static str,
        second: &'static str,
    },
}

/// Read-only bidirectional mapping between categories and codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolTable {
    codes: HashMap<TokenCategory, u32>,
    categories: HashMap<u32, TokenCategory>,
}

impl Default for SymbolTable {
    /// TYPE=1, COUNT=2, TOTAL SCORE=3, DIFFICULTY=4, SCORE=5, CONTENT=6, OPTION=7
    fn default() -> Self {
        let pairs = TokenCategory::CODED
            .into_iter()
            .zip(1u32..)
            .collect::<Vec<_>>();
        Self::from_pairs(&pairs)
    }
}

impl SymbolTable {
    fn from_pairs(pairs: &[(TokenCategory, u32)]) -> Self {
        Self {
            codes: pairs.iter().copied().collect(),
            categories: pairs.iter().map(|&(category, code)| (code, category)).collect(),
        }
    }

    /// Build a table from a name -> code mapping. Exactly the seven category keys are required.
    pub fn from_map(map: &BTreeMap<String, u32>) -> Result<Self, SymbolTableError> {
        if let Some(unknown) = map.keys().find(|key| TokenCategory::from_key(key).is_none()) {
            return Err(SymbolTableError::UnknownKey(unknown.clone()));
        }

        let mut pairs: Vec<(TokenCategory, u32)> = Vec::with_capacity(TokenCategory::CODED.len());
        for category in TokenCategory::CODED {
            let code = *map
                .get(category.key())
                .ok_or(SymbolTableError::MissingKey(category.key()))?;
            if let Some((other, _)) = pairs.iter().find(|(_, existing)| *existing == code) {
                return Err(SymbolTableError::DuplicateCode {
                    code,
                    first: other.key(),
                    second: category.key(),
                });
            }
            pairs.push((category, code));
        }

        Ok(Self::from_pairs(&pairs))
    }

    pub fn from_json(content: &str) -> Result<Self, SymbolTableError> {
        let map: BTreeMap<String, u32> = serde_json::from_str(content)?;
        Self::from_map(&map)
    }

    pub fn load(path: &Path) -> Result<Self, SymbolTableError> {
        let content = std::fs::read_to_string(path).map_err(|source| SymbolTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Code for a category; the END sentinel has none
    pub fn code(&self, category: TokenCategory) -> Option<u32> {
        self.codes.get(&category).copied()
    }

    pub fn category(&self, code: u32) -> Option<TokenCategory> {
        self.categories.get(&code).copied()
    }

    /// Name of a category in diagnostics: its configuration key, whatever code it maps to
    pub fn name(&self, category: TokenCategory) -> &'static str {
        category.key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WORD_CATEGORY: &str = r#"{
        "TYPE": 1,
        "COUNT": 2,
        "TOTAL SCORE": 3,
        "DIFFICULTY": 4,
        "SCORE": 5,
        "CONTENT": 6,
        "OPTION": 7
    }"#;

    #[test]
    fn test_default_matches_configuration_file() {
        let loaded = SymbolTable::from_json(WORD_CATEGORY).unwrap();
        assert_eq!(loaded, SymbolTable::default());
        assert_eq!(loaded.code(TokenCategory::TotalScore), Some(3));
        assert_eq!(loaded.category(7), Some(TokenCategory::Option));
        assert_eq!(loaded.code(TokenCategory::End), None);
    }

    #[test]
    fn test_custom_codes() {
        let json = WORD_CATEGORY.replace("\"TYPE\": 1", "\"TYPE\": 10");
        let table = SymbolTable::from_json(&json).unwrap();
        assert_eq!(table.code(TokenCategory::Type), Some(10));
        assert_eq!(table.category(1), None);
        assert_eq!(table.name(TokenCategory::Type), "TYPE");
        assert_eq!(table.name(TokenCategory::TotalScore), "TOTAL SCORE");
    }

    #[test]
    fn test_rejects_incomplete_or_ambiguous_tables() {
        let missing = r#"{"TYPE": 1}"#;
        assert!(matches!(
            SymbolTable::from_json(missing),
            Err(SymbolTableError::MissingKey("COUNT"))
        ));

        let unknown = WORD_CATEGORY.replace("\"OPTION\"", "\"CHOICE\"");
        assert!(matches!(
            SymbolTable::from_json(&unknown),
            Err(SymbolTableError::UnknownKey(key)) if key == "CHOICE"
        ));

        let duplicate = WORD_CATEGORY.replace("\"OPTION\": 7", "\"OPTION\": 6");
        assert!(matches!(
            SymbolTable::from_json(&duplicate),
            Err(SymbolTableError::DuplicateCode { code: 6, .. })
        ));
    }
}
