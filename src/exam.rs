// Exam document model
// Section/Question are the lexer's view of a document; QuestionRecord is what the
// semantic stage commits to the question bank.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Section kind, named by the label in a section header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionType {
    /// 单选题
    SingleChoice,
    /// 多选题
    MultiChoice,
    /// 判断题
    TrueFalse,
    /// 简答题
    ShortAnswer,
}

impl QuestionType {
    pub const ALL: [QuestionType; 4] = [
        QuestionType::SingleChoice,
        QuestionType::MultiChoice,
        QuestionType::TrueFalse,
        QuestionType::ShortAnswer,
    ];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "单选题" => Some(Self::SingleChoice),
            "多选题" => Some(Self::MultiChoice),
            "判断题" => Some(Self::TrueFalse),
            "简答题" => Some(Self::ShortAnswer),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SingleChoice => "单选题",
            Self::MultiChoice => "多选题",
            Self::TrueFalse => "判断题",
            Self::ShortAnswer => "简答题",
        }
    }

    /// Choice questions must list options; the others must not
    pub fn requires_options(&self) -> bool {
        matches!(self, Self::SingleChoice | Self::MultiChoice)
    }
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    /// 简单
    Easy,
    /// 中等
    Medium,
    /// 困难
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "简单" => Some(Self::Easy),
            "中等" => Some(Self::Medium),
            "困难" => Some(Self::Hard),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Easy => "简单",
            Self::Medium => "中等",
            Self::Hard => "困难",
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Easy => 0,
            Self::Medium => 1,
            Self::Hard => 2,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One section of a document as seen by the lexer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    /// Type label exactly as written (may be invalid, see `question_type`)
    pub label: String,

    /// Recognized type, `None` when the label is not one of the four known ones
    pub question_type: Option<QuestionType>,

    pub declared_count: u32,

    pub declared_total_score: u32,

    /// Questions in document order
    pub questions: Vec<Question>,

    /// Line of the section header (1-based)
    pub line: usize,
}

/// One question as seen by the lexer; every field except options may be missing
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Question {
    pub difficulty: Option<Difficulty>,

    pub score: Option<u32>,

    pub content: Option<String>,

    /// Options in authoring order, each already prefixed with its letter ("A、...")
    pub options: Vec<QuestionOption>,

    /// Line of the question (1-based)
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionOption {
    pub text: String,
    pub line: usize,
}

/// A validated question, one per question line, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    /// Section type label
    pub question_type: String,

    pub difficulty: Option<Difficulty>,

    pub score: u32,

    pub content: String,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

impl QuestionRecord {
    /// Score as written in the bank, e.g. "2分"
    pub fn score_label(&self) -> String {
        format!("{}分", self.score)
    }
}

/// Per-section record of the score first seen for each difficulty
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DifficultyScoreMap {
    scores: [Option<u32>; 3],
}

impl DifficultyScoreMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, difficulty: Difficulty) -> Option<u32> {
        self.scores[difficulty.index()]
    }

    /// Record `score` for `difficulty`. Returns the previously established score when it
    /// differs from `score`; the first score seen for a difficulty always sticks.
    pub fn record(&mut self, difficulty: Difficulty, score: u32) -> Result<(), u32> {
        match self.scores[difficulty.index()] {
            None => {
                self.scores[difficulty.index()] = Some(score);
                Ok(())
            }
            Some(existing) if existing != score => Err(existing),
            Some(_) => Ok(()),
        }
    }

    /// `Some(false)` when all three slots are set and Easy < Medium < Hard does not hold
    pub fn is_ascending(&self) -> Option<bool> {
        match self.scores {
            [Some(easy), Some(medium), Some(hard)] => Some(easy < medium && medium < hard),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip() {
        for kind in QuestionType::ALL {
            assert_eq!(QuestionType::from_label(kind.label()), Some(kind));
        }
        for difficulty in Difficulty::ALL {
            assert_eq!(Difficulty::from_label(difficulty.label()), Some(difficulty));
        }
        assert_eq!(QuestionType::from_label("填空题"), None);
        assert_eq!(Difficulty::from_label("极难"), None);
    }

    #[test]
    fn test_requires_options() {
        assert!(QuestionType::SingleChoice.requires_options());
        assert!(QuestionType::MultiChoice.requires_options());
        assert!(!QuestionType::TrueFalse.requires_options());
        assert!(!QuestionType::ShortAnswer.requires_options());
    }

    #[test]
    fn test_difficulty_map_first_score_sticks() {
        let mut map = DifficultyScoreMap::new();
        assert_eq!(map.record(Difficulty::Easy, 2), Ok(()));
        assert_eq!(map.record(Difficulty::Easy, 2), Ok(()));
        assert_eq!(map.record(Difficulty::Easy, 3), Err(2));
        assert_eq!(map.get(Difficulty::Easy), Some(2));
    }

    #[test]
    fn test_difficulty_map_ordering() {
        let mut map = DifficultyScoreMap::new();
        map.record(Difficulty::Easy, 2).unwrap();
        map.record(Difficulty::Medium, 4).unwrap();
        assert_eq!(map.is_ascending(), None);

        map.record(Difficulty::Hard, 3).unwrap();
        assert_eq!(map.is_ascending(), Some(false));

        let mut map = DifficultyScoreMap::new();
        map.record(Difficulty::Hard, 6).unwrap();
        map.record(Difficulty::Medium, 4).unwrap();
        map.record(Difficulty::Easy, 2).unwrap();
        assert_eq!(map.is_ascending(), Some(true));
    }

    #[test]
    fn test_score_label() {
        let record = QuestionRecord {
            question_type: "简答题".to_string(),
            difficulty: None,
            score: 10,
            content: "简述".to_string(),
            options: Vec::new(),
        };
        assert_eq!(record.score_label(), "10分");
    }
}
