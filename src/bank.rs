// Question bank storage
// One record per line: ('单选题', '简单', '2分', '内容？', 'A、选项一', 'B、选项二')

use crate::exam::{Difficulty, QuestionRecord, QuestionType};
use crate::semantics::SemanticOutput;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

/// Written in place of an absent difficulty
const NONE_LITERAL: &str = "None";

#[derive(Debug, Error)]
pub enum BankError {
    #[error("failed to access question bank {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("question bank line {line}: {reason}")]
    Malformed { line: usize, reason: String },
}

fn quote(field: &str) -> String {
    let mut out = String::with_capacity(field.len() + 2);
    out.push('\'');
    for ch in field.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
    out
}

/// Serialize one record as a bank line (without the trailing newline)
pub fn format_record(record: &QuestionRecord) -> String {
    let mut fields = vec![
        quote(&record.question_type),
        match record.difficulty {
            Some(difficulty) => quote(difficulty.label()),
            None => NONE_LITERAL.to_string(),
        },
        quote(&record.score_label()),
        quote(&record.content),
    ];
    fields.extend(record.options.iter().map(|option| quote(option)));
    format!("({})", fields.join(", "))
}

pub fn write_bank(records: &[QuestionRecord]) -> String {
    records
        .iter()
        .map(|record| format_record(record) + "\n")
        .collect()
}

/// Persist the records only when the semantic pass found no errors.
/// Returns whether the bank file was written.
pub fn commit(path: &Path, output: &SemanticOutput) -> Result<bool, BankError> {
    if !output.is_clean() {
        info!(
            "Skipping question bank commit: {} semantic error(s)",
            output.errors.len()
        );
        return Ok(false);
    }

    let io_error = |source| BankError::Io {
        path: path.display().to_string(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(io_error)?;
    }
    std::fs::write(path, write_bank(&output.records)).map_err(io_error)?;

    info!(
        "Committed {} record(s) to {}",
        output.records.len(),
        path.display()
    );
    Ok(true)
}

#[derive(Debug, PartialEq)]
enum Field {
    Text(String),
    None,
}

/// Split `('a', None, 'b')` into its fields
fn parse_fields(line: &str) -> Result<Vec<Field>, String> {
    let inner = line
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or_else(|| "record must be wrapped in parentheses".to_string())?;

    let mut fields = Vec::new();
    let mut chars = inner.chars().peekable();

    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}

        match chars.peek() {
            None => break,
            Some('\'') => {
                chars.next();
                let mut text = String::new();
                loop {
                    match chars.next() {
                        Some('\\') => match chars.next() {
                            Some('n') => text.push('\n'),
                            Some(escaped) => text.push(escaped),
                            None => return Err("unterminated escape".to_string()),
                        },
                        Some('\'') => break,
                        Some(ch) => text.push(ch),
                        None => return Err("unterminated string".to_string()),
                    }
                }
                fields.push(Field::Text(text));
            }
            Some(_) => {
                let word: String = chars.by_ref().take_while(|c| *c != ',').collect();
                if word.trim() != NONE_LITERAL {
                    return Err(format!("unexpected field '{}'", word.trim()));
                }
                fields.push(Field::None);
                continue;
            }
        }

        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        match chars.next() {
            None => break,
            Some(',') => {}
            Some(other) => return Err(format!("expected ',' but found '{}'", other)),
        }
    }

    Ok(fields)
}

fn next_text(fields: &mut impl Iterator<Item = Field>, name: &str) -> Result<String, String> {
    match fields.next() {
        Some(Field::Text(value)) => Ok(value),
        Some(Field::None) => Err(format!("{} must be a string", name)),
        None => Err(format!("missing {}", name)),
    }
}

fn parse_record(line: &str) -> Result<QuestionRecord, String> {
    let mut fields = parse_fields(line)?.into_iter();

    let question_type = next_text(&mut fields, "question type")?;
    let difficulty = match fields.next() {
        Some(Field::None) => None,
        Some(Field::Text(label)) => Some(
            Difficulty::from_label(&label)
                .ok_or_else(|| format!("unknown difficulty '{}'", label))?,
        ),
        None => return Err("missing difficulty".to_string()),
    };
    let score_label = next_text(&mut fields, "score")?;
    let score = score_label
        .strip_suffix('分')
        .and_then(|digits| digits.parse::<u32>().ok())
        .ok_or_else(|| format!("invalid score '{}'", score_label))?;
    let content = next_text(&mut fields, "content")?;

    let options = fields
        .map(|field| match field {
            Field::Text(option) => Ok(option),
            Field::None => Err("option must be a string".to_string()),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(QuestionRecord {
        question_type,
        difficulty,
        score,
        content,
        options,
    })
}

/// Parse a bank file back into records, skipping blank lines
pub fn read_bank(text: &str) -> Result<Vec<QuestionRecord>, BankError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            parse_record(line.trim())
                .map_err(|reason| BankError::Malformed { line: idx + 1, reason })
        })
        .collect()
}

pub fn load_bank(path: &Path) -> Result<Vec<QuestionRecord>, BankError> {
    let text = std::fs::read_to_string(path).map_err(|source| BankError::Io {
        path: path.display().to_string(),
        source,
    })?;
    read_bank(&text)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeCount {
    pub question_type: QuestionType,
    pub label: &'static str,
    pub count: usize,
}

/// How many questions of each type a bank holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BankSummary {
    pub total: usize,
    /// Always the four known types, in 单选题, 多选题, 判断题, 简答题 order
    pub by_type: Vec<TypeCount>,
    /// Records whose type label is none of the four
    pub unknown: usize,
}

pub fn count_by_type(records: &[QuestionRecord]) -> BankSummary {
    let mut by_type: Vec<TypeCount> = QuestionType::ALL
        .into_iter()
        .map(|question_type| TypeCount {
            question_type,
            label: question_type.label(),
            count: 0,
        })
        .collect();
    let mut unknown = 0;

    for record in records {
        match by_type
            .iter_mut()
            .find(|entry| entry.label == record.question_type)
        {
            Some(entry) => entry.count += 1,
            None => {
                warn!("Unknown question type in bank: {}", record.question_type);
                unknown += 1;
            }
        }
    }

    BankSummary {
        total: records.len(),
        by_type,
        unknown,
    }
}
