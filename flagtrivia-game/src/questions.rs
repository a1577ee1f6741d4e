//! Question bank: immutable trivia data grouped by category.
use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::QUESTION_ROW_FIELDS;

/// A multiple-choice question with one correct answer and three distractors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub category: String,
    pub prompt: String,
    pub correct: String,
    pub distractors: [String; 3],
}

impl Question {
    /// Build a question from one data row, or `None` if the row is too short.
    #[must_use]
    pub fn from_row<S: AsRef<str>>(row: &[S]) -> Option<Self> {
        if row.len() < QUESTION_ROW_FIELDS {
            return None;
        }
        let field = |idx: usize| row[idx].as_ref().to_string();
        Some(Self {
            category: row[0].as_ref().trim().to_string(),
            prompt: field(1),
            correct: field(2),
            distractors: [field(3), field(4), field(5)],
        })
    }
}

/// Category → questions. Categories never map to an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionBank {
    by_category: BTreeMap<String, Vec<Question>>,
}

impl QuestionBank {
    #[must_use]
    pub fn from_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let mut by_category: BTreeMap<String, Vec<Question>> = BTreeMap::new();
        for question in questions {
            by_category
                .entry(question.category.clone())
                .or_default()
                .push(question);
        }
        Self { by_category }
    }

    /// Build a bank from raw rows of fields; short rows are skipped silently.
    #[must_use]
    pub fn from_rows<I, R, S>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: AsRef<[S]>,
        S: AsRef<str>,
    {
        Self::from_questions(
            rows.into_iter()
                .filter_map(|row| Question::from_row(row.as_ref())),
        )
    }

    /// Parse comma-separated text, one question per line.
    #[must_use]
    pub fn from_csv(text: &str) -> Self {
        Self::from_rows::<_, _, String>(split_csv_records(text))
    }

    /// Load a bank serialized as `{ "Category": [Question, ...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let parsed: Self = serde_json::from_str(json)?;
        Ok(Self::from_questions(
            parsed.by_category.into_values().flatten(),
        ))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_category.is_empty()
    }

    /// Total number of questions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_category.values().map(Vec::len).sum()
    }

    pub fn categories(&self) -> impl Iterator<Item = &str> + '_ {
        self.by_category.keys().map(String::as_str)
    }

    #[must_use]
    pub fn questions_in(&self, category: &str) -> &[Question] {
        self.by_category.get(category).map_or(&[], Vec::as_slice)
    }

    /// Pick a question for `category`, falling back to a random category.
    ///
    /// Returns `None` only when the bank holds no questions at all.
    pub fn pick_from<R: Rng + ?Sized>(&self, category: &str, rng: &mut R) -> Option<&Question> {
        let pool = self.questions_in(category);
        if !pool.is_empty() {
            return pool.get(rng.gen_range(0..pool.len()));
        }
        self.pick_any(rng)
    }

    fn pick_any<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<&Question> {
        if self.by_category.is_empty() {
            return None;
        }
        let idx = rng.gen_range(0..self.by_category.len());
        let pool = self.by_category.values().nth(idx)?;
        pool.get(rng.gen_range(0..pool.len()))
    }
}

/// Split CSV text into records of fields.
///
/// Handles double-quoted fields with embedded commas, newlines, and `""`
/// escapes. Blank lines produce no record.
fn split_csv_records(text: &str) -> Vec<Vec<String>> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' if chars.peek() == Some(&'"') => {
                    field.push('"');
                    chars.next();
                }
                '"' => in_quotes = false,
                _ => field.push(ch),
            }
            continue;
        }
        match ch {
            '"' => in_quotes = true,
            ',' => record.push(std::mem::take(&mut field)),
            '\r' => {}
            '\n' => finish_record(&mut records, &mut record, &mut field),
            _ => field.push(ch),
        }
    }
    finish_record(&mut records, &mut record, &mut field);
    records
}

fn finish_record(records: &mut Vec<Vec<String>>, record: &mut Vec<String>, field: &mut String) {
    if record.is_empty() && field.is_empty() {
        return;
    }
    record.push(std::mem::take(field));
    records.push(std::mem::take(record));
}
