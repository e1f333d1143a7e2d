//! Submission record types.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

/// Number of graded questions per submission. A perfect total equals this.
pub const QUESTION_COUNT: usize = 3;

/// Shown in place of a timestamp when `created_at` is missing or unreadable.
pub const TIME_UNKNOWN: &str = "time unknown";

/// Shown in place of missing answer or feedback text.
pub const MISSING_TEXT: &str = "-";

/// One row of `student_submissions` as returned by the data source.
///
/// Every column is optional; defaults are applied by the loader.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawSubmission {
    #[serde(default, deserialize_with = "string_or_number")]
    pub student_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub answer_1: Option<String>,
    #[serde(default)]
    pub answer_2: Option<String>,
    #[serde(default)]
    pub answer_3: Option<String>,
    #[serde(default)]
    pub feedback_1: Option<String>,
    #[serde(default)]
    pub feedback_2: Option<String>,
    #[serde(default)]
    pub feedback_3: Option<String>,
}

/// Student ids are usually text, but numeric ids show up in hand-made
/// tables. Both become strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

/// A normalized submission: timestamps in the display timezone, every
/// column present (possibly as `None`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub student_id: String,
    pub submitted_at: Option<DateTime<FixedOffset>>,
    pub display_time: String,
    pub answers: [Option<String>; QUESTION_COUNT],
    pub feedback: [Option<String>; QUESTION_COUNT],
}

impl Submission {
    /// Answer text for a zero-based question index, or `-` when absent.
    pub fn answer_text(&self, question: usize) -> &str {
        self.answers
            .get(question)
            .and_then(|a| a.as_deref())
            .unwrap_or(MISSING_TEXT)
    }

    /// Feedback text for a zero-based question index, or `-` when absent.
    pub fn feedback_text(&self, question: usize) -> &str {
        self.feedback
            .get(question)
            .and_then(|f| f.as_deref())
            .unwrap_or(MISSING_TEXT)
    }
}

/// The normalized table produced by one load.
#[derive(Debug, Clone, Default)]
pub struct SubmissionTable {
    pub rows: Vec<Submission>,
}

impl SubmissionTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}
