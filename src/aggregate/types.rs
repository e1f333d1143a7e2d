//! Views produced by the aggregator.

use serde::Serialize;

use crate::record::{QUESTION_COUNT, Submission};
use crate::score::score_feedback;

/// A submission with its per-question scores.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredSubmission {
    #[serde(flatten)]
    pub submission: Submission,
    pub question_scores: [u8; QUESTION_COUNT],
}

impl ScoredSubmission {
    pub fn from_submission(submission: Submission) -> Self {
        let question_scores =
            std::array::from_fn(|q| score_feedback(submission.feedback[q].as_deref()));
        Self {
            submission,
            question_scores,
        }
    }

    /// Sum of the question scores, always derived.
    pub fn total_score(&self) -> u8 {
        self.question_scores.iter().sum()
    }

    pub fn is_perfect(&self) -> bool {
        usize::from(self.total_score()) == QUESTION_COUNT
    }

    pub fn is_correct(&self, question: usize) -> bool {
        self.question_scores.get(question) == Some(&1)
    }

    pub fn student_id(&self) -> &str {
        &self.submission.student_id
    }

    pub fn display_time(&self) -> &str {
        &self.submission.display_time
    }
}

/// Percentage of submissions that got one question right.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionAccuracy {
    pub question: String,
    pub accuracy_percent: f64,
}

/// Headline numbers for a table of scored submissions.
///
/// An empty table gives zero counts and `None` for everything that would
/// need at least one row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub submissions: usize,
    pub mean_total: Option<f64>,
    pub perfect_scores: usize,
    pub latest_submission: Option<String>,
    pub question_accuracy: Vec<QuestionAccuracy>,
}

impl Summary {
    pub fn is_empty(&self) -> bool {
        self.submissions == 0
    }
}

/// How many submissions reached a given total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreBucket {
    pub total_score: u8,
    pub submissions: usize,
}

/// One line of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub student_id: String,
    pub total_score: u8,
    #[serde(rename = "Q1_score")]
    pub q1_score: u8,
    #[serde(rename = "Q2_score")]
    pub q2_score: u8,
    #[serde(rename = "Q3_score")]
    pub q3_score: u8,
    pub submitted_at: String,
}

impl From<&ScoredSubmission> for ResultRow {
    fn from(row: &ScoredSubmission) -> Self {
        let [q1_score, q2_score, q3_score] = row.question_scores;
        Self {
            student_id: row.student_id().to_string(),
            total_score: row.total_score(),
            q1_score,
            q2_score,
            q3_score,
            submitted_at: row.display_time().to_string(),
        }
    }
}
