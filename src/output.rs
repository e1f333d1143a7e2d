//! Rendering and export of dashboard views.
//!
//! Views render as plain text for the terminal or as pretty JSON; the
//! results table can also be written to CSV.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Write as _;
use std::fs::File;
use tracing::debug;

use crate::aggregate::{ResultRow, ScoreBucket, ScoredSubmission, Summary};
use crate::record::QUESTION_COUNT;

pub const NO_DATA: &str = "No submissions yet.";

/// Pretty-printed JSON for any view.
pub fn render_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

pub fn render_summary(summary: &Summary, distribution: &[ScoreBucket]) -> String {
    if summary.is_empty() {
        return NO_DATA.to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "Submissions:        {}", summary.submissions);
    if let Some(mean) = summary.mean_total {
        let _ = writeln!(out, "Mean score:         {mean:.1} / {QUESTION_COUNT}");
    }
    let _ = writeln!(out, "Perfect scores:     {}", summary.perfect_scores);
    let _ = writeln!(
        out,
        "Latest submission:  {}",
        summary.latest_submission.as_deref().unwrap_or("-")
    );

    let _ = writeln!(out, "\nAccuracy by question");
    for q in &summary.question_accuracy {
        let _ = writeln!(out, "  {:<4} {:>5.1}%", q.question, q.accuracy_percent);
    }

    let _ = writeln!(out, "\nScore distribution");
    for bucket in distribution {
        let _ = writeln!(
            out,
            "  {} / {QUESTION_COUNT}  {}",
            bucket.total_score, bucket.submissions
        );
    }
    out
}

/// Aligned text table of result rows.
pub fn render_results(rows: &[ResultRow]) -> String {
    if rows.is_empty() {
        return NO_DATA.to_string();
    }

    let id_width = rows
        .iter()
        .map(|r| r.student_id.chars().count())
        .max()
        .unwrap_or(0)
        .max("student_id".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<id_width$}  total  Q1  Q2  Q3  submitted_at",
        "student_id"
    );
    for r in rows {
        let _ = writeln!(
            out,
            "{:<id_width$}  {:>5}  {:>2}  {:>2}  {:>2}  {}",
            r.student_id, r.total_score, r.q1_score, r.q2_score, r.q3_score, r.submitted_at
        );
    }
    out
}

/// One student's submission, one panel per question.
pub fn render_student(row: &ScoredSubmission) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Student {} (total: {} / {QUESTION_COUNT})",
        row.student_id(),
        row.total_score()
    );
    let _ = writeln!(out, "Submitted at: {}", row.display_time());

    for q in 0..QUESTION_COUNT {
        let badge = if row.is_correct(q) { "correct" } else { "incorrect" };
        let _ = writeln!(out, "\n[Question {}] {badge}", q + 1);
        let _ = writeln!(out, "  Answer:   {}", row.submission.answer_text(q));
        let _ = writeln!(out, "  Feedback: {}", row.submission.feedback_text(q));
    }
    out
}

pub fn render_student_ids(ids: &[&str]) -> String {
    if ids.is_empty() {
        return NO_DATA.to_string();
    }
    let mut out = ids.join("\n");
    out.push('\n');
    out
}

/// Writes the results table to a CSV file, replacing any existing file.
pub fn write_results_csv(path: &str, rows: &[ResultRow]) -> Result<()> {
    debug!(path, rows = rows.len(), "Writing results CSV");

    let file = File::create(path)?;
    let mut writer = csv::Writer::from_writer(file);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}
