//! Record loading and normalization.
//!
//! Turns raw rows from a [`SubmissionSource`] into a [`SubmissionTable`]:
//! timestamps are moved into the display timezone (Asia/Seoul) and
//! formatted, missing columns stay `None` and are rendered with defaults
//! later.

use chrono::{DateTime, FixedOffset, NaiveDateTime};
use tracing::{error, info, warn};

use crate::record::{RawSubmission, Submission, SubmissionTable, TIME_UNKNOWN};
use crate::source::SubmissionSource;

/// Asia/Seoul has been UTC+9 with no daylight saving since 1988.
const SEOUL_UTC_OFFSET_SECS: i32 = 9 * 3600;

pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const NAIVE_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];
const OFFSET_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%d %H:%M:%S%.f%#z"];

pub fn display_timezone() -> FixedOffset {
    FixedOffset::east_opt(SEOUL_UTC_OFFSET_SECS).expect("+09:00 is a valid offset")
}

/// Parses a `created_at` value and converts it to the display timezone.
///
/// Values without an offset are taken as UTC. Returns `None` when the
/// string matches none of the accepted formats.
pub fn parse_timestamp(s: &str) -> Option<DateTime<FixedOffset>> {
    let s = s.trim();
    let tz = display_timezone();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&tz));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&tz));
        }
    }
    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc().with_timezone(&tz))
}

/// Normalizes a single raw row.
pub fn normalize(raw: RawSubmission) -> Submission {
    let submitted_at = match raw.created_at.as_deref() {
        Some(s) => {
            let parsed = parse_timestamp(s);
            if parsed.is_none() {
                warn!(created_at = s, "Unparseable created_at, treating as unknown");
            }
            parsed
        }
        None => None,
    };

    let display_time = submitted_at
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_else(|| TIME_UNKNOWN.to_string());

    Submission {
        student_id: raw.student_id.unwrap_or_default(),
        submitted_at,
        display_time,
        answers: [raw.answer_1, raw.answer_2, raw.answer_3],
        feedback: [raw.feedback_1, raw.feedback_2, raw.feedback_3],
    }
}

/// Normalizes a batch of raw rows, one output row per input row, in order.
pub fn load(raw: Vec<RawSubmission>) -> SubmissionTable {
    SubmissionTable {
        rows: raw.into_iter().map(normalize).collect(),
    }
}

/// Result of fetching and normalizing a full snapshot.
///
/// A failed fetch still yields a (empty) table; the message is kept for
/// display.
#[derive(Debug)]
pub struct LoadOutcome {
    pub table: SubmissionTable,
    pub error: Option<String>,
}

/// Fetches every record from `source` and normalizes them.
#[tracing::instrument(skip(source))]
pub async fn load_from<S: SubmissionSource + ?Sized>(source: &S) -> LoadOutcome {
    match source.fetch_all().await {
        Ok(raw) => {
            let table = load(raw);
            info!(rows = table.len(), "Submissions loaded");
            LoadOutcome { table, error: None }
        }
        Err(e) => {
            error!(error = %e, "Failed to load submissions");
            LoadOutcome {
                table: SubmissionTable::default(),
                error: Some(e.to_string()),
            }
        }
    }
}
