use std::collections::{BTreeMap, HashSet};

use crate::aggregate::types::{
    QuestionAccuracy, ResultRow, ScoreBucket, ScoredSubmission, Summary,
};
use crate::aggregate::utility::{mean, pct};
use crate::record::{QUESTION_COUNT, SubmissionTable};

/// Scored submissions in fetch order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredTable {
    rows: Vec<ScoredSubmission>,
}

impl ScoredTable {
    /// Scores every row of a normalized table.
    pub fn from_table(table: &SubmissionTable) -> Self {
        Self {
            rows: table
                .rows
                .iter()
                .cloned()
                .map(ScoredSubmission::from_submission)
                .collect(),
        }
    }

    pub fn rows(&self) -> &[ScoredSubmission] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows whose `student_id` contains `needle` (case-sensitive).
    ///
    /// Returns a new table; `self` is left untouched. An empty needle keeps
    /// every row.
    pub fn filter_student(&self, needle: &str) -> ScoredTable {
        ScoredTable {
            rows: self
                .rows
                .iter()
                .filter(|row| row.student_id().contains(needle))
                .cloned()
                .collect(),
        }
    }

    pub fn summary(&self) -> Summary {
        if self.rows.is_empty() {
            return Summary {
                submissions: 0,
                mean_total: None,
                perfect_scores: 0,
                latest_submission: None,
                question_accuracy: Vec::new(),
            };
        }

        let totals: Vec<f64> = self.rows.iter().map(|r| f64::from(r.total_score())).collect();

        let question_accuracy = (0..QUESTION_COUNT)
            .map(|q| {
                let correct = self.rows.iter().filter(|r| r.is_correct(q)).count();
                QuestionAccuracy {
                    question: format!("Q{}", q + 1),
                    accuracy_percent: pct(correct, self.rows.len()),
                }
            })
            .collect();

        let latest_submission = self
            .rows
            .iter()
            .filter(|r| r.submission.submitted_at.is_some())
            .max_by_key(|r| r.submission.submitted_at)
            .map(|r| r.display_time().to_string());

        Summary {
            submissions: self.rows.len(),
            mean_total: mean(&totals),
            perfect_scores: self.rows.iter().filter(|r| r.is_perfect()).count(),
            latest_submission,
            question_accuracy,
        }
    }

    /// Number of submissions per total score, lowest total first. Totals
    /// nobody reached are left out.
    pub fn score_distribution(&self) -> Vec<ScoreBucket> {
        let mut counts: BTreeMap<u8, usize> = BTreeMap::new();
        for row in &self.rows {
            *counts.entry(row.total_score()).or_default() += 1;
        }
        counts
            .into_iter()
            .map(|(total_score, submissions)| ScoreBucket {
                total_score,
                submissions,
            })
            .collect()
    }

    /// Results table, newest submission first. Rows without a timestamp go
    /// last; equal timestamps keep fetch order.
    pub fn results_by_time_desc(&self) -> Vec<ResultRow> {
        let mut rows: Vec<&ScoredSubmission> = self.rows.iter().collect();
        rows.sort_by(|a, b| b.submission.submitted_at.cmp(&a.submission.submitted_at));
        rows.into_iter().map(ResultRow::from).collect()
    }

    /// Distinct student ids in order of first appearance.
    pub fn student_ids(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.rows
            .iter()
            .map(ScoredSubmission::student_id)
            .filter(|id| seen.insert(*id))
            .collect()
    }

    /// Each student's most recent submission.
    pub fn latest_by_student(&self) -> LatestView<'_> {
        let mut latest: BTreeMap<&str, usize> = BTreeMap::new();

        for (idx, row) in self.rows.iter().enumerate() {
            latest
                .entry(row.student_id())
                .and_modify(|current| {
                    // `>=` so that on a tie the row fetched later wins.
                    let current_at = self.rows[*current].submission.submitted_at;
                    if row.submission.submitted_at >= current_at {
                        *current = idx;
                    }
                })
                .or_insert(idx);
        }

        LatestView { table: self, latest }
    }
}

/// Lookup from student id to that student's representative submission.
///
/// The representative is the row with the greatest `submitted_at`; a known
/// timestamp beats a missing one.
#[derive(Debug)]
pub struct LatestView<'a> {
    table: &'a ScoredTable,
    latest: BTreeMap<&'a str, usize>,
}

impl<'a> LatestView<'a> {
    pub fn get(&self, student_id: &str) -> Option<&'a ScoredSubmission> {
        let table = self.table;
        self.latest.get(student_id).map(|&idx| &table.rows[idx])
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    /// Students in id order with their latest submission.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ScoredSubmission)> + '_ {
        let table = self.table;
        self.latest
            .iter()
            .map(move |(&id, &idx)| (id, &table.rows[idx]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::record::RawSubmission;

    fn raw(
        student_id: &str,
        created_at: Option<&str>,
        feedback: [Option<&str>; 3],
    ) -> RawSubmission {
        RawSubmission {
            student_id: Some(student_id.to_string()),
            created_at: created_at.map(str::to_string),
            feedback_1: feedback[0].map(str::to_string),
            feedback_2: feedback[1].map(str::to_string),
            feedback_3: feedback[2].map(str::to_string),
            ..Default::default()
        }
    }

    fn scored(rows: Vec<RawSubmission>) -> ScoredTable {
        ScoredTable::from_table(&load(rows))
    }

    fn sample() -> ScoredTable {
        scored(vec![
            raw("20101", Some("2024-03-01T01:00:00Z"), [Some("O: ok"), Some("O"), Some("O")]),
            raw("20102", Some("2024-03-01T02:00:00Z"), [Some("O: ok"), Some("X"), Some("o")]),
            raw("20203", Some("2024-03-01T03:00:00Z"), [Some("x: no"), None, Some("O")]),
        ])
    }

    #[test]
    fn test_total_is_sum_of_questions() {
        for row in sample().rows() {
            let sum: u8 = row.question_scores.iter().sum();
            assert_eq!(row.total_score(), sum);
            assert!(row.total_score() <= 3);
        }
    }

    #[test]
    fn test_missing_feedback_scores_zero() {
        let table = scored(vec![raw("s1", None, [None, None, None])]);
        assert_eq!(table.rows()[0].question_scores, [0, 0, 0]);
        assert_eq!(table.rows()[0].total_score(), 0);
    }

    #[test]
    fn test_summary_mean_and_perfect() {
        let summary = sample().summary();

        assert_eq!(summary.submissions, 3);
        assert_eq!(summary.mean_total, Some(2.0));
        assert_eq!(summary.perfect_scores, 1);
        assert_eq!(summary.latest_submission.as_deref(), Some("2024-03-01 12:00:00"));
    }

    #[test]
    fn test_summary_question_accuracy() {
        let summary = sample().summary();
        let percents: Vec<f64> = summary
            .question_accuracy
            .iter()
            .map(|q| q.accuracy_percent)
            .collect();

        assert_eq!(summary.question_accuracy[0].question, "Q1");
        assert!((percents[0] - 200.0 / 3.0).abs() < 1e-9);
        assert!((percents[1] - 100.0 / 3.0).abs() < 1e-9);
        assert_eq!(percents[2], 100.0);
    }

    #[test]
    fn test_summary_empty_table() {
        let summary = ScoredTable::default().summary();

        assert!(summary.is_empty());
        assert_eq!(summary.perfect_scores, 0);
        assert_eq!(summary.mean_total, None);
        assert_eq!(summary.latest_submission, None);
        assert!(summary.question_accuracy.is_empty());
    }

    #[test]
    fn test_summary_latest_ignores_unknown_time() {
        let table = scored(vec![
            raw("s1", None, [None, None, None]),
            raw("s2", Some("2024-03-01T01:00:00Z"), [None, None, None]),
        ]);
        assert_eq!(table.summary().latest_submission.as_deref(), Some("2024-03-01 10:00:00"));

        let table = scored(vec![raw("s1", None, [None, None, None])]);
        assert_eq!(table.summary().latest_submission, None);
    }

    #[test]
    fn test_filter_is_narrowing() {
        let table = sample();
        let filtered = table.filter_student("201");

        assert_eq!(filtered.len(), 2);
        assert!(filtered.rows().iter().all(|r| r.student_id().contains("201")));
        assert!(filtered.rows().iter().all(|r| table.rows().contains(r)));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_filter_case_sensitive_and_empty_needle() {
        let table = scored(vec![raw("Kim01", None, [None, None, None])]);

        assert!(table.filter_student("kim").is_empty());
        assert_eq!(table.filter_student("Kim").len(), 1);
        assert_eq!(table.filter_student("").len(), 1);
        assert!(table.filter_student("zzz").summary().is_empty());
    }

    #[test]
    fn test_score_distribution() {
        let distribution = sample().score_distribution();
        assert_eq!(
            distribution,
            vec![
                ScoreBucket { total_score: 1, submissions: 1 },
                ScoreBucket { total_score: 2, submissions: 1 },
                ScoreBucket { total_score: 3, submissions: 1 },
            ]
        );
        assert!(ScoredTable::default().score_distribution().is_empty());
    }

    #[test]
    fn test_results_newest_first_unknown_last() {
        let table = scored(vec![
            raw("a", None, [None, None, None]),
            raw("b", Some("2024-03-01T01:00:00Z"), [Some("O"), None, None]),
            raw("c", Some("2024-03-02T01:00:00Z"), [None, None, None]),
        ]);
        let results = table.results_by_time_desc();
        let ids: Vec<&str> = results.iter().map(|r| r.student_id.as_str()).collect();

        assert_eq!(ids, vec!["c", "b", "a"]);
        assert_eq!(results[1].q1_score, 1);
        assert_eq!(results[1].total_score, 1);
        assert_eq!(results[2].submitted_at, "time unknown");
    }

    #[test]
    fn test_student_ids_unique_in_order() {
        let table = scored(vec![
            raw("b", None, [None, None, None]),
            raw("a", None, [None, None, None]),
            raw("b", None, [None, None, None]),
        ]);
        assert_eq!(table.student_ids(), vec!["b", "a"]);
    }

    #[test]
    fn test_latest_submission_per_student() {
        let table = scored(vec![
            raw("s1", Some("2024-03-02 00:00:00"), [Some("O"), Some("O"), Some("O")]),
            raw("s1", Some("2024-03-01 01:00:00"), [Some("O"), Some("O"), None]),
            raw("s2", Some("2024-03-01 01:00:00"), [None, None, None]),
        ]);
        let latest = table.latest_by_student();

        assert_eq!(latest.len(), 2);
        let s1 = latest.get("s1").unwrap();
        assert_eq!(s1.display_time(), "2024-03-02 09:00:00");
        assert_eq!(s1.total_score(), 3);
        assert!(latest.get("nobody").is_none());
    }

    #[test]
    fn test_latest_is_max_of_students_rows() {
        let table = sample();
        let latest = table.latest_by_student();

        for (id, row) in latest.iter() {
            let max = table
                .rows()
                .iter()
                .filter(|r| r.student_id() == id)
                .map(|r| r.submission.submitted_at)
                .max()
                .unwrap();
            assert_eq!(row.submission.submitted_at, max);
        }
    }

    #[test]
    fn test_latest_tie_prefers_later_fetch() {
        let table = scored(vec![
            raw("s1", Some("2024-03-01T01:00:00Z"), [None, None, None]),
            raw("s1", Some("2024-03-01T01:00:00Z"), [Some("O"), None, None]),
        ]);
        assert_eq!(table.latest_by_student().get("s1").unwrap().total_score(), 1);
    }

    #[test]
    fn test_latest_known_time_beats_unknown() {
        let table = scored(vec![
            raw("s1", Some("2024-03-01T01:00:00Z"), [Some("O"), None, None]),
            raw("s1", None, [None, None, None]),
        ]);
        assert_eq!(table.latest_by_student().get("s1").unwrap().total_score(), 1);
    }

    #[test]
    fn test_latest_empty_table() {
        let table = ScoredTable::default();
        assert!(table.latest_by_student().is_empty());
    }
}
