//! Scoring and aggregation of normalized submissions.
//!
//! [`ScoredTable`] attaches per-question scores to every row and derives the
//! dashboard views from it: the [`Summary`] metrics, the score distribution,
//! the time-sorted results table and the per-student [`LatestView`].

mod table;
mod types;
mod utility;

pub use table::{LatestView, ScoredTable};
pub use types::{QuestionAccuracy, ResultRow, ScoreBucket, ScoredSubmission, Summary};
