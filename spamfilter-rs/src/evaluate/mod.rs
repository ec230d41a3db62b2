//! Batch evaluation against a labeled corpus
//!
//! Replays the corpus grammar with the label line as ground truth, buckets
//! every classification into the four (predicted, actual) outcomes and
//! appends one threshold/rate data point per run to a results file.

pub mod evaluator;
pub mod types;

pub use evaluator::{append_roc_point, write_summary, Evaluator};
pub use types::{ConfusionCounts, EvaluationReport};
