//! Vocabulary accumulation and model persistence
//!
//! Builds the word-statistics vocabulary from a labeled corpus and reads and
//! writes its filtered, pipe-delimited persisted form.

pub mod model;
pub mod trainer;
pub mod types;

pub use model::{load_model, save_model};
pub use trainer::FilterBuilder;
pub use types::{FilterPolicy, TrainingTotals, Vocabulary, WordStat};
