//! Labeled corpus segmentation
//!
//! Splits a delimiter-separated corpus stream into labeled message records
//! for training and evaluation.

pub mod reader;
pub mod types;

pub use reader::RecordReader;
pub use types::{CorpusRecord, Label, RecordLabel, RECORD_DELIMITER};
