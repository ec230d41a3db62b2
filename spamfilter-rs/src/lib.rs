//! spamfilter-rs: Naive Bayes spam classifier
//!
//! An offline spam/ham text classifier: it trains word-occurrence statistics
//! over a labeled corpus, persists the filtered vocabulary as a flat model
//! file, classifies single messages and batch-evaluates accuracy against a
//! second labeled corpus.
//!
//! # Pipeline
//!
//! - **Corpus segmentation**: a `%%%%%`-delimited stream of labeled records
//! - **Body extraction**: MIME/HTML-aware tokenization behind one trait
//! - **Training**: per-word ham/spam counts plus aggregate totals
//! - **Persistence**: pipe-delimited model with low-signal words filtered out
//! - **Classification**: log-likelihood scoring with degenerate-probability
//!   smoothing and a configurable decision threshold
//! - **Evaluation**: confusion buckets, accuracy and threshold-sweep output
//!
//! # Example
//!
//! ```no_run
//! use spamfilter_rs::classify::SpamFilter;
//! use spamfilter_rs::filter::{save_model, FilterBuilder, FilterPolicy};
//! use spamfilter_rs::mime::{BodyExtractor, MimeBodyExtractor};
//!
//! fn main() -> spamfilter_rs::Result<()> {
//!     let vocabulary = FilterBuilder::new().train_file("corpus.txt")?;
//!     save_model(&vocabulary, "spam-filter.dat", &FilterPolicy::default())?;
//!
//!     let filter = SpamFilter::load("spam-filter.dat")?;
//!     let body = MimeBodyExtractor::new().extract("free money now");
//!     let result = filter.classify(&body.tokens);
//!     println!("{} ({:.4})", result.label(), result.spam_probability());
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`corpus`]: labeled corpus segmentation
//! - [`mime`]: message body extraction boundary
//! - [`filter`]: vocabulary accumulation and model persistence
//! - [`classify`]: the scoring engine
//! - [`evaluate`]: batch accuracy evaluation
//! - [`config`]: configuration management
//! - [`error`]: error types and handling

pub mod classify;
pub mod config;
pub mod corpus;
pub mod error;
pub mod evaluate;
pub mod filter;
pub mod mime;

// Re-export commonly used types
pub use config::Config;
pub use error::{FilterError, Result};
