//! Message body extraction
//!
//! Turns a raw message (MIME headers, transfer encodings, HTML and all) into
//! the normalized token set and word count consumed by the statistical core.
//! The core only ever sees the [`BodyExtractor`] trait, so no document-format
//! handling leaks past this module.

pub mod extractor;
pub mod types;

pub use extractor::MimeBodyExtractor;
pub use types::{BodyExtractor, MessageBody};
