//! Extractor boundary types

use std::collections::HashSet;

/// Normalized view of one message body.
#[derive(Debug, Clone, Default)]
pub struct MessageBody {
    /// Unique lower-case tokens of 3 to 15 characters.
    pub tokens: HashSet<String>,
    /// Whitespace-separated word count over the raw text, duplicates included.
    pub word_count: usize,
}

/// Boundary between raw message text and the statistical core.
///
/// Implementations own all MIME/HTML awareness; the trainer, classifier and
/// evaluator only consume the resulting [`MessageBody`].
pub trait BodyExtractor {
    fn extract(&self, raw: &str) -> MessageBody;
}
