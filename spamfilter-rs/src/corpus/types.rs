//! Corpus record types

use std::fmt;

/// Reserved line that precedes every record in a labeled corpus stream.
pub const RECORD_DELIMITER: &str = "%%%%%";

/// Message class assigned by the corpus or by the classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    /// Parse a corpus label line. Only the two exact literals are recognized.
    pub fn parse(line: &str) -> Option<Label> {
        match line {
            "HAM" => Some(Label::Ham),
            "SPAM" => Some(Label::Spam),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "HAM",
            Label::Spam => "SPAM",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label line of a corpus record.
///
/// Anything other than the two recognized literals is carried through as
/// [`RecordLabel::Unrecognized`] instead of being dropped, so the caller can
/// report it and decide what to do with the record's tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordLabel {
    Known(Label),
    Unrecognized(String),
}

impl RecordLabel {
    pub fn parse(line: &str) -> RecordLabel {
        match Label::parse(line) {
            Some(label) => RecordLabel::Known(label),
            None => RecordLabel::Unrecognized(line.to_string()),
        }
    }

    pub fn known(&self) -> Option<Label> {
        match self {
            RecordLabel::Known(label) => Some(*label),
            RecordLabel::Unrecognized(_) => None,
        }
    }
}

/// One segmented corpus record: the label line and the raw message body
/// (all lines up to the next delimiter, each terminated by a newline).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusRecord {
    pub label: RecordLabel,
    pub body: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_labels() {
        assert_eq!(Label::parse("HAM"), Some(Label::Ham));
        assert_eq!(Label::parse("SPAM"), Some(Label::Spam));
    }

    #[test]
    fn test_parse_rejects_case_variants() {
        assert_eq!(Label::parse("ham"), None);
        assert_eq!(Label::parse("Spam"), None);
        assert_eq!(Label::parse(" SPAM"), None);
    }

    #[test]
    fn test_record_label_passthrough() {
        let label = RecordLabel::parse("NEWSLETTER");
        assert_eq!(label, RecordLabel::Unrecognized("NEWSLETTER".to_string()));
        assert_eq!(label.known(), None);
        assert_eq!(RecordLabel::parse("HAM").known(), Some(Label::Ham));
    }
}
