//! Streaming reader for delimiter-separated labeled corpora

use std::io::{BufRead, Lines};

use tracing::debug;

use super::types::{CorpusRecord, RecordLabel, RECORD_DELIMITER};
use crate::error::Result;

/// Iterator over the records of a labeled corpus stream.
///
/// The grammar: a `%%%%%` delimiter line precedes each record, the next line
/// is the label, and every following line up to the next delimiter (or end of
/// stream) belongs to the raw body. Lines before the first delimiter are
/// ignored. A record whose body is empty is still yielded, because the label
/// line alone affects the per-class message totals downstream.
pub struct RecordReader<R: BufRead> {
    lines: Lines<R>,
    primed: bool,
    done: bool,
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            primed: false,
            done: false,
        }
    }

    /// Consume preamble lines up to and including the first delimiter.
    fn prime(&mut self) -> Result<bool> {
        loop {
            match self.lines.next() {
                None => return Ok(false),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(line)) if line == RECORD_DELIMITER => return Ok(true),
                Some(Ok(line)) => {
                    debug!("ignoring line before first record delimiter: {:?}", line);
                }
            }
        }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<CorpusRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.primed {
            match self.prime() {
                Ok(true) => self.primed = true,
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(e));
                }
            }
        }

        loop {
            // The previous delimiter has been consumed, so the next line is
            // the record's label.
            let label_line = match self.lines.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e.into()));
                }
                Some(Ok(line)) => line,
            };

            // Consecutive delimiters leave a record with no label line;
            // there is nothing to yield for it.
            if label_line == RECORD_DELIMITER {
                debug!("record delimiter found where a label line was expected");
                continue;
            }

            let label = RecordLabel::parse(&label_line);
            let mut body = String::new();

            loop {
                match self.lines.next() {
                    None => {
                        self.done = true;
                        break;
                    }
                    Some(Err(e)) => {
                        self.done = true;
                        return Some(Err(e.into()));
                    }
                    Some(Ok(line)) if line == RECORD_DELIMITER => break,
                    Some(Ok(line)) => {
                        body.push_str(&line);
                        body.push('\n');
                    }
                }
            }

            return Some(Ok(CorpusRecord { label, body }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::types::Label;
    use std::io::Cursor;

    fn read_all(input: &str) -> Vec<CorpusRecord> {
        RecordReader::new(Cursor::new(input.to_string()))
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_segments_two_records() {
        let records = read_all("%%%%%\nSPAM\nfree money now\n%%%%%\nHAM\nmeeting at noon\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, RecordLabel::Known(Label::Spam));
        assert_eq!(records[0].body, "free money now\n");
        assert_eq!(records[1].label, RecordLabel::Known(Label::Ham));
        assert_eq!(records[1].body, "meeting at noon\n");
    }

    #[test]
    fn test_multiline_body_keeps_newlines() {
        let records = read_all("%%%%%\nHAM\nfirst line\nsecond line\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "first line\nsecond line\n");
    }

    #[test]
    fn test_empty_body_record_is_yielded() {
        let records = read_all("%%%%%\nSPAM\n%%%%%\nHAM\nhello there\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].label, RecordLabel::Known(Label::Spam));
        assert!(records[0].body.is_empty());
    }

    #[test]
    fn test_preamble_is_ignored() {
        let records = read_all("garbage before\nthe first delimiter\n%%%%%\nHAM\nbody text\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].body, "body text\n");
    }

    #[test]
    fn test_unrecognized_label_is_passed_through() {
        let records = read_all("%%%%%\nNEWSLETTER\nsome body\n");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0].label,
            RecordLabel::Unrecognized("NEWSLETTER".to_string())
        );
    }

    #[test]
    fn test_consecutive_delimiters_yield_nothing() {
        let records = read_all("%%%%%\n%%%%%\nHAM\nbody\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].label, RecordLabel::Known(Label::Ham));
    }

    #[test]
    fn test_trailing_delimiter_yields_no_record() {
        let records = read_all("%%%%%\nHAM\nbody\n%%%%%\n");
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_empty_stream() {
        assert!(read_all("").is_empty());
    }
}
