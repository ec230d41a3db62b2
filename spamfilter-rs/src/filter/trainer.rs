//! Vocabulary training over a labeled corpus

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::types::{TrainingTotals, Vocabulary, WordStat};
use crate::corpus::{RecordLabel, RecordReader};
use crate::error::{FilterError, Result};
use crate::mime::{BodyExtractor, MimeBodyExtractor};

/// Builds a [`Vocabulary`] by folding corpus records into word statistics.
pub struct FilterBuilder<E: BodyExtractor> {
    extractor: E,
}

impl FilterBuilder<MimeBodyExtractor> {
    pub fn new() -> Self {
        Self {
            extractor: MimeBodyExtractor::new(),
        }
    }
}

impl Default for FilterBuilder<MimeBodyExtractor> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: BodyExtractor> FilterBuilder<E> {
    pub fn with_extractor(extractor: E) -> Self {
        Self { extractor }
    }

    /// Train over a corpus file. The file must already exist; training never
    /// creates or truncates anything on this path.
    pub fn train_file<P: AsRef<Path>>(&self, path: P) -> Result<Vocabulary> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FilterError::Corpus(format!(
                "training corpus {} could not be found",
                path.display()
            )));
        }

        info!("processing corpus {}", path.display());
        let started = Instant::now();

        let file = File::open(path)?;
        let vocabulary = self.train(BufReader::new(file))?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            words = vocabulary.len(),
            messages = vocabulary.totals().total_messages(),
            "training complete"
        );

        Ok(vocabulary)
    }

    /// Fold every record of the stream into a fresh vocabulary.
    ///
    /// Per record: the per-class message counter ticks on the label line;
    /// an empty body skips extraction entirely; otherwise the word totals
    /// grow by the record's word count and each distinct token's stat is
    /// created or updated. A record with an unrecognized label is reported
    /// and kept out of all aggregate totals, but its tokens still pass
    /// through the word table (entries are created without moving either
    /// class counter).
    pub fn train<R: BufRead>(&self, input: R) -> Result<Vocabulary> {
        let mut words: HashMap<String, WordStat> = HashMap::new();
        let mut totals = TrainingTotals::default();

        for record in RecordReader::new(input) {
            let record = record?;
            totals.records += 1;

            match &record.label {
                RecordLabel::Known(label) => totals.record_message(*label),
                RecordLabel::Unrecognized(other) => {
                    warn!("error categorizing {:?} type", other);
                }
            }

            if record.body.is_empty() {
                debug!("skipping record with empty body");
                continue;
            }

            let body = self.extractor.extract(&record.body);

            match record.label {
                RecordLabel::Known(label) => {
                    totals.record_words(label, body.word_count);

                    for token in body.tokens {
                        match words.entry(token) {
                            Entry::Occupied(mut entry) => entry.get_mut().record(label),
                            Entry::Vacant(entry) => {
                                let stat = WordStat::new(entry.key(), label);
                                entry.insert(stat);
                            }
                        }
                    }
                }
                RecordLabel::Unrecognized(_) => {
                    for token in body.tokens {
                        match words.entry(token) {
                            Entry::Occupied(_) => {}
                            Entry::Vacant(entry) => {
                                let stat = WordStat::untrained(entry.key());
                                entry.insert(stat);
                            }
                        }
                    }
                }
            }

            if totals.records % 2500 == 0 {
                info!("parsed {} messages", totals.records);
            }
        }

        Ok(Vocabulary::from_parts(words, totals))
    }
}
