//! Loaded filter state and message scoring

use std::collections::HashSet;
use std::path::Path;

use tracing::debug;

use super::classification::{Classification, WordEvidence};
use crate::error::{FilterError, Result};
use crate::filter::{load_model, Vocabulary};

/// A loaded spam filter: the persisted vocabulary plus the class priors and
/// mean body sizes derived from its aggregate totals. Read-only once built.
pub struct SpamFilter {
    vocabulary: Vocabulary,
    prob_ham: f64,
    prob_spam: f64,
    ham_size: u64,
    spam_size: u64,
}

impl SpamFilter {
    /// Load a persisted model file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FilterError::Model(format!(
                "model file {} does not exist",
                path.display()
            )));
        }

        Self::from_vocabulary(load_model(path)?)
    }

    /// Derive the classifier state from a vocabulary's aggregate totals.
    pub fn from_vocabulary(vocabulary: Vocabulary) -> Result<Self> {
        let totals = vocabulary.totals();
        let total_messages = totals.total_messages();
        if total_messages == 0 {
            return Err(FilterError::Model(
                "model contains no ham or spam messages".to_string(),
            ));
        }

        let prob_ham = f64::from(totals.ham_messages) / f64::from(total_messages);
        let prob_spam = f64::from(totals.spam_messages) / f64::from(total_messages);

        // Mean body length per class; a class with no messages at all still
        // loads, it just carries no mean.
        let ham_size = totals
            .ham_words
            .checked_div(u64::from(totals.ham_messages))
            .unwrap_or(0);
        let spam_size = totals
            .spam_words
            .checked_div(u64::from(totals.spam_messages))
            .unwrap_or(0);

        debug!(
            prob_ham,
            prob_spam, ham_size, spam_size, "derived classifier priors"
        );

        Ok(Self {
            vocabulary,
            prob_ham,
            prob_spam,
            ham_size,
            spam_size,
        })
    }

    /// Score a message's token set. Tokens absent from the vocabulary are
    /// silently excluded; they contribute no signal either way.
    pub fn classify(&self, tokens: &HashSet<String>) -> Classification {
        let mut words = Vec::new();

        for token in tokens {
            if let Some(stat) = self.vocabulary.get(token) {
                words.push(WordEvidence {
                    spamicity: stat.spamicity(),
                    frequency: stat.frequency(),
                });
            }
        }

        Classification::new(words, self.prob_spam)
    }

    pub fn prob_ham(&self) -> f64 {
        self.prob_ham
    }

    pub fn prob_spam(&self) -> f64 {
        self.prob_spam
    }

    /// Mean word count of a ham message in the training corpus.
    pub fn ham_size(&self) -> u64 {
        self.ham_size
    }

    /// Mean word count of a spam message in the training corpus.
    pub fn spam_size(&self) -> u64 {
        self.spam_size
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{TrainingTotals, WordStat};
    use std::collections::HashMap;

    fn filter(entries: &[(&str, u32, u32, f64)], ham: u32, spam: u32) -> SpamFilter {
        let mut words = HashMap::new();
        for &(word, ham_count, spam_count, spamicity) in entries {
            words.insert(
                word.to_string(),
                WordStat::from_parts(word, ham_count, spam_count, spamicity),
            );
        }
        let totals = TrainingTotals {
            ham_messages: ham,
            spam_messages: spam,
            ham_words: u64::from(ham) * 20,
            spam_words: u64::from(spam) * 10,
            records: ham + spam,
        };
        SpamFilter::from_vocabulary(Vocabulary::from_parts(words, totals)).unwrap()
    }

    fn tokens(words: &[&str]) -> HashSet<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_priors_and_sizes() {
        let f = filter(&[], 30, 10);
        assert!((f.prob_ham() - 0.75).abs() < 1e-12);
        assert!((f.prob_spam() - 0.25).abs() < 1e-12);
        assert_eq!(f.ham_size(), 20);
        assert_eq!(f.spam_size(), 10);
    }

    #[test]
    fn test_empty_model_is_rejected() {
        let vocabulary = Vocabulary::from_parts(HashMap::new(), TrainingTotals::default());
        assert!(matches!(
            SpamFilter::from_vocabulary(vocabulary),
            Err(FilterError::Model(_))
        ));
    }

    #[test]
    fn test_unknown_words_are_excluded() {
        let f = filter(&[("viagra", 0, 9, 1.0)], 10, 10);
        let c = f.classify(&tokens(&["totally", "unknown", "words"]));
        assert_eq!(c.evidence_count(), 0);
        assert_eq!(c.spam_probability(), 0.5);
    }

    #[test]
    fn test_known_words_contribute() {
        let f = filter(
            &[("viagra", 0, 9, 1.0), ("meeting", 9, 0, 0.0)],
            10,
            10,
        );

        let spammy = f.classify(&tokens(&["viagra", "unknown"]));
        assert_eq!(spammy.evidence_count(), 1);
        assert!(spammy.spam_probability() > 0.5);

        let hammy = f.classify(&tokens(&["meeting"]));
        assert!(hammy.spam_probability() < 0.5);
    }
}
