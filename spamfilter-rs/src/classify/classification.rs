//! Per-message scoring result

use std::cell::OnceCell;

use crate::corpus::Label;
use crate::error::{FilterError, Result};

/// Probability above which a message is declared spam when no explicit
/// threshold is supplied. Deliberately below 0.5: a message with no known
/// words scores exactly 0.5 and is treated as spam.
pub const DEFAULT_THRESHOLD: f64 = 0.4;

/// Bayesian adjustment for a degenerate spamicity of exactly 0 or 1.
///
/// A word only ever seen in one class would otherwise contribute an infinite
/// log-likelihood term; the estimate is pulled toward the spam prior with a
/// pseudo-count weight of 3.
pub fn smooth(spamicity: f64, frequency: f64, prior_spam: f64) -> f64 {
    (3.0 * prior_spam + frequency * spamicity) / (3.0 + frequency)
}

/// One vocabulary word found in the message under scrutiny.
#[derive(Debug, Clone, Copy)]
pub(crate) struct WordEvidence {
    pub spamicity: f64,
    pub frequency: u32,
}

/// Scoring result for one message.
///
/// The spam probability is computed on first use and cached for the lifetime
/// of the value, so every decision and confidence accessor agrees on the
/// same number.
pub struct Classification {
    words: Vec<WordEvidence>,
    prior_spam: f64,
    probability: OnceCell<f64>,
}

impl Classification {
    pub(crate) fn new(words: Vec<WordEvidence>, prior_spam: f64) -> Self {
        Self {
            words,
            prior_spam,
            probability: OnceCell::new(),
        }
    }

    /// Number of vocabulary words that contributed signal.
    pub fn evidence_count(&self) -> usize {
        self.words.len()
    }

    /// Sum over the known words of `ln(1 - p) - ln(p)`.
    fn log_likelihood(&self) -> f64 {
        let mut loglik = 0.0;

        for word in &self.words {
            let mut p = word.spamicity;

            // Adjust extreme probability values
            if p == 0.0 || p == 1.0 {
                p = smooth(p, f64::from(word.frequency), self.prior_spam);
            }

            loglik += (1.0 - p).ln() - p.ln();
        }

        loglik
    }

    /// Probability that this message is spam. A message with no known words
    /// has a log-likelihood of 0 and therefore scores exactly 0.5.
    pub fn spam_probability(&self) -> f64 {
        *self
            .probability
            .get_or_init(|| 1.0 / (1.0 + self.log_likelihood().exp()))
    }

    /// Decision at the default threshold.
    pub fn is_spam(&self) -> bool {
        self.spam_probability() > DEFAULT_THRESHOLD
    }

    /// Decision at an explicit threshold, which must lie strictly inside
    /// (0, 1). An out-of-range threshold fails before any scoring happens.
    pub fn is_spam_at(&self, threshold: f64) -> Result<bool> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(FilterError::InvalidThreshold(threshold));
        }

        Ok(self.spam_probability() > threshold)
    }

    /// Predicted label at the default threshold.
    pub fn label(&self) -> Label {
        if self.is_spam() {
            Label::Spam
        } else {
            Label::Ham
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classification(words: &[(f64, u32)], prior_spam: f64) -> Classification {
        Classification::new(
            words
                .iter()
                .map(|&(spamicity, frequency)| WordEvidence {
                    spamicity,
                    frequency,
                })
                .collect(),
            prior_spam,
        )
    }

    #[test]
    fn test_smooth_pulls_toward_prior() {
        // hamCount=0, spamCount=10: p' = (3 * P(spam) + 10 * 1.0) / 13
        let adjusted = smooth(1.0, 10.0, 0.5);
        assert!((adjusted - (3.0 * 0.5 + 10.0) / 13.0).abs() < 1e-12);

        let adjusted = smooth(0.0, 4.0, 0.25);
        assert!((adjusted - (3.0 * 0.25) / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_known_words_scores_exactly_half() {
        let c = classification(&[], 0.5);
        assert_eq!(c.spam_probability(), 0.5);
        // and the default threshold of 0.4 calls that spam
        assert!(c.is_spam());
        assert_eq!(c.label(), Label::Spam);
    }

    #[test]
    fn test_spammy_words_push_probability_up() {
        let c = classification(&[(0.9, 10), (0.8, 5)], 0.5);
        assert!(c.spam_probability() > 0.9);

        let c = classification(&[(0.1, 10), (0.2, 5)], 0.5);
        assert!(c.spam_probability() < 0.1);
    }

    #[test]
    fn test_degenerate_spamicity_is_smoothed_not_infinite() {
        let c = classification(&[(1.0, 10)], 0.5);
        let p = c.spam_probability();
        assert!(p.is_finite());
        // (3 * 0.5 + 10) / 13 = 0.88461538...
        let expected = 1.0 / (1.0 + ((1.0f64 - 11.5 / 13.0).ln() - (11.5f64 / 13.0).ln()).exp());
        assert!((p - expected).abs() < 1e-12);
    }

    #[test]
    fn test_probability_is_cached_and_consistent() {
        let c = classification(&[(0.9, 3)], 0.5);
        let first = c.spam_probability();
        let second = c.spam_probability();
        assert_eq!(first, second);

        // decisions at the same threshold agree with the cached confidence
        let spam_at = c.is_spam_at(DEFAULT_THRESHOLD).unwrap();
        assert_eq!(spam_at, c.spam_probability() > DEFAULT_THRESHOLD);
        assert_eq!(spam_at, c.is_spam());
    }

    #[test]
    fn test_threshold_validation() {
        let c = classification(&[(0.9, 3)], 0.5);

        for bad in [0.0, 1.0, -0.1, 1.5] {
            let err = c.is_spam_at(bad).unwrap_err();
            assert!(matches!(err, FilterError::InvalidThreshold(_)));
        }

        assert!(c.is_spam_at(0.5).is_ok());
    }

    #[test]
    fn test_threshold_monotonicity() {
        let c = classification(&[(0.9, 10), (0.3, 4), (0.7, 2)], 0.5);

        let mut previous = true;
        for step in 1..100 {
            let threshold = f64::from(step) / 100.0;
            let spam = c.is_spam_at(threshold).unwrap();
            // raising the threshold can only flip Spam -> Ham
            assert!(previous || !spam);
            previous = spam;
        }
    }
}
