//! Batch evaluation loop

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, warn};

use super::types::{ConfusionCounts, EvaluationReport};
use crate::classify::SpamFilter;
use crate::corpus::{Label, RecordLabel, RecordReader};
use crate::error::{FilterError, Result};
use crate::mime::{BodyExtractor, MimeBodyExtractor};

/// Replays a labeled corpus through a loaded filter and tallies the
/// (predicted, actual) outcomes.
pub struct Evaluator<E: BodyExtractor> {
    filter: SpamFilter,
    extractor: E,
}

impl Evaluator<MimeBodyExtractor> {
    pub fn new(filter: SpamFilter) -> Self {
        Self {
            filter,
            extractor: MimeBodyExtractor::new(),
        }
    }
}

impl<E: BodyExtractor> Evaluator<E> {
    pub fn with_extractor(filter: SpamFilter, extractor: E) -> Self {
        Self { filter, extractor }
    }

    /// Evaluate a corpus file, writing one classification line per message
    /// to `out`.
    pub fn evaluate_file<P: AsRef<Path>, W: Write>(
        &self,
        path: P,
        threshold: f64,
        out: &mut W,
    ) -> Result<EvaluationReport> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(FilterError::Corpus(format!(
                "evaluation corpus {} could not be found",
                path.display()
            )));
        }

        info!("evaluating corpus {}", path.display());
        let started = Instant::now();

        let file = File::open(path)?;
        let report = self.evaluate(BufReader::new(file), threshold, out)?;

        info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            evaluated = report.counts.total(),
            skipped = report.skipped,
            "evaluation complete"
        );

        Ok(report)
    }

    /// Evaluate a corpus stream. The threshold is validated before any input
    /// is consumed; an out-of-range value fails with no work done.
    pub fn evaluate<R: BufRead, W: Write>(
        &self,
        input: R,
        threshold: f64,
        out: &mut W,
    ) -> Result<EvaluationReport> {
        if !(threshold > 0.0 && threshold < 1.0) {
            return Err(FilterError::InvalidThreshold(threshold));
        }

        let mut counts = ConfusionCounts::default();
        let mut skipped: u32 = 0;

        for record in RecordReader::new(input) {
            let record = record?;

            if record.body.is_empty() {
                skipped += 1;
                continue;
            }

            let actual = match &record.label {
                RecordLabel::Known(label) => *label,
                RecordLabel::Unrecognized(other) => {
                    warn!("cannot evaluate record with ground-truth label {:?}", other);
                    skipped += 1;
                    continue;
                }
            };

            let body = self.extractor.extract(&record.body);
            let classification = self.filter.classify(&body.tokens);
            let spam = classification.is_spam_at(threshold)?;
            let predicted = if spam { Label::Spam } else { Label::Ham };

            writeln!(
                out,
                "Classified message as {} with confidence {:.8}, actual type is {}",
                predicted,
                classification.spam_probability(),
                actual
            )?;

            counts.record(predicted, actual);
        }

        debug!(
            spam_as_spam = counts.true_positives,
            ham_as_spam = counts.false_positives,
            spam_as_ham = counts.false_negatives,
            ham_as_ham = counts.true_negatives,
            "confusion buckets"
        );

        Ok(EvaluationReport {
            threshold,
            counts,
            skipped,
        })
    }
}

/// Append one `threshold <TAB> rate <TAB> rate` data point so that repeated
/// runs with different thresholds build up a sweep curve.
pub fn append_roc_point<P: AsRef<Path>>(path: P, report: &EvaluationReport) -> Result<()> {
    let path = path.as_ref();
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;

    writeln!(
        file,
        "{}\t{}\t{}",
        report.threshold,
        report.counts.true_positive_rate(),
        report.counts.false_positive_rate()
    )?;

    debug!("appended sweep data point to {}", path.display());
    Ok(())
}

/// Human-readable metrics summary, printed after the per-message lines.
pub fn write_summary<W: Write>(report: &EvaluationReport, out: &mut W) -> Result<()> {
    let counts = &report.counts;
    let total = f64::from(counts.total());

    writeln!(out, "\n==============================")?;
    writeln!(out, "Total Messages Evaluated:\t{}", counts.total())?;
    if report.skipped > 0 {
        writeln!(out, "Skipped Records:\t{}", report.skipped)?;
    }
    writeln!(
        out,
        "Threshold: {}\tTPR: {:.8}\tFPR: {:.8}",
        report.threshold,
        counts.true_positive_rate(),
        counts.false_positive_rate()
    )?;
    writeln!(
        out,
        "Correct:          \t{}\t({:.8}%)",
        counts.correct(),
        f64::from(counts.correct()) * 100.0 / total
    )?;
    writeln!(
        out,
        "Incorrect:        \t{}\t({:.8}%)",
        counts.incorrect(),
        f64::from(counts.incorrect()) * 100.0 / total
    )?;
    writeln!(
        out,
        "False-Positives:  \t{}\t({:.8}%)",
        counts.false_positives,
        f64::from(counts.false_positives) * 100.0 / total
    )?;
    writeln!(
        out,
        "False-Negatives:  \t{}\t({:.8}%)",
        counts.false_negatives,
        f64::from(counts.false_negatives) * 100.0 / total
    )?;

    Ok(())
}
