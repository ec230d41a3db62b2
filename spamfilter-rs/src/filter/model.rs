//! Persisted model format
//!
//! A model file is a header line of the four aggregate totals followed by one
//! pipe-delimited line per retained word:
//!
//! ```text
//! <hamMessages>|<spamMessages>|<hamWordTotal>|<spamWordTotal>
//! <word>|<hamCount>|<spamCount>|<spamicity>
//! ```
//!
//! Spamicity is written with at most 8 and at least 2 fractional digits.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use tracing::{debug, info, warn};

use super::types::{FilterPolicy, TrainingTotals, Vocabulary, WordStat};
use crate::error::{FilterError, Result};

/// Serialize the vocabulary to `path`, keeping only the words the policy
/// retains. Returns the number of word lines written.
pub fn save_model<P: AsRef<Path>>(
    vocabulary: &Vocabulary,
    path: P,
    policy: &FilterPolicy,
) -> Result<usize> {
    let path = path.as_ref();
    info!("writing model to {}", path.display());

    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    let totals = vocabulary.totals();
    writeln!(
        out,
        "{}|{}|{}|{}",
        totals.ham_messages, totals.spam_messages, totals.ham_words, totals.spam_words
    )?;

    // Sorted output keeps identical training runs byte-identical.
    let mut retained: Vec<&WordStat> = vocabulary
        .iter()
        .filter(|stat| policy.retains(stat, totals.records))
        .collect();
    retained.sort_by(|a, b| a.word().cmp(b.word()));

    for stat in &retained {
        writeln!(
            out,
            "{}|{}|{}|{}",
            stat.word(),
            stat.ham_count(),
            stat.spam_count(),
            format_spamicity(stat.derived_spamicity())
        )?;
    }

    out.flush()?;
    info!("wrote {} words to {}", retained.len(), path.display());

    Ok(retained.len())
}

/// Load a persisted model back into a [`Vocabulary`].
///
/// Malformed word lines are reported and skipped; a malformed header is
/// fatal because nothing can be classified without the aggregate totals.
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Vocabulary> {
    let path = path.as_ref();
    let file = File::open(path)?;
    info!("loading spam filter from {}", path.display());

    parse_model(BufReader::new(file))
}

/// Parse the persisted model format from any line source.
pub fn parse_model<R: BufRead>(reader: R) -> Result<Vocabulary> {
    let mut lines = reader.lines();

    let header = match lines.next() {
        Some(line) => line?,
        None => return Err(FilterError::Model("model file is empty".to_string())),
    };
    let totals = parse_header(&header)?;

    let mut words = HashMap::new();
    let mut line_count: usize = 0;

    for line in lines {
        let line = line?;
        match parse_word_line(&line) {
            Some(stat) => {
                words.insert(stat.word().to_string(), stat);
            }
            None => warn!("line {:?} cannot be parsed into word|ham|spam|spamicity", line),
        }

        line_count += 1;
        if line_count % 5000 == 0 {
            debug!("loaded {} model lines", line_count);
        }
    }

    info!("loaded {} words", words.len());
    Ok(Vocabulary::from_parts(words, totals))
}

/// Header line: the four aggregate totals, pipe-delimited.
fn parse_header(line: &str) -> Result<TrainingTotals> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 4 {
        return Err(FilterError::Model(format!(
            "header {:?} must have four pipe-delimited totals",
            line
        )));
    }

    let parse = |field: &str| -> Result<u64> {
        field
            .parse::<u64>()
            .map_err(|_| FilterError::Model(format!("non-numeric header field {:?}", field)))
    };

    let ham_messages = parse(fields[0])? as u32;
    let spam_messages = parse(fields[1])? as u32;
    let ham_words = parse(fields[2])?;
    let spam_words = parse(fields[3])?;

    Ok(TrainingTotals {
        ham_messages,
        spam_messages,
        ham_words,
        spam_words,
        records: ham_messages + spam_messages,
    })
}

/// One persisted word: `word|hamCount|spamCount|spamicity`.
fn parse_word_line(line: &str) -> Option<WordStat> {
    let fields: Vec<&str> = line.split('|').collect();
    if fields.len() != 4 {
        return None;
    }

    let ham_count = fields[1].parse::<u32>().ok()?;
    let spam_count = fields[2].parse::<u32>().ok()?;
    let spamicity = fields[3].parse::<f64>().ok()?;

    Some(WordStat::from_parts(fields[0], ham_count, spam_count, spamicity))
}

/// Format a spamicity with at most 8 and at least 2 fractional digits.
fn format_spamicity(value: f64) -> String {
    let text = format!("{:.8}", value);
    match text.split_once('.') {
        Some((whole, frac)) => {
            let trimmed = frac.trim_end_matches('0');
            if trimmed.len() < 2 {
                format!("{}.{}", whole, &frac[..2])
            } else {
                format!("{}.{}", whole, trimmed)
            }
        }
        None => text,
    }
}
