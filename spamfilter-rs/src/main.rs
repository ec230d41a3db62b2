//! Command-line interface for the spam filter
//!
//! # Usage
//!
//! ```bash
//! # Build a model from a labeled corpus
//! spamfilter train corpus.txt spam-filter.dat
//!
//! # Classify one message from stdin against the configured model
//! spamfilter classify < message.eml
//!
//! # Evaluate a model and append a sweep data point
//! spamfilter evaluate spam-filter.dat eval-corpus.txt evaluation.dat 0.4
//! ```

use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use spamfilter_rs::classify::SpamFilter;
use spamfilter_rs::config::Config;
use spamfilter_rs::evaluate::{append_roc_point, write_summary, Evaluator};
use spamfilter_rs::filter::{save_model, FilterBuilder, FilterPolicy};
use spamfilter_rs::mime::{BodyExtractor, MimeBodyExtractor};

#[derive(Parser)]
#[command(name = "spamfilter")]
#[command(about = "Naive Bayes spam/ham message classifier", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a spam filter model from a labeled training corpus
    Train {
        /// Labeled training corpus
        corpus: String,
        /// Output model file (defaults to the configured model path)
        output: Option<String>,
        /// Minimum word frequency kept in the model; 0 disables the
        /// frequency window entirely
        #[arg(long)]
        min_frequency: Option<u32>,
    },
    /// Classify a single message read from standard input
    Classify,
    /// Evaluate a model against a labeled corpus and record a sweep point
    Evaluate {
        /// Model file produced by `train`
        model: String,
        /// Labeled evaluation corpus
        corpus: String,
        /// Results file the threshold/rate data point is appended to
        /// (defaults to the configured results path)
        results: Option<String>,
        /// Decision threshold, strictly between 0 and 1 (defaults to the
        /// configured threshold)
        threshold: Option<f64>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = if Path::new(&cli.config).exists() {
        match Config::from_file(&cli.config) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    let level = config
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    if tracing::subscriber::set_global_default(subscriber).is_err() {
        eprintln!("Warning: logging already initialized");
    }

    let result = match cli.command {
        Commands::Train {
            corpus,
            output,
            min_frequency,
        } => train(&config, &corpus, output.as_deref(), min_frequency),
        Commands::Classify => classify(&config),
        Commands::Evaluate {
            model,
            corpus,
            results,
            threshold,
        } => evaluate(&config, &model, &corpus, results.as_deref(), threshold),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn train(
    config: &Config,
    corpus: &str,
    output: Option<&str>,
    min_frequency: Option<u32>,
) -> anyhow::Result<()> {
    let output = output.unwrap_or(&config.model.path);
    let policy = FilterPolicy {
        min_frequency: min_frequency.unwrap_or(config.training.min_frequency),
    };

    let vocabulary = FilterBuilder::new().train_file(corpus)?;
    let written = save_model(&vocabulary, output, &policy)?;

    info!(
        "trained {} messages, kept {} of {} words",
        vocabulary.totals().total_messages(),
        written,
        vocabulary.len()
    );
    println!("Wrote {} words to {}", written, output);

    Ok(())
}

fn classify(config: &Config) -> anyhow::Result<()> {
    let model_path = Path::new(&config.model.path);
    if !model_path.exists() {
        bail!(
            "cannot find {}; run `spamfilter train` to build the spam filter first",
            model_path.display()
        );
    }

    let mut message = String::new();
    std::io::stdin()
        .read_to_string(&mut message)
        .context("reading message from stdin")?;

    let filter = SpamFilter::load(model_path)?;
    let body = MimeBodyExtractor::new().extract(&message);
    let result = filter.classify(&body.tokens);

    println!("Message classified as {}", result.label());
    println!("Confidence level {:.8}", result.spam_probability());

    Ok(())
}

fn evaluate(
    config: &Config,
    model: &str,
    corpus: &str,
    results: Option<&str>,
    threshold: Option<f64>,
) -> anyhow::Result<()> {
    let results = results.unwrap_or(&config.evaluation.results_path);
    let threshold = threshold.unwrap_or(config.evaluation.threshold);

    let filter = SpamFilter::load(model)?;
    let evaluator = Evaluator::new(filter);

    let mut stdout = std::io::stdout();
    let report = evaluator.evaluate_file(corpus, threshold, &mut stdout)?;

    write_summary(&report, &mut stdout)?;
    append_roc_point(results, &report)?;
    println!("Appended sweep data point to {}", results);

    Ok(())
}
