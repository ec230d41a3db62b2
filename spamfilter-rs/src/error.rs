use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Corpus error: {0}")]
    Corpus(String),

    #[error("Model error: {0}")]
    Model(String),

    #[error("Threshold value ({0}) must be 0.0 < threshold < 1.0")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, FilterError>;
