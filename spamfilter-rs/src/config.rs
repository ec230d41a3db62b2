use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub model: ModelConfig,
    pub training: TrainingConfig,
    pub evaluation: EvaluationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ModelConfig {
    pub path: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainingConfig {
    pub min_frequency: u32,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EvaluationConfig {
    pub results_path: String,
    pub threshold: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| crate::error::FilterError::Config(e.to_string()))?;

        toml::from_str(&content).map_err(|e| crate::error::FilterError::Config(e.to_string()))
    }

    pub fn default() -> Self {
        Self {
            model: ModelConfig {
                path: "spam-filter.dat".to_string(),
            },
            training: TrainingConfig { min_frequency: 3 },
            evaluation: EvaluationConfig {
                results_path: "evaluation.dat".to_string(),
                threshold: 0.4,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.model.path, "spam-filter.dat");
        assert_eq!(config.training.min_frequency, 3);
        assert_eq!(config.evaluation.threshold, 0.4);
    }

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
            [model]
            path = "filter.dat"

            [training]
            min_frequency = 5

            [evaluation]
            results_path = "roc.dat"
            threshold = 0.5

            [logging]
            level = "debug"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.path, "filter.dat");
        assert_eq!(config.training.min_frequency, 5);
        assert_eq!(config.evaluation.results_path, "roc.dat");
        assert_eq!(config.logging.level, "debug");
    }
}
