//! Recommender configuration, loaded from a TOML file.
//!
//! ```toml
//! articles_path = "data/processed/articles.csv"
//! model_path = "models/article_recommender.cbor"
//! top_n = 5
//! max_features = 5000
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::info;

use crate::error::{RecommenderError, Result};
use crate::vectorizer::vocabulary::DEFAULT_MAX_FEATURES;

pub const DEFAULT_TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecommenderConfig {
    /// Article CSV loaded when the recommender is created
    pub articles_path: Option<PathBuf>,
    /// Default location for save/load of the fitted model
    pub model_path: Option<PathBuf>,
    /// Result size when a request does not specify one
    pub top_n: usize,
    /// Vocabulary cap
    pub max_features: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        RecommenderConfig {
            articles_path: None,
            model_path: None,
            top_n: DEFAULT_TOP_N,
            max_features: DEFAULT_MAX_FEATURES,
        }
    }
}

impl RecommenderConfig {
    /// Load and validate configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| RecommenderError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config = Self::from_toml_str(&content)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: RecommenderConfig =
            toml::from_str(content).map_err(|e| RecommenderError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.top_n == 0 {
            return Err(RecommenderError::InvalidArgument("top_n must be at least 1".into()));
        }
        if self.max_features == 0 {
            return Err(RecommenderError::InvalidArgument("max_features must be at least 1".into()));
        }
        Ok(())
    }
}
