use thiserror::Error;

pub type Result<T> = std::result::Result<T, RecommenderError>;

#[derive(Debug, Error)]
pub enum RecommenderError {
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("CSV error: {0}")]
    Csv(String),
    #[error("Config error: {0}")]
    Config(String),
}

impl RecommenderError {
    pub fn code(&self) -> &str {
        match self {
            Self::ModelNotAvailable(_) => "MODEL_NOT_AVAILABLE",
            Self::InvalidArgument(_) => "INVALID_ARGUMENT",
            Self::Io(_) => "IO",
            Self::Serialization(_) => "SERIALIZATION",
            Self::Csv(_) => "CSV",
            Self::Config(_) => "CONFIG",
        }
    }
}

impl From<csv::Error> for RecommenderError {
    fn from(e: csv::Error) -> Self {
        Self::Csv(e.to_string())
    }
}
