/// This crate is a content-based nutrition article recommender built on a TF-IDF vector space.
pub mod article;
pub mod config;
pub mod error;
pub mod recommend;
pub mod utils;
pub mod vectorizer;

/// Article Recommender
/// The top-level service of this crate.
/// It fits a TF-IDF vector space over an article corpus on first use and
/// answers free-text queries or queries synthesized from user signals.
///
/// Internally, it holds:
/// - The article corpus
/// - The fitted vector space (vocabulary + article matrix), built lazily
///
/// The fitted space is immutable once built. Queries take a snapshot of it,
/// so `Recommender` can be shared between threads behind an `Arc`.
///
/// # Persistence
/// `save` / `load` write and read vocabulary, article matrix and corpus
/// together as one versioned artifact.
pub use recommend::{Recommendation, Recommender};

/// User signals consumed by the query synthesizer.
/// Every field is optional; an empty bundle produces an empty query.
pub use recommend::signals::{Gender, HealthStatus, UserProfile, UserSignalBundle};

/// Query Synthesizer
/// Maps age bracket, gender, food items, BMI bracket and health conditions
/// to one query string, in that fixed order.
pub use recommend::query::synthesize;

/// Article and Corpus
/// `Corpus` is an ordered article collection where every id maps to exactly
/// one position. Position `i` corresponds to row `i` of the article matrix.
pub use article::{Article, Corpus};

/// TF-IDF Vectorizer
/// The fitted vector space: Vocabulary Model, article matrix and IDF cache.
///
/// `TFIDFVectorizer<N, E>` has the following generic parameters:
/// - `N`: stored weight type (f32, f64)
/// - `E`: TF-IDF calculation engine type (e.g., DefaultTFIDFEngine)
pub use vectorizer::{ArticleMatrix, TFIDFVectorizer};

/// Vocabulary Model
/// Term -> (column index, document frequency), capped at `max_features`.
pub use vectorizer::vocabulary::Vocabulary;

/// Term Frequency structure
/// Counts term occurrences in one normalized document.
pub use vectorizer::token::TermFrequency;

/// TF IDF Calculation Engine Trait
/// Plug a different weighting into `TFIDFVectorizer<N, E>`.
/// `DefaultTFIDFEngine` uses raw counts and smoothed IDF.
pub use vectorizer::tfidf::{DefaultTFIDFEngine, TFIDFEngine};

/// Search Hits and Hit Entry structures
/// - `Hits`: ranked list of matrix rows
/// - `HitEntry`: one row and its cosine similarity
pub use vectorizer::evaluate::scoring::{HitEntry, Hits};

/// Text Normalizer
pub use vectorizer::analyzer::normalize;

pub use config::RecommenderConfig;
pub use error::{RecommenderError, Result};
