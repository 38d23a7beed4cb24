pub mod query;
pub mod signals;

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    article::{loader, Corpus},
    config::RecommenderConfig,
    error::{RecommenderError, Result},
    recommend::signals::UserSignalBundle,
    vectorizer::{serde as model_io, TFIDFVectorizer},
};

/// One recommended article
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub article_id: i64,
    pub title: String,
    pub category: String,
    pub tags: Vec<String>,
    /// cosine similarity in `[0, 1]`
    pub similarity_score: f64,
}

/// Fitted vector space together with the corpus it was built from.
/// Swapped as a whole, never modified in place.
#[derive(Debug)]
struct FittedSpace {
    vectorizer: TFIDFVectorizer,
    corpus: Arc<Corpus>,
}

#[derive(Debug, Default)]
struct State {
    corpus: Arc<Corpus>,
    fitted: Option<Arc<FittedSpace>>,
}

/// Article recommendation service.
///
/// The vector space is fitted lazily on the first query and then shared
/// read-only. Queries take a snapshot of the fitted space and run without
/// holding any lock, so they may run in parallel with each other and with
/// a refit; a refit swaps in a complete new space.
#[derive(Debug)]
pub struct Recommender {
    config: RecommenderConfig,
    state: RwLock<State>,
}

impl Recommender {
    /// Create a recommender, loading `config.articles_path` when set
    pub fn new(config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        let corpus = match &config.articles_path {
            Some(path) => loader::load_articles(path),
            None => Corpus::new(),
        };
        Ok(Self::with_state(config, corpus))
    }

    pub fn from_corpus(corpus: Corpus, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_state(config, corpus))
    }

    fn with_state(config: RecommenderConfig, corpus: Corpus) -> Self {
        Recommender {
            config,
            state: RwLock::new(State {
                corpus: Arc::new(corpus),
                fitted: None,
            }),
        }
    }

    #[inline]
    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Replace the corpus from a CSV file.
    /// Never fails; the previous vector space is discarded.
    pub fn load_articles<P: AsRef<Path>>(&self, path: P) -> usize {
        let corpus = loader::load_articles(path);
        self.replace_corpus(corpus)
    }

    /// Replace the corpus; the previous vector space is discarded
    pub fn replace_corpus(&self, corpus: Corpus) -> usize {
        let len = corpus.len();
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.corpus = Arc::new(corpus);
        state.fitted = None;
        len
    }

    /// Snapshot of the current corpus
    pub fn corpus(&self) -> Arc<Corpus> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&state.corpus)
    }

    pub fn is_fitted(&self) -> bool {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.fitted.is_some()
    }

    /// Vocabulary size of the fitted space, `None` before fitting
    pub fn vocabulary_size(&self) -> Option<usize> {
        let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
        state.fitted.as_ref().map(|f| f.vectorizer.vocab_size())
    }

    /// Fit if no vector space exists yet
    pub fn build_article_vectors(&self) {
        self.fitted_space();
    }

    /// Fit a new vector space from the current corpus and swap it in.
    /// Queries already running keep the space they started with.
    pub fn refit(&self) {
        let space = Arc::new(self.fit(self.corpus()));
        if !self.swap_in(space) {
            debug!("corpus replaced during refit, discarding stale space");
        }
    }

    /// Install `space` unless the corpus it was fitted on has been replaced
    fn swap_in(&self, space: Arc<FittedSpace>) -> bool {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if !Arc::ptr_eq(&state.corpus, &space.corpus) {
            return false;
        }
        state.fitted = Some(space);
        true
    }

    fn fit(&self, corpus: Arc<Corpus>) -> FittedSpace {
        let vectorizer = TFIDFVectorizer::fit(&corpus, self.config.max_features);
        FittedSpace { vectorizer, corpus }
    }

    /// Current fitted space, fitting first when needed
    fn fitted_space(&self) -> Arc<FittedSpace> {
        {
            let state = self.state.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(space) = &state.fitted {
                return Arc::clone(space);
            }
        }
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        // another caller may have fitted while we waited for the lock
        if let Some(space) = &state.fitted {
            return Arc::clone(space);
        }
        let space = Arc::new(self.fit(Arc::clone(&state.corpus)));
        state.fitted = Some(Arc::clone(&space));
        space
    }

    fn resolve_top_n(&self, top_n: Option<usize>) -> Result<usize> {
        match top_n.unwrap_or(self.config.top_n) {
            0 => Err(RecommenderError::InvalidArgument("top_n must be at least 1".into())),
            n => Ok(n),
        }
    }

    /// Recommend articles similar to free text.
    ///
    /// `top_n` defaults to the configured value. An empty corpus gives an
    /// empty result; a query with no known terms still returns the first
    /// `top_n` articles, all scored 0.
    pub fn recommend_by_query(&self, text: &str, top_n: Option<usize>) -> Result<Vec<Recommendation>> {
        let top_n = self.resolve_top_n(top_n)?;
        let space = self.fitted_space();
        let hits = space.vectorizer.search_text(text, top_n);
        let recommendations: Vec<Recommendation> = hits
            .into_iter()
            .filter_map(|hit| {
                space.corpus.get(hit.row).map(|article| Recommendation {
                    article_id: article.id,
                    title: article.title.clone(),
                    category: article.category.clone(),
                    tags: article.tags.clone(),
                    similarity_score: hit.score,
                })
            })
            .collect();
        debug!(query = text, top_n, results = recommendations.len(), "recommend by query");
        Ok(recommendations)
    }

    /// Recommend articles for a user from their profile, foods and health
    pub fn recommend_for_user(&self, signals: &UserSignalBundle, top_n: Option<usize>) -> Result<Vec<Recommendation>> {
        let text = query::synthesize(signals);
        debug!(query = %text, "synthesized user query");
        self.recommend_by_query(&text, top_n)
    }

    fn resolve_model_path(&self, path: Option<&Path>) -> Option<PathBuf> {
        path.map(Path::to_path_buf).or_else(|| self.config.model_path.clone())
    }

    /// Save vocabulary, article matrix and corpus as one artifact.
    /// Fits first when needed so the artifact is always complete.
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = self
            .resolve_model_path(path)
            .ok_or_else(|| RecommenderError::InvalidArgument("model path not specified".into()))?;
        let space = self.fitted_space();
        model_io::save_model(&path, &space.vectorizer, &space.corpus)?;
        Ok(path)
    }

    /// Restore vocabulary, article matrix and corpus from one artifact.
    /// Nothing changes unless all three load and agree.
    pub fn load(&self, path: Option<&Path>) -> Result<()> {
        let path = self
            .resolve_model_path(path)
            .ok_or_else(|| RecommenderError::ModelNotAvailable("model path not specified".into()))?;
        let (vectorizer, corpus) = model_io::load_model(&path)?;
        let corpus = Arc::new(corpus);
        let space = Arc::new(FittedSpace {
            vectorizer,
            corpus: Arc::clone(&corpus),
        });
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        state.corpus = corpus;
        state.fitted = Some(space);
        info!(path = %path.display(), "recommender ready");
        Ok(())
    }

    /// Build a recommender straight from a saved artifact
    pub fn from_model<P: AsRef<Path>>(path: P, config: RecommenderConfig) -> Result<Self> {
        let recommender = Self::from_corpus(Corpus::new(), config)?;
        recommender.load(Some(path.as_ref()))?;
        Ok(recommender)
    }
}
