pub mod analyzer;
pub mod evaluate;
pub mod serde;
pub mod tfidf;
pub mod token;
pub mod vocabulary;

use std::marker::PhantomData;

use ::serde::{Deserialize, Serialize};
use num::Float;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::{
    article::Corpus,
    utils::math::vector::SparseVec,
    vectorizer::{
        tfidf::{DefaultTFIDFEngine, TFIDFEngine},
        token::TermFrequency,
        vocabulary::Vocabulary,
    },
};

/// One TF-IDF row per article.
/// Row `i` belongs to corpus position `i`; every row has
/// dimensionality `n_features`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ArticleMatrix<N = f32>
where
    N: Float,
{
    n_features: usize,
    rows: Vec<SparseVec<N>>,
}

impl<N> ArticleMatrix<N>
where
    N: Float,
{
    pub fn new(n_features: usize, rows: Vec<SparseVec<N>>) -> Self {
        ArticleMatrix { n_features, rows }
    }

    #[inline]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn row(&self, i: usize) -> Option<&SparseVec<N>> {
        self.rows.get(i)
    }

    #[inline]
    pub fn rows(&self) -> &[SparseVec<N>] {
        &self.rows
    }

    /// total stored elements over all rows
    pub fn nnz(&self) -> usize {
        self.rows.iter().map(SparseVec::nnz).sum()
    }
}

/// Fitted TF-IDF vector space over an article corpus.
///
/// Holds:
/// - the Vocabulary Model
/// - the article matrix built with it
/// - an IDF cache for transforming queries
///
/// `TFIDFVectorizer<N, E>` has the following generic parameters:
/// - `N`: stored weight type (f32 or f64)
/// - `E`: TF-IDF calculation engine type
///
/// The vocabulary and matrix are only ever built together and never
/// mutated afterwards; refitting creates a new vectorizer.
#[derive(Debug, Clone)]
pub struct TFIDFVectorizer<N = f32, E = DefaultTFIDFEngine>
where
    N: Float,
    E: TFIDFEngine,
{
    vocabulary: Vocabulary,
    matrix: ArticleMatrix<N>,
    /// IDF per vocabulary column
    idf_cache: Vec<f64>,
    _marker: PhantomData<E>,
}

impl<N, E> TFIDFVectorizer<N, E>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    /// Build vocabulary and article matrix from a corpus.
    ///
    /// Each article contributes `title content tags category`, normalized.
    /// An empty corpus gives an empty vocabulary and an empty matrix.
    pub fn fit(corpus: &Corpus, max_features: usize) -> Self {
        let docs: Vec<TermFrequency> = corpus
            .articles()
            .par_iter()
            .map(|article| TermFrequency::from_normalized(&analyzer::normalize(&article.document_text())))
            .collect();

        let vocabulary = Vocabulary::build(&docs, max_features);
        let idf_cache = E::idf_vec(&vocabulary);
        let rows: Vec<SparseVec<N>> = docs
            .par_iter()
            .map(|doc| E::tfidf_vec(doc, &vocabulary, &idf_cache))
            .collect();
        let matrix = ArticleMatrix::new(vocabulary.len(), rows);

        info!(
            articles = matrix.n_rows(),
            features = vocabulary.len(),
            nnz = matrix.nnz(),
            "built TF-IDF vectors"
        );

        TFIDFVectorizer {
            vocabulary,
            matrix,
            idf_cache,
            _marker: PhantomData,
        }
    }

    /// Reassemble from persisted parts; the IDF cache is recomputed
    pub fn from_parts(vocabulary: Vocabulary, matrix: ArticleMatrix<N>) -> Self {
        let idf_cache = E::idf_vec(&vocabulary);
        TFIDFVectorizer {
            vocabulary,
            matrix,
            idf_cache,
            _marker: PhantomData,
        }
    }

    /// Vectorize raw text against the fitted vocabulary.
    /// Unseen terms are dropped, never added.
    pub fn transform(&self, text: &str) -> SparseVec<N> {
        let normalized = analyzer::normalize(text);
        debug!(query = %normalized, "normalized query");
        self.transform_normalized(&normalized)
    }

    /// Vectorize text that already went through `analyzer::normalize`
    pub fn transform_normalized(&self, normalized: &str) -> SparseVec<N> {
        let freq = TermFrequency::from_normalized(normalized);
        E::tfidf_vec(&freq, &self.vocabulary, &self.idf_cache)
    }

    #[inline]
    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    #[inline]
    pub fn matrix(&self) -> &ArticleMatrix<N> {
        &self.matrix
    }

    #[inline]
    pub fn idf(&self) -> &[f64] {
        &self.idf_cache
    }

    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.vocabulary.len()
    }

    #[inline]
    pub fn doc_num(&self) -> usize {
        self.matrix.n_rows()
    }

    /// Split into the parts that get persisted
    pub fn into_parts(self) -> (Vocabulary, ArticleMatrix<N>) {
        (self.vocabulary, self.matrix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::utils::math::vector::math::l2_norm;

    fn corpus() -> Corpus {
        Corpus::from(vec![
            Article::new(1, "Protein Basics", "Protein builds muscle", Article::parse_tags("protein, muscle"), "Nutrition Basics"),
            Article::new(2, "Keto Diet", "Low carb high fat diet", Article::parse_tags("keto"), "Diets"),
        ])
    }

    #[test]
    fn fit_builds_one_row_per_article() {
        let v: TFIDFVectorizer = TFIDFVectorizer::fit(&corpus(), 5000);
        assert_eq!(v.doc_num(), 2);
        assert_eq!(v.matrix().n_features(), v.vocab_size());
        for row in v.matrix().rows() {
            assert_eq!(row.len(), v.vocab_size());
            assert!((l2_norm(row) - 1.0).abs() < 1e-6);
        }
        assert!(v.vocabulary().contains_term("protein"));
        assert!(!v.vocabulary().contains_term("the"));
    }

    #[test]
    fn empty_corpus_fits_to_empty_space() {
        let v: TFIDFVectorizer = TFIDFVectorizer::fit(&Corpus::new(), 5000);
        assert_eq!(v.vocab_size(), 0);
        assert_eq!(v.doc_num(), 0);
        assert!(v.transform("protein").is_zero());
    }

    #[test]
    fn empty_document_gets_zero_row() {
        let corpus = Corpus::from(vec![
            Article::new(1, "", "", vec![], ""),
            Article::new(2, "the and of", "", vec![], ""),
            Article::new(3, "Iron", "", vec![], ""),
        ]);
        let v: TFIDFVectorizer = TFIDFVectorizer::fit(&corpus, 5000);
        assert!(v.matrix().row(0).unwrap().is_zero());
        assert!(v.matrix().row(1).unwrap().is_zero());
        assert!(!v.matrix().row(2).unwrap().is_zero());
    }

    #[test]
    fn max_features_caps_dimensionality() {
        let v: TFIDFVectorizer<f64> = TFIDFVectorizer::fit(&corpus(), 3);
        assert_eq!(v.vocab_size(), 3);
        // protein occurs most often and must survive
        assert!(v.vocabulary().contains_term("protein"));
    }

    #[test]
    fn transform_ignores_unseen_terms() {
        let v: TFIDFVectorizer = TFIDFVectorizer::fit(&corpus(), 5000);
        let q = v.transform("quinoa protein");
        assert_eq!(q.nnz(), 1);
        assert!(v.transform("quinoa").is_zero());
        assert!(!v.vocabulary().contains_term("quinoa"));
    }

    #[test]
    fn from_parts_restores_transform() {
        let v: TFIDFVectorizer = TFIDFVectorizer::fit(&corpus(), 5000);
        let q = v.transform("keto fat");
        let (vocab, matrix) = v.into_parts();
        let back: TFIDFVectorizer = TFIDFVectorizer::from_parts(vocab, matrix);
        assert_eq!(back.transform("keto fat"), q);
    }
}
