use num::Float;

use crate::{utils::math::vector::SparseVec, vectorizer::{token::TermFrequency, vocabulary::Vocabulary}};

/// TF-IDF calculation engine.
///
/// Implementors decide the term frequency and inverse document frequency
/// formulas; building and normalizing the vectors is shared.
pub trait TFIDFEngine {
    /// weight of a term occurring `count` times in one document
    fn tf(count: u32) -> f64;

    /// weight of a term appearing in `doc_freq` of `doc_num` documents
    fn idf(doc_num: u64, doc_freq: u64) -> f64;

    /// IDF value for every vocabulary column, in column order
    fn idf_vec(vocab: &Vocabulary) -> Vec<f64> {
        let doc_num = vocab.doc_num();
        vocab
            .iter()
            .map(|(_, stats)| Self::idf(doc_num, stats.doc_freq))
            .collect()
    }

    /// L2-normalized TF-IDF vector of one document.
    ///
    /// Terms outside `vocab` are dropped. A document with no in-vocabulary
    /// term yields the zero vector.
    fn tfidf_vec<N>(freq: &TermFrequency, vocab: &Vocabulary, idf: &[f64]) -> SparseVec<N>
    where
        N: Float,
    {
        let pairs = freq.iter().filter_map(|(term, count)| {
            let idx = vocab.index_of(term)?;
            let weight = Self::tf(count) * idf.get(idx).copied().unwrap_or(0.0);
            num::cast::<f64, N>(weight).map(|w| (idx, w))
        });
        let mut vec = SparseVec::from_pairs(vocab.len(), pairs);
        vec.l2_normalize();
        vec.shrink_to_fit();
        vec
    }
}

/// Default TF-IDF engine
/// - tf: raw count
/// - idf: smoothed, `ln((1 + N) / (1 + df)) + 1`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTFIDFEngine;

impl TFIDFEngine for DefaultTFIDFEngine {
    #[inline]
    fn tf(count: u32) -> f64 {
        count as f64
    }

    #[inline]
    fn idf(doc_num: u64, doc_freq: u64) -> f64 {
        ((1.0 + doc_num as f64) / (1.0 + doc_freq as f64)).ln() + 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::math::vector::math::l2_norm;

    fn vocab_of(texts: &[&str]) -> (Vec<TermFrequency>, Vocabulary) {
        let docs: Vec<TermFrequency> = texts.iter().map(|t| TermFrequency::from_normalized(t)).collect();
        let vocab = Vocabulary::build(&docs, 100);
        (docs, vocab)
    }

    #[test]
    fn smoothed_idf_values() {
        // term in every document: ln(1) + 1
        assert!((DefaultTFIDFEngine::idf(4, 4) - 1.0).abs() < 1e-12);
        // rarer terms weigh more
        assert!(DefaultTFIDFEngine::idf(4, 1) > DefaultTFIDFEngine::idf(4, 2));
        // never divides by zero
        assert!(DefaultTFIDFEngine::idf(0, 0).is_finite());
    }

    #[test]
    fn document_vectors_are_unit_length() {
        let (docs, vocab) = vocab_of(&["protein muscle protein", "keto fat"]);
        let idf = DefaultTFIDFEngine::idf_vec(&vocab);
        for doc in &docs {
            let v: SparseVec<f32> = DefaultTFIDFEngine::tfidf_vec(doc, &vocab, &idf);
            assert!((l2_norm(&v) - 1.0).abs() < 1e-6);
            assert_eq!(v.len(), vocab.len());
        }
    }

    #[test]
    fn out_of_vocabulary_terms_are_dropped() {
        let (_, vocab) = vocab_of(&["protein muscle"]);
        let idf = DefaultTFIDFEngine::idf_vec(&vocab);
        let query = TermFrequency::from_normalized("sugar candy");
        let v: SparseVec<f64> = DefaultTFIDFEngine::tfidf_vec(&query, &vocab, &idf);
        assert!(v.is_zero());
    }

    #[test]
    fn rare_terms_outweigh_common_ones() {
        let (docs, vocab) = vocab_of(&["protein iron", "protein", "protein"]);
        let idf = DefaultTFIDFEngine::idf_vec(&vocab);
        let v: SparseVec<f64> = DefaultTFIDFEngine::tfidf_vec(&docs[0], &vocab, &idf);
        let protein = v.get(vocab.index_of("protein").unwrap());
        let iron = v.get(vocab.index_of("iron").unwrap());
        assert!(iron > protein);
    }
}
