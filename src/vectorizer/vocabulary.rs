use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::token::TermFrequency;

/// Default cap on the number of vocabulary terms
pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// per-term statistics collected at fit time
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermStats {
    /// number of documents containing the term
    pub doc_freq: u64,
    /// occurrences across the whole corpus
    pub corpus_freq: u64,
}

/// Vocabulary Model
/// Maps a normalized term to its column index and document frequency.
///
/// The column index of a term is its position in `terms`, so indices always
/// form the dense range `[0, len)`. A vocabulary is never mutated after
/// `build`; refitting produces a new one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Vocabulary {
    #[serde(with = "indexmap::map::serde_seq")]
    terms: IndexMap<Box<str>, TermStats>,
    /// number of documents the vocabulary was fitted on
    doc_num: u64,
    max_features: usize,
}

impl Vocabulary {
    /// Build from the term counts of every document.
    ///
    /// When more than `max_features` distinct terms occur, the ones with the
    /// highest corpus frequency are kept; ties go to the term seen first.
    /// Kept terms retain their first-seen relative order.
    pub fn build(docs: &[TermFrequency], max_features: usize) -> Self {
        let mut terms: IndexMap<Box<str>, TermStats> = IndexMap::new();
        for doc in docs {
            for (term, count) in doc.iter() {
                match terms.get_mut(term) {
                    Some(stats) => {
                        stats.doc_freq += 1;
                        stats.corpus_freq += count as u64;
                    }
                    None => {
                        terms.insert(
                            term.into(),
                            TermStats {
                                doc_freq: 1,
                                corpus_freq: count as u64,
                            },
                        );
                    }
                }
            }
        }

        if terms.len() > max_features {
            terms = Self::truncate(terms, max_features);
        }

        Vocabulary {
            terms,
            doc_num: docs.len() as u64,
            max_features,
        }
    }

    fn truncate(
        terms: IndexMap<Box<str>, TermStats>,
        max_features: usize,
    ) -> IndexMap<Box<str>, TermStats> {
        let mut ranked: Vec<(usize, u64)> = terms
            .values()
            .enumerate()
            .map(|(pos, stats)| (pos, stats.corpus_freq))
            .collect();
        // corpus frequency desc, first-seen position asc
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let mut keep = vec![false; terms.len()];
        for (pos, _) in ranked.into_iter().take(max_features) {
            keep[pos] = true;
        }
        terms
            .into_iter()
            .enumerate()
            .filter_map(|(pos, entry)| keep[pos].then_some(entry))
            .collect()
    }

    /// Column index of `term`
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.get_index_of(term)
    }

    #[inline]
    pub fn contains_term(&self, term: &str) -> bool {
        self.terms.contains_key(term)
    }

    /// Term stored at column `index`
    #[inline]
    pub fn term_at(&self, index: usize) -> Option<&str> {
        self.terms.get_index(index).map(|(term, _)| term.as_ref())
    }

    #[inline]
    pub fn stats(&self, term: &str) -> Option<TermStats> {
        self.terms.get(term).copied()
    }

    /// Document frequency of `term`, 0 when out of vocabulary
    #[inline]
    pub fn doc_freq(&self, term: &str) -> u64 {
        self.terms.get(term).map_or(0, |stats| stats.doc_freq)
    }

    /// vocabulary size (= vector dimensionality)
    #[inline]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    #[inline]
    pub fn doc_num(&self) -> u64 {
        self.doc_num
    }

    #[inline]
    pub fn max_features(&self) -> usize {
        self.max_features
    }

    /// `(term, stats)` in column order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TermStats)> {
        self.terms.iter().map(|(term, stats)| (term.as_ref(), stats))
    }
}
