use std::fmt::{self, Debug, Display};

use num::Float;
use rayon::prelude::*;

use crate::{
    utils::{math::vector::{math::cosine_similarity, SparseVec}, sort::top_n_by_score},
    vectorizer::{tfidf::TFIDFEngine, ArticleMatrix, TFIDFVectorizer},
};

/// A single search result: matrix row and its similarity
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitEntry {
    pub row: usize,
    /// cosine similarity in `[0, 1]`
    pub score: f64,
}

/// Structure to store search results, best first
pub struct Hits {
    pub list: Vec<HitEntry>,
}

impl Hits {
    pub fn new(list: Vec<HitEntry>) -> Self {
        Hits { list }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HitEntry> {
        self.list.iter()
    }
}

impl Debug for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            // Pretty print with alternate formatting: each hit on a new line
            writeln!(f, "Hits [")?;
            for hit in &self.list {
                writeln!(f, "    row {}: {:.6}", hit.row, hit.score)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl Display for Hits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (rank, hit) in self.list.iter().enumerate() {
            writeln!(f, "{:>3}. row {:<6} {:.6}", rank + 1, hit.row, hit.score)?;
        }
        Ok(())
    }
}

impl IntoIterator for Hits {
    type Item = HitEntry;
    type IntoIter = std::vec::IntoIter<HitEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.list.into_iter()
    }
}

/// Rank every row of `matrix` by cosine similarity to `query`.
///
/// Sorted by score descending, ties by ascending row. At most `top_n`
/// entries; every row when `top_n` exceeds the row count. A zero query
/// scores 0.0 everywhere, so the result is simply the first rows in order.
pub fn search<N>(query: &SparseVec<N>, matrix: &ArticleMatrix<N>, top_n: usize) -> Hits
where
    N: Float + Send + Sync,
{
    if top_n == 0 || matrix.n_rows() == 0 {
        return Hits::new(Vec::new());
    }
    let scored: Vec<(usize, f64)> = matrix
        .rows()
        .par_iter()
        .enumerate()
        .map(|(row, vec)| (row, cosine_similarity(query, vec).clamp(0.0, 1.0)))
        .collect();

    let list = top_n_by_score(scored, top_n)
        .into_iter()
        .map(|(row, score)| HitEntry { row, score })
        .collect();
    Hits::new(list)
}

impl<N, E> TFIDFVectorizer<N, E>
where
    N: Float + Send + Sync,
    E: TFIDFEngine,
{
    /// Search the article matrix with a prepared query vector
    pub fn search(&self, query: &SparseVec<N>, top_n: usize) -> Hits {
        search(query, self.matrix(), top_n)
    }

    /// Transform `text` and search with it
    pub fn search_text(&self, text: &str, top_n: usize) -> Hits {
        let query = self.transform(text);
        self.search(&query, top_n)
    }
}
