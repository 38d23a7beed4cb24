pub mod loader;
pub mod sample;

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One educational article of the corpus.
/// Articles are never mutated once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: i64,
    pub title: String,
    pub content: String,
    /// keywords, in the order they were listed
    pub tags: Vec<String>,
    pub category: String,
    pub author: String,
    pub date: Option<NaiveDate>,
}

impl Article {
    /// Article with only the text fields the vectorizer reads
    pub fn new(
        id: i64,
        title: impl Into<String>,
        content: impl Into<String>,
        tags: Vec<String>,
        category: impl Into<String>,
    ) -> Self {
        Article {
            id,
            title: title.into(),
            content: content.into(),
            tags,
            category: category.into(),
            author: String::new(),
            date: None,
        }
    }

    /// Split a comma separated tag list, dropping blanks
    pub fn parse_tags(raw: &str) -> Vec<String> {
        raw.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// `title content tags category` as one document
    pub fn document_text(&self) -> String {
        let mut text = String::with_capacity(
            self.title.len() + self.content.len() + self.category.len() + 16 * self.tags.len(),
        );
        text.push_str(&self.title);
        text.push(' ');
        text.push_str(&self.content);
        text.push(' ');
        text.push_str(&self.tags.join(" "));
        text.push(' ');
        text.push_str(&self.category);
        text
    }
}

/// Ordered article collection.
/// Every id maps to exactly one position; position `i` is matrix row `i`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<Article>", into = "Vec<Article>")]
pub struct Corpus {
    articles: Vec<Article>,
    positions: HashMap<i64, usize>,
}

impl Corpus {
    pub fn new() -> Self {
        Corpus::default()
    }

    /// Append an article, refusing a duplicate id
    pub fn push(&mut self, article: Article) -> bool {
        if self.positions.contains_key(&article.id) {
            return false;
        }
        self.positions.insert(article.id, self.articles.len());
        self.articles.push(article);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.articles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }

    /// Article at row `pos`
    #[inline]
    pub fn get(&self, pos: usize) -> Option<&Article> {
        self.articles.get(pos)
    }

    #[inline]
    pub fn position_of(&self, id: i64) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    pub fn get_by_id(&self, id: i64) -> Option<&Article> {
        self.position_of(id).and_then(|pos| self.articles.get(pos))
    }

    #[inline]
    pub fn articles(&self) -> &[Article] {
        &self.articles
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Article> {
        self.articles.iter()
    }
}

/// Duplicate ids keep the first occurrence.
impl From<Vec<Article>> for Corpus {
    fn from(articles: Vec<Article>) -> Self {
        let mut corpus = Corpus {
            articles: Vec::with_capacity(articles.len()),
            positions: HashMap::with_capacity(articles.len()),
        };
        for article in articles {
            let id = article.id;
            if !corpus.push(article) {
                warn!(article_id = id, "duplicate article id, keeping the first occurrence");
            }
        }
        corpus
    }
}

impl From<Corpus> for Vec<Article> {
    fn from(corpus: Corpus) -> Self {
        corpus.articles
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Article;
    type IntoIter = std::slice::Iter<'a, Article>;

    fn into_iter(self) -> Self::IntoIter {
        self.articles.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_text_joins_fields() {
        let a = Article::new(
            1,
            "Protein Basics",
            "Protein builds muscle",
            Article::parse_tags("protein, muscle"),
            "Nutrition Basics",
        );
        assert_eq!(a.document_text(), "Protein Basics Protein builds muscle protein muscle Nutrition Basics");
    }

    #[test]
    fn parse_tags_trims_and_skips_blanks() {
        assert_eq!(Article::parse_tags(" keto , ,fats,"), vec!["keto", "fats"]);
        assert!(Article::parse_tags("").is_empty());
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let corpus = Corpus::from(vec![
            Article::new(7, "first", "", vec![], ""),
            Article::new(8, "other", "", vec![], ""),
            Article::new(7, "second", "", vec![], ""),
        ]);
        assert_eq!(corpus.len(), 2);
        assert_eq!(corpus.get_by_id(7).map(|a| a.title.as_str()), Some("first"));
        assert_eq!(corpus.position_of(8), Some(1));
    }

    #[test]
    fn push_rejects_duplicate() {
        let mut corpus = Corpus::new();
        assert!(corpus.push(Article::new(1, "a", "", vec![], "")));
        assert!(!corpus.push(Article::new(1, "b", "", vec![], "")));
        assert_eq!(corpus.len(), 1);
    }
}
