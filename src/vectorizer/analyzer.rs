use std::collections::HashSet;
use std::sync::OnceLock;

/// English stopword list (the common NLTK set).
/// Contractions are listed in their split form because the tokenizer
/// breaks words on apostrophes ("don't" -> "don", "t").
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
    "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
    "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
    "who", "whom", "this", "that", "these", "those", "am", "is", "are", "was", "were", "be",
    "been", "being", "have", "has", "had", "having", "do", "does", "did", "doing", "a", "an",
    "the", "and", "but", "if", "or", "because", "as", "until", "while", "of", "at", "by",
    "for", "with", "about", "against", "between", "into", "through", "during", "before",
    "after", "above", "below", "to", "from", "up", "down", "in", "out", "on", "off", "over",
    "under", "again", "further", "then", "once", "here", "there", "when", "where", "why",
    "how", "all", "any", "both", "each", "few", "more", "most", "other", "some", "such", "no",
    "nor", "not", "only", "own", "same", "so", "than", "too", "very", "s", "t", "can", "will",
    "just", "don", "should", "now", "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren",
    "couldn", "didn", "doesn", "hadn", "hasn", "haven", "isn", "ma", "mightn", "mustn",
    "needn", "shan", "shouldn", "wasn", "weren", "won", "wouldn",
];

/// Minimum character length of a term that enters the vector space
pub const MIN_TERM_CHARS: usize = 2;

fn stopwords() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| ENGLISH_STOPWORDS.iter().copied().collect())
}

#[inline]
pub fn is_stopword(token: &str) -> bool {
    stopwords().contains(token)
}

/// Split text on word boundaries.
/// A word is a maximal run of alphanumeric characters or `_`;
/// everything else separates words.
#[inline]
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|tok| !tok.is_empty())
}

/// Normalize free text:
/// lowercase, tokenize, drop stopwords and rejoin with single spaces.
///
/// Empty, whitespace-only and all-stopword input all yield `""`.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    for tok in tokenize(&lowered).filter(|tok| !is_stopword(tok)) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(tok);
    }
    out
}

/// Terms of an already normalized document, in order.
/// Single-character tokens carry no retrieval signal and are skipped.
#[inline]
pub fn terms(normalized: &str) -> impl Iterator<Item = &str> {
    normalized
        .split_whitespace()
        .filter(|tok| tok.chars().count() >= MIN_TERM_CHARS)
}
