//! Lenient CSV import and export of article corpora.
//!
//! Import never fails: missing columns become empty fields and an unreadable
//! file becomes an empty corpus, each reported through `tracing::warn!`.

use std::fs::File;
use std::io;
use std::path::Path;

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use tracing::{debug, info, warn};

use crate::article::{Article, Corpus};
use crate::error::Result;

pub const ID_COLUMN: &str = "article_id";
pub const REQUIRED_COLUMNS: [&str; 5] = [ID_COLUMN, "title", "content", "tags", "category"];
pub const OPTIONAL_COLUMNS: [&str; 2] = ["author", "date"];
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// column positions resolved from the header row
#[derive(Debug, Default)]
struct Columns {
    id: Option<usize>,
    title: Option<usize>,
    content: Option<usize>,
    tags: Option<usize>,
    category: Option<usize>,
    author: Option<usize>,
    date: Option<usize>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Self {
        // spreadsheet exports often start with a byte order mark
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
        };
        let cols = Columns {
            id: find(ID_COLUMN),
            title: find("title"),
            content: find("content"),
            tags: find("tags"),
            category: find("category"),
            author: find(OPTIONAL_COLUMNS[0]),
            date: find(OPTIONAL_COLUMNS[1]),
        };
        for (name, pos) in REQUIRED_COLUMNS.iter().zip([
            cols.id,
            cols.title,
            cols.content,
            cols.tags,
            cols.category,
        ]) {
            if pos.is_none() {
                warn!(column = *name, "column not found, creating empty column");
            }
        }
        cols
    }
}

fn field<'r>(record: &'r StringRecord, pos: Option<usize>) -> &'r str {
    pos.and_then(|p| record.get(p)).unwrap_or("")
}

/// Load a corpus from a CSV file.
///
/// Never fails: an unreadable or unparseable file yields an empty corpus.
pub fn load_articles<P: AsRef<Path>>(path: P) -> Corpus {
    let path = path.as_ref();
    let result = File::open(path)
        .map_err(csv::Error::from)
        .and_then(read_articles);
    match result {
        Ok(corpus) => {
            info!(path = %path.display(), articles = corpus.len(), "loaded articles");
            corpus
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "error loading articles, falling back to an empty corpus");
            Corpus::new()
        }
    }
}

/// Parse a corpus from CSV data with a header row.
///
/// Missing columns are tolerated. Rows whose `article_id` is not an integer
/// are skipped; without an `article_id` column rows are numbered from 1.
pub fn read_articles<R: io::Read>(reader: R) -> std::result::Result<Corpus, csv::Error> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let cols = Columns::resolve(rdr.headers()?);

    let mut articles = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record?;
        let id = match cols.id {
            Some(pos) => {
                let raw = record.get(pos).unwrap_or("").trim();
                match parse_id(raw) {
                    Some(id) => id,
                    None => {
                        warn!(row = row + 1, value = raw, "invalid article id, skipping row");
                        continue;
                    }
                }
            }
            None => row as i64 + 1,
        };
        let raw_date = field(&record, cols.date).trim();
        let date = if raw_date.is_empty() {
            None
        } else {
            match NaiveDate::parse_from_str(raw_date, DATE_FORMAT) {
                Ok(d) => Some(d),
                Err(_) => {
                    debug!(article_id = id, value = raw_date, "unparseable date ignored");
                    None
                }
            }
        };
        articles.push(Article {
            id,
            title: field(&record, cols.title).to_string(),
            content: field(&record, cols.content).to_string(),
            tags: Article::parse_tags(field(&record, cols.tags)),
            category: field(&record, cols.category).to_string(),
            author: field(&record, cols.author).to_string(),
            date,
        });
    }
    Ok(Corpus::from(articles))
}

/// integer ids, also accepting integral floats such as "3.0"
fn parse_id(raw: &str) -> Option<i64> {
    if let Ok(id) = raw.parse::<i64>() {
        return Some(id);
    }
    match raw.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 => Some(f as i64),
        _ => None,
    }
}

/// Write a corpus as CSV with every required and optional column
pub fn write_articles<W: io::Write>(corpus: &Corpus, writer: W) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(REQUIRED_COLUMNS.iter().chain(OPTIONAL_COLUMNS.iter()))?;
    for article in corpus {
        let date = article
            .date
            .map(|d| d.format(DATE_FORMAT).to_string())
            .unwrap_or_default();
        let id = article.id.to_string();
        let tags = article.tags.join(", ");
        wtr.write_record([
            id.as_str(),
            article.title.as_str(),
            article.content.as_str(),
            tags.as_str(),
            article.category.as_str(),
            article.author.as_str(),
            date.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write a corpus to a CSV file, creating parent directories
pub fn save_articles<P: AsRef<Path>>(corpus: &Corpus, path: P) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    write_articles(corpus, File::create(path)?)?;
    info!(path = %path.display(), articles = corpus.len(), "saved articles");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_full_schema() {
        let data = "article_id,title,content,tags,category,author,date\n\
                    1,Protein Basics,Protein builds muscle,\"protein, muscle\",Nutrition Basics,Author 1,2023-04-05\n\
                    2,Keto Diet,Low carb high fat diet,keto,Diets,Author 2,\n";
        let corpus = read_articles(data.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 2);
        let a = corpus.get_by_id(1).unwrap();
        assert_eq!(a.tags, vec!["protein", "muscle"]);
        assert_eq!(a.author, "Author 1");
        assert_eq!(a.date, NaiveDate::from_ymd_opt(2023, 4, 5));
        assert_eq!(corpus.get_by_id(2).unwrap().date, None);
    }

    #[test]
    fn byte_order_mark_keeps_id_column() {
        let data = "\u{feff}article_id,title,content,tags,category\n\
                    7,Iron,Iron rich spinach,iron,Minerals\n\
                    9,Zinc,Zinc and immunity,zinc,Minerals\n";
        let corpus = read_articles(data.as_bytes()).unwrap();
        let ids: Vec<i64> = corpus.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![7, 9]);
        assert_eq!(corpus.get_by_id(7).unwrap().title, "Iron");
    }

    #[test]
    fn missing_columns_become_empty() {
        let data = "article_id,title\n5,Only a title\n";
        let corpus = read_articles(data.as_bytes()).unwrap();
        let a = corpus.get(0).unwrap();
        assert_eq!(a.id, 5);
        assert_eq!(a.title, "Only a title");
        assert_eq!(a.content, "");
        assert!(a.tags.is_empty());
        assert_eq!(a.category, "");
        assert_eq!(a.author, "");
    }

    #[test]
    fn missing_id_column_numbers_rows() {
        let data = "title,content\nA,x\nB,y\n";
        let corpus = read_articles(data.as_bytes()).unwrap();
        assert_eq!(corpus.position_of(1), Some(0));
        assert_eq!(corpus.position_of(2), Some(1));
    }

    #[test]
    fn invalid_ids_are_skipped_and_float_ids_accepted() {
        let data = "article_id,title\nabc,bad\n3.0,ok\n,blank\n";
        let corpus = read_articles(data.as_bytes()).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus.get(0).unwrap().id, 3);
    }

    #[test]
    fn short_rows_are_padded() {
        let data = "article_id,title,content,tags,category\n1,Short\n";
        let corpus = read_articles(data.as_bytes()).unwrap();
        assert_eq!(corpus.get(0).unwrap().category, "");
    }

    #[test]
    fn unreadable_file_falls_back_to_empty() {
        let corpus = load_articles("/definitely/not/here/articles.csv");
        assert!(corpus.is_empty());
    }

    #[test]
    fn write_then_read_keeps_articles() {
        let mut corpus = Corpus::new();
        let mut a = Article::new(9, "Fiber, explained", "Oats \"and\" beans", vec!["gut health".into(), "fiber".into()], "Food Science");
        a.date = NaiveDate::from_ymd_opt(2022, 1, 31);
        corpus.push(a);
        let mut buf = Vec::new();
        write_articles(&corpus, &mut buf).unwrap();
        let back = read_articles(buf.as_slice()).unwrap();
        assert_eq!(back, corpus);
    }
}
