use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use num::Float;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    article::Corpus,
    error::{RecommenderError, Result},
    vectorizer::{tfidf::TFIDFEngine, vocabulary::Vocabulary, ArticleMatrix, TFIDFVectorizer},
};

/// Artifact layout version written by `save_model`
pub const FORMAT_VERSION: u32 = 1;

/// Borrowed view used for writing, so nothing is cloned on save
#[derive(Serialize)]
struct ModelArtifactRef<'a, N>
where
    N: Float + Serialize,
{
    format_version: u32,
    vocabulary: &'a Vocabulary,
    matrix: &'a ArticleMatrix<N>,
    corpus: &'a Corpus,
}

/// Persisted model: Vocabulary Model, article matrix and corpus snapshot.
/// The three are only ever written and read together.
/// Convert it with `into_parts`, which validates that the pieces match.
#[derive(Debug, Deserialize)]
pub struct ModelArtifact<N = f32>
where
    N: Float,
{
    pub format_version: u32,
    pub vocabulary: Vocabulary,
    pub matrix: ArticleMatrix<N>,
    pub corpus: Corpus,
}

impl<N> ModelArtifact<N>
where
    N: Float + Send + Sync,
{
    /// Check consistency and rebuild the vectorizer
    pub fn into_parts<E>(self) -> Result<(TFIDFVectorizer<N, E>, Corpus)>
    where
        E: TFIDFEngine,
    {
        if self.format_version != FORMAT_VERSION {
            return Err(RecommenderError::ModelNotAvailable(format!(
                "unsupported format version {} (expected {})",
                self.format_version, FORMAT_VERSION
            )));
        }
        let n_features = self.vocabulary.len();
        if self.matrix.n_features() != n_features {
            return Err(RecommenderError::ModelNotAvailable(format!(
                "matrix has {} features but vocabulary has {} terms",
                self.matrix.n_features(),
                n_features
            )));
        }
        if self.matrix.n_rows() != self.corpus.len() || self.vocabulary.doc_num() != self.corpus.len() as u64 {
            return Err(RecommenderError::ModelNotAvailable(format!(
                "matrix has {} rows but corpus has {} articles",
                self.matrix.n_rows(),
                self.corpus.len()
            )));
        }
        let bad_row = self.matrix.rows().iter().position(|row| {
            row.len() != n_features || !row.is_well_formed()
        });
        if let Some(row) = bad_row {
            return Err(RecommenderError::ModelNotAvailable(format!(
                "row {} does not fit the vocabulary",
                row
            )));
        }
        Ok((TFIDFVectorizer::from_parts(self.vocabulary, self.matrix), self.corpus))
    }
}

/// Encode the model to any writer
pub fn write_model<N, E, W>(writer: W, vectorizer: &TFIDFVectorizer<N, E>, corpus: &Corpus) -> Result<()>
where
    N: Float + Send + Sync + Serialize,
    E: TFIDFEngine,
    W: Write,
{
    let artifact = ModelArtifactRef {
        format_version: FORMAT_VERSION,
        vocabulary: vectorizer.vocabulary(),
        matrix: vectorizer.matrix(),
        corpus,
    };
    serde_cbor::to_writer(writer, &artifact).map_err(|e| RecommenderError::Serialization(e.to_string()))
}

/// Decode and validate a model from any reader
pub fn read_model<N, E, R>(reader: R) -> Result<(TFIDFVectorizer<N, E>, Corpus)>
where
    N: Float + Send + Sync + for<'de> Deserialize<'de>,
    E: TFIDFEngine,
    R: io::Read,
{
    let artifact: ModelArtifact<N> = serde_cbor::from_reader(reader)
        .map_err(|e| RecommenderError::ModelNotAvailable(format!("incomplete or corrupt model: {}", e)))?;
    artifact.into_parts()
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Save the model to `path`.
/// The file is written beside the target and renamed into place, so a
/// reader never sees a half-written artifact.
pub fn save_model<N, E, P>(path: P, vectorizer: &TFIDFVectorizer<N, E>, corpus: &Corpus) -> Result<()>
where
    N: Float + Send + Sync + Serialize,
    E: TFIDFEngine,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let tmp = temp_path(path);
    let result = (|| -> Result<()> {
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        write_model(&mut writer, vectorizer, corpus)?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        Ok(())
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    fs::rename(&tmp, path)?;
    info!(path = %path.display(), articles = corpus.len(), features = vectorizer.vocab_size(), "recommender model saved");
    Ok(())
}

/// Load a model saved by `save_model`.
/// A missing, truncated or inconsistent file is `ModelNotAvailable`.
pub fn load_model<N, E, P>(path: P) -> Result<(TFIDFVectorizer<N, E>, Corpus)>
where
    N: Float + Send + Sync + for<'de> Deserialize<'de>,
    E: TFIDFEngine,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| {
        RecommenderError::ModelNotAvailable(format!("cannot open {}: {}", path.display(), e))
    })?;
    let loaded = read_model(BufReader::new(file))?;
    info!(path = %path.display(), articles = loaded.1.len(), "recommender model loaded");
    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::article::Article;
    use crate::vectorizer::tfidf::DefaultTFIDFEngine;

    fn fitted() -> (TFIDFVectorizer, Corpus) {
        let corpus = Corpus::from(vec![
            Article::new(1, "Protein Basics", "Protein builds muscle", Article::parse_tags("protein, muscle"), "Nutrition Basics"),
            Article::new(2, "Keto Diet", "Low carb high fat diet", Article::parse_tags("keto"), "Diets"),
        ]);
        (TFIDFVectorizer::fit(&corpus, 5000), corpus)
    }

    #[test]
    fn write_read_roundtrip() {
        let (v, corpus) = fitted();
        let mut buf = Vec::new();
        write_model(&mut buf, &v, &corpus).unwrap();
        let (back, back_corpus): (TFIDFVectorizer, Corpus) = read_model(buf.as_slice()).unwrap();
        assert_eq!(back_corpus, corpus);
        assert_eq!(back.vocabulary(), v.vocabulary());
        assert_eq!(back.matrix(), v.matrix());
        assert_eq!(back.idf(), v.idf());
    }

    #[test]
    fn truncated_artifact_is_rejected() {
        let (v, corpus) = fitted();
        let mut buf = Vec::new();
        write_model(&mut buf, &v, &corpus).unwrap();
        buf.truncate(buf.len() / 2);
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));
    }

    #[test]
    fn missing_component_is_rejected() {
        #[derive(Serialize)]
        struct Partial<'a> {
            format_version: u32,
            vocabulary: &'a Vocabulary,
            corpus: &'a Corpus,
        }
        let (v, corpus) = fitted();
        let partial = Partial { format_version: FORMAT_VERSION, vocabulary: v.vocabulary(), corpus: &corpus };
        let buf = serde_cbor::to_vec(&partial).unwrap();
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));
    }

    #[test]
    fn version_mismatch_is_rejected() {
        let (v, corpus) = fitted();
        let artifact = ModelArtifactRef {
            format_version: FORMAT_VERSION + 1,
            vocabulary: v.vocabulary(),
            matrix: v.matrix(),
            corpus: &corpus,
        };
        let buf = serde_cbor::to_vec(&artifact).unwrap();
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));
    }

    #[test]
    fn mismatched_corpus_is_rejected() {
        let (v, _) = fitted();
        let other = Corpus::from(vec![Article::new(9, "Only one", "", vec![], "")]);
        let mut buf = Vec::new();
        write_model(&mut buf, &v, &other).unwrap();
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));
    }

    /// Same field layout as a written artifact, with raw rows
    #[derive(Serialize)]
    struct RawRow {
        len: usize,
        inds: Vec<usize>,
        vals: Vec<f32>,
    }

    #[derive(Serialize)]
    struct RawMatrix {
        n_features: usize,
        rows: Vec<RawRow>,
    }

    #[derive(Serialize)]
    struct RawArtifact<'a> {
        format_version: u32,
        vocabulary: &'a Vocabulary,
        matrix: RawMatrix,
        corpus: &'a Corpus,
    }

    fn with_first_row(inds: Vec<usize>, vals: Vec<f32>) -> Vec<u8> {
        let (v, corpus) = fitted();
        let n_features = v.vocab_size();
        let mut rows: Vec<RawRow> = v
            .matrix()
            .rows()
            .iter()
            .map(|row| {
                let (inds, vals) = row.raw_iter().unzip();
                RawRow { len: n_features, inds, vals }
            })
            .collect();
        rows[0] = RawRow { len: n_features, inds, vals };
        let artifact = RawArtifact {
            format_version: FORMAT_VERSION,
            vocabulary: v.vocabulary(),
            matrix: RawMatrix { n_features, rows },
            corpus: &corpus,
        };
        serde_cbor::to_vec(&artifact).unwrap()
    }

    #[test]
    fn untouched_raw_rows_load() {
        let (v, _) = fitted();
        let (inds, vals) = v.matrix().row(0).unwrap().raw_iter().unzip();
        let buf = with_first_row(inds, vals);
        let (back, _): (TFIDFVectorizer, Corpus) = read_model(buf.as_slice()).unwrap();
        assert_eq!(back.matrix(), v.matrix());
    }

    #[test]
    fn unsorted_or_out_of_range_row_is_rejected() {
        let buf = with_first_row(vec![999, 0], vec![1.0, 1.0]);
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));

        let buf = with_first_row(vec![2, 0], vec![1.0, 1.0]);
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));
    }

    #[test]
    fn row_with_missing_values_is_rejected() {
        let buf = with_first_row(vec![0, 1, 2], vec![1.0]);
        let err = read_model::<f32, DefaultTFIDFEngine, _>(buf.as_slice()).unwrap_err();
        assert!(matches!(err, RecommenderError::ModelNotAvailable(_)));
    }

    #[test]
    fn missing_file_is_model_not_available() {
        let err = load_model::<f32, DefaultTFIDFEngine, _>("/no/such/model.cbor").unwrap_err();
        assert_eq!(err.code(), "MODEL_NOT_AVAILABLE");
    }

    #[test]
    fn temp_path_sits_next_to_target() {
        assert_eq!(temp_path(Path::new("models/rec.cbor")), PathBuf::from("models/rec.cbor.tmp"));
    }
}
