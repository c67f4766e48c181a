//! On-disk snapshot of the knowledge base.
//!
//! Two artifacts written side by side in the knowledge directory:
//! - `index.vec`: a small header (magic, format version, dimension, count)
//!   followed by the embedding matrix as little-endian f32s in row order.
//! - `texts.json`: the snippet texts as a JSON array, in the same order.
//!
//! Loading re-validates everything the runtime depends on: header sanity,
//! exact byte length, matching vector/text counts, non-empty corpus. Any
//! failure here is startup-fatal and pushes the service into degraded mode.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::error::RetrievalError;
use super::index::VectorIndex;
use super::knowledge::KnowledgeStore;

pub const INDEX_FILE: &str = "index.vec";
pub const TEXTS_FILE: &str = "texts.json";

const MAGIC: [u8; 4] = *b"CSVI";
const FORMAT_VERSION: u16 = 1;
const HEADER_LEN: usize = 14;

/// Snapshot problems detected while loading or writing the knowledge base.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("snapshot I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not a knowledge index file (bad magic)")]
    BadMagic { path: PathBuf },

    #[error("unsupported knowledge index version {version}")]
    UnsupportedVersion { version: u16 },

    #[error("index file size mismatch: expected {expected} bytes, found {found}")]
    SizeMismatch { expected: u64, found: u64 },

    #[error("snapshot vectors have zero dimension")]
    ZeroDimension,

    #[error("failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("snapshot is inconsistent: {vectors} vectors but {texts} texts")]
    LengthMismatch { vectors: usize, texts: usize },

    #[error("snapshot holds no documents")]
    EmptyCorpus,

    #[error("inconsistent vector dimensions: expected {expected}, got {actual}")]
    RaggedVectors { expected: usize, actual: usize },

    #[error("snapshot index rejected: {0}")]
    Index(#[from] RetrievalError),
}

/// Loads the snapshot pair from `dir` and builds the runtime structures.
pub fn load(dir: &Path) -> Result<(VectorIndex, KnowledgeStore), LoadError> {
    let vectors = read_vectors(&dir.join(INDEX_FILE))?;
    let store = KnowledgeStore::load(&dir.join(TEXTS_FILE))?;

    if vectors.len() != store.len() {
        return Err(LoadError::LengthMismatch {
            vectors: vectors.len(),
            texts: store.len(),
        });
    }
    if vectors.is_empty() {
        return Err(LoadError::EmptyCorpus);
    }

    let index = VectorIndex::build(vectors)?;
    Ok((index, store))
}

/// Writes the snapshot pair into `dir`, creating it if needed.
///
/// The pair is validated before anything touches disk so a failed write
/// cannot leave behind a half-consistent snapshot the loader would accept.
pub fn write(dir: &Path, vectors: &[Vec<f32>], texts: &[String]) -> Result<(), LoadError> {
    if vectors.len() != texts.len() {
        return Err(LoadError::LengthMismatch {
            vectors: vectors.len(),
            texts: texts.len(),
        });
    }
    let Some(first) = vectors.first() else {
        return Err(LoadError::EmptyCorpus);
    };
    let dimension = first.len();
    if dimension == 0 {
        return Err(LoadError::ZeroDimension);
    }
    for vector in vectors {
        if vector.len() != dimension {
            return Err(LoadError::RaggedVectors {
                expected: dimension,
                actual: vector.len(),
            });
        }
    }

    fs::create_dir_all(dir).map_err(|source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    write_vectors(&dir.join(INDEX_FILE), vectors, dimension)?;

    let texts_path = dir.join(TEXTS_FILE);
    let json = serde_json::to_string_pretty(texts).map_err(|source| LoadError::Json {
        path: texts_path.clone(),
        source,
    })?;
    fs::write(&texts_path, json).map_err(|source| LoadError::Io {
        path: texts_path,
        source,
    })?;

    Ok(())
}

pub fn read_vectors(path: &Path) -> Result<Vec<Vec<f32>>, LoadError> {
    let raw = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if raw.len() < MAGIC.len() || raw[..MAGIC.len()] != MAGIC {
        return Err(LoadError::BadMagic {
            path: path.to_path_buf(),
        });
    }
    if raw.len() < HEADER_LEN {
        return Err(LoadError::SizeMismatch {
            expected: HEADER_LEN as u64,
            found: raw.len() as u64,
        });
    }

    let version = u16::from_le_bytes([raw[4], raw[5]]);
    if version != FORMAT_VERSION {
        return Err(LoadError::UnsupportedVersion { version });
    }

    let dimension = u32::from_le_bytes([raw[6], raw[7], raw[8], raw[9]]) as usize;
    let count = u32::from_le_bytes([raw[10], raw[11], raw[12], raw[13]]) as usize;
    if dimension == 0 && count > 0 {
        return Err(LoadError::ZeroDimension);
    }

    // A corrupt header can claim more bytes than u64 holds; saturate so the
    // size check fails on such files instead of wrapping.
    let expected = (dimension as u64)
        .saturating_mul(count as u64)
        .saturating_mul(4)
        .saturating_add(HEADER_LEN as u64);
    if raw.len() as u64 != expected {
        return Err(LoadError::SizeMismatch {
            expected,
            found: raw.len() as u64,
        });
    }

    let mut floats = raw[HEADER_LEN..]
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]));

    let mut vectors = Vec::with_capacity(count);
    for _ in 0..count {
        vectors.push(floats.by_ref().take(dimension).collect());
    }
    Ok(vectors)
}

fn write_vectors(path: &Path, vectors: &[Vec<f32>], dimension: usize) -> Result<(), LoadError> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + vectors.len() * dimension * 4);
    bytes.extend_from_slice(&MAGIC);
    bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    bytes.extend_from_slice(&(dimension as u32).to_le_bytes());
    bytes.extend_from_slice(&(vectors.len() as u32).to_le_bytes());
    for vector in vectors {
        bytes.extend(vector.iter().flat_map(|v| v.to_le_bytes()));
    }

    fs::write(path, bytes).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_pair() -> (Vec<Vec<f32>>, Vec<String>) {
        (
            vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![10.0, 10.0]],
            vec!["A".to_string(), "B".to_string(), "C".to_string()],
        )
    }

    #[test]
    fn round_trip_preserves_vectors_and_texts() {
        let dir = tempfile::tempdir().unwrap();
        let (vectors, texts) = sample_pair();

        write(dir.path(), &vectors, &texts).unwrap();
        let reread = read_vectors(&dir.path().join(INDEX_FILE)).unwrap();
        assert_eq!(reread, vectors);

        let (index, store) = load(dir.path()).unwrap();
        assert_eq!(index.len(), 3);
        assert_eq!(index.dimension(), 2);
        assert_eq!(store.texts(), texts.as_slice());
    }

    #[test]
    fn load_rejects_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        let (vectors, texts) = sample_pair();
        write(dir.path(), &vectors, &texts).unwrap();
        fs::write(dir.path().join(TEXTS_FILE), r#"["only one"]"#).unwrap();

        assert!(matches!(
            load(dir.path()),
            Err(LoadError::LengthMismatch {
                vectors: 3,
                texts: 1
            })
        ));
    }

    #[test]
    fn load_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(INDEX_FILE), b"XXXX-not-an-index").unwrap();
        fs::write(dir.path().join(TEXTS_FILE), "[]").unwrap();

        assert!(matches!(load(dir.path()), Err(LoadError::BadMagic { .. })));
    }

    #[test]
    fn load_rejects_truncated_index() {
        let dir = tempfile::tempdir().unwrap();
        let (vectors, texts) = sample_pair();
        write(dir.path(), &vectors, &texts).unwrap();

        let index_path = dir.path().join(INDEX_FILE);
        let raw = fs::read(&index_path).unwrap();
        fs::write(&index_path, &raw[..raw.len() - 5]).unwrap();

        assert!(matches!(
            load(dir.path()),
            Err(LoadError::SizeMismatch { .. })
        ));
    }

    #[test]
    fn load_rejects_overflowing_header_counts() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = Vec::new();
        raw.extend_from_slice(&MAGIC);
        raw.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        raw.extend_from_slice(&0x8000_0000u32.to_le_bytes());
        raw.extend_from_slice(&0x8000_0000u32.to_le_bytes());
        fs::write(dir.path().join(INDEX_FILE), raw).unwrap();
        fs::write(dir.path().join(TEXTS_FILE), r#"["x"]"#).unwrap();

        assert!(matches!(
            load(dir.path()),
            Err(LoadError::SizeMismatch { found: 14, .. })
        ));
    }

    #[test]
    fn load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = Vec::new();
        raw.extend_from_slice(&MAGIC);
        raw.extend_from_slice(&9u16.to_le_bytes());
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&1u32.to_le_bytes());
        raw.extend_from_slice(&1.0f32.to_le_bytes());
        fs::write(dir.path().join(INDEX_FILE), raw).unwrap();
        fs::write(dir.path().join(TEXTS_FILE), r#"["x"]"#).unwrap();

        assert!(matches!(
            load(dir.path()),
            Err(LoadError::UnsupportedVersion { version: 9 })
        ));
    }

    #[test]
    fn load_rejects_empty_corpus() {
        let dir = tempfile::tempdir().unwrap();
        let mut raw = Vec::new();
        raw.extend_from_slice(&MAGIC);
        raw.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        raw.extend_from_slice(&4u32.to_le_bytes());
        raw.extend_from_slice(&0u32.to_le_bytes());
        fs::write(dir.path().join(INDEX_FILE), raw).unwrap();
        fs::write(dir.path().join(TEXTS_FILE), "[]").unwrap();

        assert!(matches!(load(dir.path()), Err(LoadError::EmptyCorpus)));
    }

    #[test]
    fn write_validates_the_pair_first() {
        let dir = tempfile::tempdir().unwrap();

        let err = write(dir.path(), &[vec![1.0]], &[]).unwrap_err();
        assert!(matches!(err, LoadError::LengthMismatch { .. }));

        let err = write(dir.path(), &[], &[]).unwrap_err();
        assert!(matches!(err, LoadError::EmptyCorpus));

        let err = write(
            dir.path(),
            &[vec![1.0, 2.0], vec![1.0]],
            &["a".to_string(), "b".to_string()],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            LoadError::RaggedVectors {
                expected: 2,
                actual: 1
            }
        ));

        assert!(!dir.path().join(INDEX_FILE).exists());
    }
}
