use std::fs;
use std::path::Path;

use super::error::RetrievalError;
use super::snapshot::LoadError;

/// Ordered snippet texts backing the vector index.
///
/// Position `i` holds the text whose embedding sits at position `i` in the
/// index; `text_at` is the only lookup the retriever needs.
pub struct KnowledgeStore {
    texts: Vec<String>,
}

impl KnowledgeStore {
    pub fn new(texts: Vec<String>) -> Self {
        Self { texts }
    }

    /// Reads the snapshot's texts file (a JSON array of strings).
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let texts: Vec<String> =
            serde_json::from_str(&contents).map_err(|source| LoadError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self { texts })
    }

    pub fn text_at(&self, position: usize) -> Result<&str, RetrievalError> {
        self.texts
            .get(position)
            .map(String::as_str)
            .ok_or(RetrievalError::OutOfRange {
                position,
                len: self.texts.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.texts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.texts.is_empty()
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_at_is_positional() {
        let store = KnowledgeStore::new(vec!["first".into(), "second".into()]);
        assert_eq!(store.text_at(0).unwrap(), "first");
        assert_eq!(store.text_at(1).unwrap(), "second");
    }

    #[test]
    fn out_of_range_position_is_rejected() {
        let store = KnowledgeStore::new(vec!["only".into()]);
        let err = store.text_at(3).unwrap_err();
        assert!(matches!(
            err,
            RetrievalError::OutOfRange { position: 3, len: 1 }
        ));
    }

    #[test]
    fn load_reads_a_json_array() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texts.json");
        std::fs::write(&path, r#"["alpha", "beta"]"#).unwrap();

        let store = KnowledgeStore::load(&path).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.text_at(1).unwrap(), "beta");
    }

    #[test]
    fn load_rejects_malformed_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("texts.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(
            KnowledgeStore::load(&path),
            Err(LoadError::Json { .. })
        ));
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert!(matches!(
            KnowledgeStore::load(&path),
            Err(LoadError::Io { .. })
        ));
    }
}
