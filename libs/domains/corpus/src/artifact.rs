use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{CorpusError, CorpusResult};

/// Passages and their embeddings, index-aligned.
///
/// Construction checks that there is one vector per passage and that every
/// vector has the same length, so a value of this type always satisfies the
/// invariant. Written whole, never appended to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingArtifact {
    passages: Vec<String>,
    embeddings: Vec<Vec<f32>>,
}

impl EmbeddingArtifact {
    pub fn new(passages: Vec<String>, embeddings: Vec<Vec<f32>>) -> CorpusResult<Self> {
        let artifact = Self {
            passages,
            embeddings,
        };
        artifact.check()?;
        Ok(artifact)
    }

    fn check(&self) -> CorpusResult<()> {
        if self.passages.len() != self.embeddings.len() {
            return Err(CorpusError::Invariant(format!(
                "{} passages but {} embeddings",
                self.passages.len(),
                self.embeddings.len()
            )));
        }
        if let Some(first) = self.embeddings.first() {
            let dimension = first.len();
            if let Some(i) = self.embeddings.iter().position(|v| v.len() != dimension) {
                return Err(CorpusError::Invariant(format!(
                    "embedding {} has dimension {}, expected {}",
                    i,
                    self.embeddings[i].len(),
                    dimension
                )));
            }
        }
        Ok(())
    }

    pub fn passages(&self) -> &[String] {
        &self.passages
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.passages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.passages.is_empty()
    }

    /// Vector length, or `None` for an empty artifact
    pub fn dimension(&self) -> Option<usize> {
        self.embeddings.first().map(Vec::len)
    }

    /// Serialize to a sibling temporary file, then rename it over `path`.
    /// A failure leaves any existing file at `path` untouched.
    pub fn write_to(&self, path: &Path) -> CorpusResult<()> {
        let tmp = temp_path(path);

        let written = (|| -> CorpusResult<()> {
            let mut writer = BufWriter::new(File::create(&tmp)?);
            bincode::serialize_into(&mut writer, self)?;
            writer.flush()?;
            writer.get_ref().sync_all()?;
            Ok(())
        })();

        if let Err(err) = written {
            let _ = fs::remove_file(&tmp);
            return Err(err);
        }
        fs::rename(&tmp, path)?;

        info!(
            path = %path.display(),
            passages = self.len(),
            dimension = self.dimension().unwrap_or(0),
            "Wrote embedding artifact"
        );
        Ok(())
    }

    /// Load an artifact and re-check the invariant.
    pub fn read_from(path: &Path) -> CorpusResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let artifact: Self = bincode::deserialize_from(reader)?;
        artifact.check()?;
        Ok(artifact)
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| "artifact".into());
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = EmbeddingArtifact::new(vec!["a".into(), "b".into()], vec![vec![1.0]]);
        assert!(matches!(result, Err(CorpusError::Invariant(_))));
    }

    #[test]
    fn test_new_rejects_ragged_vectors() {
        let result = EmbeddingArtifact::new(
            vec!["a".into(), "b".into()],
            vec![vec![1.0, 2.0], vec![1.0]],
        );
        assert!(matches!(result, Err(CorpusError::Invariant(_))));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("page-embeddings.bin");
        let artifact = EmbeddingArtifact::new(
            vec!["Hello world".into(), "Second section".into()],
            vec![vec![0.5, -0.5], vec![1.0, 0.0]],
        )
        .unwrap();

        artifact.write_to(&path).unwrap();

        assert!(!dir.path().join("page-embeddings.bin.tmp").exists());
        let loaded = EmbeddingArtifact::read_from(&path).unwrap();
        assert_eq!(loaded, artifact);
        assert_eq!(loaded.dimension(), Some(2));
    }

    #[test]
    fn test_empty_artifact_is_valid() {
        let artifact = EmbeddingArtifact::new(vec![], vec![]).unwrap();
        assert!(artifact.is_empty());
        assert_eq!(artifact.dimension(), None);
    }

    #[test]
    fn test_failed_write_keeps_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("out.bin");
        let artifact = EmbeddingArtifact::new(vec!["x".into()], vec![vec![1.0]]).unwrap();

        assert!(matches!(artifact.write_to(&path), Err(CorpusError::Io(_))));
        assert!(!path.exists());
    }

    #[test]
    fn test_read_rejects_garbage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.bin");
        std::fs::write(&path, b"\xff\xff\xff\xff\xff\xff\xff\xff\xff").unwrap();
        assert!(EmbeddingArtifact::read_from(&path).is_err());
    }
}
