use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Destination of rendered output: stdout, or a file created (or truncated)
/// on write
#[derive(Debug, Clone, Default)]
pub struct Writer {
    path: Option<PathBuf>,
}

impl Writer {
    pub fn stdout() -> Self {
        Self { path: None }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub async fn write(&self, data: &str) -> std::io::Result<()> {
        match &self.path {
            Some(path) => {
                tokio::fs::write(path, data).await?;
                debug!("Wrote {} bytes to {}", data.len(), path.display());
            }
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(data.as_bytes()).await?;
                stdout.flush().await?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_truncates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        std::fs::write(&path, "stale content that is longer").unwrap();

        let writer = Writer::file(&path);
        writer.write("{}\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
        assert_eq!(writer.path(), Some(path.as_path()));
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = Writer::file(dir.path().join("missing").join("out.csv"));
        assert!(writer.write("a,b\n").await.is_err());
    }
}
