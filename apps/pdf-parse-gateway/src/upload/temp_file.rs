//! Temporary Upload File
//!
//! A request-scoped file under the upload directory. The file is removed
//! when the guard is dropped, which covers success, errors, panics and
//! the handler future being cancelled mid-upload.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

/// Exclusively owned temporary PDF, deleted on drop
pub struct TempUpload {
    path: PathBuf,
    file: Option<File>,
    bytes_written: u64,
}

impl TempUpload {
    /// Create `<uuid>.pdf` inside `dir`
    pub async fn create(dir: &Path) -> io::Result<Self> {
        let mut upload = Self {
            path: dir.join(format!("{}.pdf", Uuid::new_v4())),
            file: None,
            bytes_written: 0,
        };

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&upload.path)
            .await?;
        upload.file = Some(file);

        tracing::debug!(path = %upload.path.display(), "Created temp upload");
        Ok(upload)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    /// Append bytes to the file
    pub async fn write_chunk(&mut self, data: &[u8]) -> io::Result<()> {
        let file = self.file.as_mut().ok_or_else(|| {
            io::Error::other("temp upload already finished")
        })?;
        file.write_all(data).await?;
        self.bytes_written += data.len() as u64;
        Ok(())
    }

    /// Flush and close the handle so the file can be read by a parser
    pub async fn finish(&mut self) -> io::Result<u64> {
        if let Some(mut file) = self.file.take() {
            file.flush().await?;
            file.sync_all().await?;
        }
        Ok(self.bytes_written)
    }
}

impl Drop for TempUpload {
    fn drop(&mut self) {
        // Close before unlinking
        self.file.take();

        // Blocking on purpose: Drop cannot await, and this is one unlink
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Removed temp upload"),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temp upload"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_and_cleanup() {
        let dir = tempfile::tempdir().unwrap();

        let path = {
            let mut upload = TempUpload::create(dir.path()).await.unwrap();
            upload.write_chunk(b"%PDF-1.7\n").await.unwrap();
            upload.write_chunk(b"body").await.unwrap();
            assert_eq!(upload.finish().await.unwrap(), 13);

            let contents = std::fs::read(upload.path()).unwrap();
            assert_eq!(contents, b"%PDF-1.7\nbody");
            upload.path().to_path_buf()
        };

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_unique_names() {
        let dir = tempfile::tempdir().unwrap();

        let a = TempUpload::create(dir.path()).await.unwrap();
        let b = TempUpload::create(dir.path()).await.unwrap();

        assert_ne!(a.path(), b.path());
        assert_eq!(a.path().extension().unwrap(), "pdf");
        assert_eq!(a.path().parent().unwrap(), dir.path());
    }

    #[tokio::test]
    async fn test_cleanup_without_finish() {
        let dir = tempfile::tempdir().unwrap();

        let mut upload = TempUpload::create(dir.path()).await.unwrap();
        upload.write_chunk(b"partial").await.unwrap();
        let path = upload.path().to_path_buf();
        drop(upload);

        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_already_removed_file_is_tolerated() {
        let dir = tempfile::tempdir().unwrap();

        let mut upload = TempUpload::create(dir.path()).await.unwrap();
        upload.finish().await.unwrap();
        std::fs::remove_file(upload.path()).unwrap();

        drop(upload);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_write_after_finish_fails() {
        let dir = tempfile::tempdir().unwrap();

        let mut upload = TempUpload::create(dir.path()).await.unwrap();
        upload.finish().await.unwrap();

        assert!(upload.write_chunk(b"late").await.is_err());
    }

    #[tokio::test]
    async fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");

        assert!(TempUpload::create(&missing).await.is_err());
    }
}
