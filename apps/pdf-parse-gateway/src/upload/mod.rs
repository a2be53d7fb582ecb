//! Upload Module
//!
//! Scratch storage for PDFs while they are being parsed. Nothing here
//! outlives a single request.

pub mod temp_file;

use std::io;
use std::path::Path;

pub use temp_file::TempUpload;

/// Multipart field carrying the uploaded file
pub const FILE_FIELD: &str = "file";

/// Create the upload directory if it does not exist
pub async fn ensure_upload_dir(dir: &Path) -> io::Result<()> {
    tokio::fs::create_dir_all(dir).await?;
    tracing::info!(dir = %dir.display(), "Upload directory ready");
    Ok(())
}

/// Whether `filename` names a PDF (case-insensitive `.pdf` suffix)
pub fn is_pdf_filename(filename: &str) -> bool {
    filename.to_ascii_lowercase().ends_with(".pdf")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_pdf_filename() {
        assert!(is_pdf_filename("report.pdf"));
        assert!(is_pdf_filename("report.PDF"));
        assert!(is_pdf_filename("Report.Pdf"));
        assert!(is_pdf_filename("archive.tar.pdf"));
        assert!(is_pdf_filename(".pdf"));

        assert!(!is_pdf_filename("notes.txt"));
        assert!(!is_pdf_filename("report.pdf.exe"));
        assert!(!is_pdf_filename("pdf"));
        assert!(!is_pdf_filename("report_pdf"));
        assert!(!is_pdf_filename(""));
    }

    #[tokio::test]
    async fn test_ensure_upload_dir_creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");

        ensure_upload_dir(&nested).await.unwrap();
        assert!(nested.is_dir());

        // Idempotent
        ensure_upload_dir(&nested).await.unwrap();
    }
}
