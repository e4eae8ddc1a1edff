//! PDF text extraction for resumes and position-context documents.

use std::path::Path;

use tracing::error;

/// Extracts the plain text of a PDF, pages separated by newlines.
///
/// Extraction failures are recoverable by contract: the error is logged and
/// an empty string is returned, so one bad file never aborts a batch run.
pub fn extract_text(path: &Path) -> String {
    match pdf_extract::extract_text(path) {
        Ok(text) => text,
        Err(e) => {
            error!("Error reading PDF {}: {e}", path.display());
            String::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_missing_file_yields_empty_text() {
        let text = extract_text(Path::new("/nonexistent/resume.pdf"));
        assert_eq!(text, "");
    }

    #[test]
    fn test_unparsable_file_yields_empty_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"this is not a pdf").unwrap();
        let text = extract_text(file.path());
        assert_eq!(text, "");
    }
}
