// src/loader/mod.rs
use crate::utils::error::LoadError;
use lopdf::Document;
use std::fs;
use std::path::Path;

/// The document formats the loader knows how to turn into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pdf,
    PlainText,
}

impl SourceFormat {
    /// `.pdf` (any case) is a PDF; everything else is read as plain text.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => SourceFormat::Pdf,
            _ => SourceFormat::PlainText,
        }
    }
}

/// Reads a document and returns its full text.
pub fn load<P: AsRef<Path>>(path: P) -> Result<String, LoadError> {
    let path = path.as_ref();
    let format = SourceFormat::from_path(path);
    tracing::info!("Loading {} as {:?}", path.display(), format);

    let text = match format {
        SourceFormat::Pdf => load_pdf(path)?,
        SourceFormat::PlainText => load_text(path)?,
    };

    tracing::debug!("Loaded {} characters from {}", text.chars().count(), path.display());
    Ok(text)
}

fn load_text(path: &Path) -> Result<String, LoadError> {
    let bytes = fs::read(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| LoadError::Encoding(path.to_path_buf()))
}

fn load_pdf(path: &Path) -> Result<String, LoadError> {
    let doc = Document::load(path).map_err(|source| LoadError::Pdf {
        path: path.to_path_buf(),
        source,
    })?;

    if doc.is_encrypted() {
        return Err(LoadError::Encrypted(path.to_path_buf()));
    }

    // get_pages() is keyed by page number, so iteration follows page order.
    let pages = doc.get_pages();
    let mut page_texts = Vec::with_capacity(pages.len());
    for page_num in pages.keys() {
        let text = doc.extract_text(&[*page_num]).map_err(|source| LoadError::Pdf {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::trace!("Page {}: {} bytes of text", page_num, text.len());
        page_texts.push(text);
    }

    tracing::debug!("Extracted text from {} PDF pages", page_texts.len());
    Ok(page_texts.join("\n"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &[u8]) -> PathBuf {
        let path = std::env::temp_dir().join(format!("chart_extract_loader_{}_{}", std::process::id(), name));
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_format_dispatch() {
        assert_eq!(SourceFormat::from_path(Path::new("note.pdf")), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_path(Path::new("NOTE.PDF")), SourceFormat::Pdf);
        assert_eq!(SourceFormat::from_path(Path::new("note.txt")), SourceFormat::PlainText);
        assert_eq!(SourceFormat::from_path(Path::new("note")), SourceFormat::PlainText);
        assert_eq!(SourceFormat::from_path(Path::new("pdf")), SourceFormat::PlainText);
    }

    #[test]
    fn test_plain_text_read_verbatim() {
        let path = temp_file("verbatim.txt", b"Name: Jane\r\nAge: 45\n");
        assert_eq!(load(&path).unwrap(), "Name: Jane\r\nAge: 45\n");
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_non_utf8_text_is_encoding_error() {
        let path = temp_file("latin1.txt", &[0x4e, 0x61, 0x6d, 0x65, 0xff, 0xfe]);
        assert!(matches!(load(&path), Err(LoadError::Encoding(_))));
        fs::remove_file(path).ok();
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let path = std::env::temp_dir().join("chart_extract_definitely_missing.txt");
        assert!(matches!(load(&path), Err(LoadError::Io { .. })));
    }

    #[test]
    fn test_garbage_pdf_is_pdf_error() {
        let path = temp_file("garbage.pdf", b"this is not a pdf");
        assert!(matches!(load(&path), Err(LoadError::Pdf { .. })));
        fs::remove_file(path).ok();
    }
}
