//! Document ingestion: validated text from uploads or direct input.

use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

/// Maximum accepted document size.
pub const MAX_DOCUMENT_BYTES: usize = 10 * 1024 * 1024;

/// File extensions accepted for uploads.
const ALLOWED_EXTENSIONS: &[&str] = &["txt", "md"];

/// Name given to text pasted directly without one.
const DEFAULT_TEXT_NAME: &str = "texto_direto";

/// Errors from document validation.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("document is empty")]
    Empty,
    #[error("document is too large: {0} bytes (max {MAX_DOCUMENT_BYTES})")]
    TooLarge(usize),
    #[error("unsupported file extension: {0} (allowed: txt, md)")]
    UnsupportedExtension(String),
    #[error("file is not valid UTF-8 text")]
    InvalidEncoding,
}

/// Where a document came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentSource {
    Upload,
    DirectText,
}

/// A validated text document ready for extraction.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing)]
    pub content: String,
    pub source: DocumentSource,
}

impl Document {
    /// Build a document from directly-pasted text.
    pub fn from_text(text: &str, name: Option<String>) -> Result<Self, DocumentError> {
        if text.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        if text.len() > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge(text.len()));
        }
        let name = name
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| DEFAULT_TEXT_NAME.to_string());
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            content: text.to_string(),
            source: DocumentSource::DirectText,
        })
    }

    /// Build a document from an uploaded file.
    pub fn from_upload(file_name: &str, bytes: &[u8]) -> Result<Self, DocumentError> {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();
        if !ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(DocumentError::UnsupportedExtension(extension));
        }
        if bytes.len() > MAX_DOCUMENT_BYTES {
            return Err(DocumentError::TooLarge(bytes.len()));
        }
        let content =
            String::from_utf8(bytes.to_vec()).map_err(|_| DocumentError::InvalidEncoding)?;
        if content.trim().is_empty() {
            return Err(DocumentError::Empty);
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name: file_name.to_string(),
            content,
            source: DocumentSource::Upload,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direct_text_gets_default_name() {
        let doc = Document::from_text("Reunião de planejamento", None).unwrap();
        assert_eq!(doc.name, "texto_direto");
        assert_eq!(doc.source, DocumentSource::DirectText);

        let named = Document::from_text("Reunião", Some("sprint-12.txt".into())).unwrap();
        assert_eq!(named.name, "sprint-12.txt");
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(
            Document::from_text("   \n  ", None),
            Err(DocumentError::Empty)
        ));
    }

    #[test]
    fn upload_extension_is_enforced() {
        assert!(Document::from_upload("ata.md", "conteúdo".as_bytes()).is_ok());
        assert!(Document::from_upload("ATA.TXT", "conteúdo".as_bytes()).is_ok());
        assert!(matches!(
            Document::from_upload("planilha.xlsx", b"data"),
            Err(DocumentError::UnsupportedExtension(_))
        ));
        assert!(matches!(
            Document::from_upload("semextensao", b"data"),
            Err(DocumentError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn oversize_and_binary_uploads_are_rejected() {
        let big = vec![b'a'; MAX_DOCUMENT_BYTES + 1];
        assert!(matches!(
            Document::from_upload("ata.txt", &big),
            Err(DocumentError::TooLarge(_))
        ));
        assert!(matches!(
            Document::from_upload("ata.txt", &[0xff, 0xfe, 0x00]),
            Err(DocumentError::InvalidEncoding)
        ));
    }
}
