//! Document-picker contract and upload validation.

use thiserror::Error;

use vivacoach_schema::{DocumentRef, ACCEPTED_MIME_TYPES};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("unsupported document type: {0}")]
    UnsupportedType(String),
}

/// External picker collaborator. `Ok(None)` means the user cancelled.
pub trait DocumentPicker: Send + Sync {
    fn pick(&self) -> anyhow::Result<Option<DocumentRef>>;
}

/// Gate a picked document before it is offered to the session. Pickers on
/// some platforms report no MIME type at all; those are rejected the same
/// way as unsupported ones.
pub fn validate(doc: &DocumentRef) -> Result<(), DocumentError> {
    if doc.is_accepted() {
        return Ok(());
    }
    let mime = doc.mime_type.clone().unwrap_or_else(|| "unknown".into());
    tracing::warn!(document = %doc.name, %mime, "rejected document upload");
    Err(DocumentError::UnsupportedType(mime))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_supported_type() {
        for mime in ACCEPTED_MIME_TYPES {
            let doc = DocumentRef::new("f", "file:///f", Some((*mime).into()));
            assert_eq!(validate(&doc), Ok(()));
        }
    }

    #[test]
    fn rejects_unsupported_and_unknown_types() {
        let doc = DocumentRef::new("f.png", "file:///f.png", Some("image/png".into()));
        assert_eq!(
            validate(&doc),
            Err(DocumentError::UnsupportedType("image/png".into()))
        );

        let doc = DocumentRef::new("f", "file:///f", None);
        assert_eq!(
            validate(&doc),
            Err(DocumentError::UnsupportedType("unknown".into()))
        );
    }
}
