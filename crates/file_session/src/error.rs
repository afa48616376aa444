//! Error taxonomy for preview loading and host interaction.
//!
//! Nothing here is fatal: every variant ends up as preview state or a notification.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failures surfaced by the file session.
pub enum FileSessionError {
    /// An image/video/audio element reported a load error.
    #[error("media failed to load: {0}")]
    MediaLoad(String),
    /// Preview bytes could not be read from the file locator.
    #[error("could not read file content: {0}")]
    ContentFetch(String),
    /// A document could not be converted to markup.
    #[error("could not convert document: {0}")]
    DocumentConversion(String),
    /// A PDF header or page tree could not be understood.
    #[error("could not read PDF: {0}")]
    PdfParse(String),
    /// The host refused to mint a locator for an ingested file.
    #[error("could not register file source: {0}")]
    SourceRegistration(String),
    /// Preference storage failed.
    #[error("preference storage failed: {0}")]
    Prefs(String),
}
