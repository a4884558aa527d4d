//! Error type for document generation

use std::path::PathBuf;

/// Errors raised while assembling a .docx package
#[derive(Debug, thiserror::Error)]
pub enum DocxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("template part missing or unreadable: {0}")]
    Template(PathBuf),
    #[error("invalid number format: {0}")]
    InvalidNumberFormat(String),
    #[error("markup error: {0}")]
    Markup(String),
}
