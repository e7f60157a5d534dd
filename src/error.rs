// src/error.rs

use thiserror::Error;

/// Everything that can go wrong between picking a file and rendering the
/// normalized record. Every variant collapses into one user-visible message
/// at the upload-controller boundary; nothing propagates past it.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The picker/drop yielded no file, or the given path does not exist.
    #[error("No file provided")]
    NoFileProvided,

    /// MIME type is not on the accept list (PDF, PNG, JPEG, TIFF).
    #[error("Invalid file type. Please upload a PDF or image file.")]
    InvalidFileType,

    /// Upload exceeds the 5 MiB cap.
    #[error("File too large. Maximum size is 5MB.")]
    FileTooLarge,

    /// Non-2xx response. The message comes from the response body's
    /// `error` field when present, else is synthesized from the status.
    #[error("{0}")]
    ServerError(String),

    /// The `result` payload could not be decoded after fence stripping.
    /// Distinct from `ServerError`: the request itself succeeded.
    #[error("Failed to parse server response")]
    ParseError,

    /// The file exists but could not be read.
    #[error("Could not read file: {0}")]
    FileRead(std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}
