//! Console error types.

use thiserror::Error;

/// Errors surfaced by console operations.
#[derive(Error, Debug)]
pub enum ConsoleError {
    /// A generation failed; the message is already cleaned for display.
    #[error("{0}")]
    Generation(String),

    #[error("No generation at index {index} (history has {len})")]
    InvalidSelection { index: usize, len: usize },

    #[error("No fetch is pending for this ticket")]
    StaleTicket,

    #[error("No image selected")]
    NoActiveImage,

    #[error("Image payload is not valid base64: {0}")]
    Decode(#[from] base64::DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
