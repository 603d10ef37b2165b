use std::fmt;
use std::path::PathBuf;

/// Recoverable conditions inside the annotator core. None of these are fatal;
/// each one degrades to the previous valid state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnnotatorError {
    /// The drawing surface has not been attached yet.
    RenderTargetUnavailable,
    /// The tag prompt produced no usable text.
    EmptyTagInput,
    /// The selected file was missing or could not be decoded.
    InvalidUpload { path: PathBuf, reason: String },
}

impl fmt::Display for AnnotatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnnotatorError::RenderTargetUnavailable => {
                write!(f, "render target is not attached")
            }
            AnnotatorError::EmptyTagInput => write!(f, "tag input was empty"),
            AnnotatorError::InvalidUpload { path, reason } => {
                write!(f, "invalid upload {}: {}", path.display(), reason)
            }
        }
    }
}

impl std::error::Error for AnnotatorError {}
