use thiserror::Error;

/// Everything that can end a verification request early.
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error("No face found in profile image.")]
    NoReferenceFace,
    #[error("Multiple faces found in profile image.")]
    MultipleReferenceFaces(usize),
    #[error("empty upload: {0}")]
    EmptyUpload(&'static str),
    #[error("temporary file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("inference error: {0}")]
    Inference(String),
}

impl VerificationError {
    /// Whether the request itself was at fault (bad reference image).
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            VerificationError::NoReferenceFace | VerificationError::MultipleReferenceFaces(_)
        )
    }
}
