use flowsmith_core::{ContractViolation, ValidationReport};
use std::path::PathBuf;

/// Error type for code generation.
#[derive(Debug, thiserror::Error)]
pub enum CodegenError {
    /// The definition produced diagnostics; nothing was rendered.
    #[error("definition '{}' has {} diagnostic(s)", .0.source, .0.len())]
    Invalid(ValidationReport),

    /// Rendering was asked for a definition that never validated cleanly.
    #[error(transparent)]
    Contract(#[from] ContractViolation),

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CodegenError {
    /// The diagnostics behind an [`CodegenError::Invalid`], if that is what
    /// this is.
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            CodegenError::Invalid(report) => Some(report),
            _ => None,
        }
    }
}
