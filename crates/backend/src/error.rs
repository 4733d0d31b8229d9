use std::fmt;
use std::path::PathBuf;

/// Errors from backend interaction.
///
/// All of these are environment errors: fatal to the run, surfaced before or
/// instead of a verdict. An unprovable contract is not an error; it arrives
/// as a non-success [`Verdict`](crate::Verdict).
#[derive(Debug)]
pub enum BackendError {
    /// Prover binary not found at the specified path.
    NotFound(PathBuf),
    /// A module or reference-spec file is missing.
    MissingArtifact(PathBuf),
    /// Prover process failed to start or crashed.
    ProcessError(String),
    /// Failed to parse prover output.
    ParseError(String),
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::NotFound(path) => {
                write!(f, "prover binary not found at: {}", path.display())
            }
            BackendError::MissingArtifact(path) => {
                write!(f, "missing module or spec file: {}", path.display())
            }
            BackendError::ProcessError(msg) => write!(f, "prover process error: {msg}"),
            BackendError::ParseError(msg) => {
                write!(f, "failed to parse prover output: {msg}")
            }
        }
    }
}

impl std::error::Error for BackendError {}

impl PartialEq for BackendError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (BackendError::NotFound(a), BackendError::NotFound(b)) => a == b,
            (BackendError::MissingArtifact(a), BackendError::MissingArtifact(b)) => a == b,
            (BackendError::ProcessError(a), BackendError::ProcessError(b)) => a == b,
            (BackendError::ParseError(a), BackendError::ParseError(b)) => a == b,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_not_found() {
        let err = BackendError::NotFound(PathBuf::from("/no/prover"));
        assert_eq!(err.to_string(), "prover binary not found at: /no/prover");
    }

    #[test]
    fn display_missing_artifact() {
        let err = BackendError::MissingArtifact(PathBuf::from("artifacts/game.bc"));
        assert_eq!(
            err.to_string(),
            "missing module or spec file: artifacts/game.bc"
        );
    }

    #[test]
    fn display_process_error() {
        let err = BackendError::ProcessError("crashed".to_string());
        assert_eq!(err.to_string(), "prover process error: crashed");
    }

    #[test]
    fn error_equality() {
        assert_eq!(
            BackendError::ParseError("x".to_string()),
            BackendError::ParseError("x".to_string())
        );
        assert_ne!(
            BackendError::ParseError("x".to_string()),
            BackendError::ProcessError("x".to_string())
        );
    }
}
