use std::path::PathBuf;

use flowsmith_codegen::CodegenError;
use flowsmith_core::ContractViolation;

/// Errors that stop a subcommand. Definition diagnostics are not errors;
/// they are printed as reports.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("error reading file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("error writing file '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("file '{}' is not a valid json file: {source}", path.display())]
    NotJson {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not parse '{}': {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid workflow name '{0}': must start with an uppercase letter and be alphanumeric")]
    InvalidName(String),

    #[error("invalid start state '{0}': must be alphanumeric")]
    InvalidStartState(String),

    #[error("workflow '{name}' not found in '{}'", dir.display())]
    WorkflowNotFound { name: String, dir: PathBuf },

    #[error("'{}' already exists (use --force to overwrite)", .0.display())]
    AlreadyExists(PathBuf),

    #[error(transparent)]
    Contract(#[from] ContractViolation),

    #[error(transparent)]
    Codegen(#[from] CodegenError),
}

impl CliError {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CliError::Write {
            path: path.into(),
            source,
        }
    }
}
