use std::path::PathBuf;

use blocky_core::BlockyError;
use thiserror::Error;

/// Errors from the `blocky` binary.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read '{path}': {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid scenario '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("scenario step {step}: {source}")]
    Step { step: usize, source: BlockyError },

    #[error(transparent)]
    Engine(#[from] BlockyError),
}

impl CliError {
    /// Process exit code: 1 = engine rejected an operation, 2 = malformed
    /// scenario, 3 = I/O error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Io { .. } => 3,
            CliError::Parse { .. } => 2,
            CliError::Engine(
                BlockyError::InvalidKind { .. }
                | BlockyError::UnsupportedPort { .. }
                | BlockyError::Config { .. },
            ) => 2,
            CliError::Step { .. } | CliError::Engine(_) => 1,
        }
    }
}
