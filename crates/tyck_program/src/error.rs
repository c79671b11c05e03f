//! Driver-level failures: files that cannot be read, bad project files and
//! aborted sessions. Type errors are never reported here.

use std::path::PathBuf;

use tyck_checker::CheckerError;
use tyck_options::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ProgramError {
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid project file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("{0}")]
    Config(String),
    #[error("type check aborted: {0}")]
    Checker(#[from] CheckerError),
}

impl From<ConfigError> for ProgramError {
    fn from(error: ConfigError) -> Self {
        match error {
            ConfigError::Io { path, source } => ProgramError::Io {
                path: PathBuf::from(path),
                source,
            },
            ConfigError::Json(error) => ProgramError::Json(error),
        }
    }
}
