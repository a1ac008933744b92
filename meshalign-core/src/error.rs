/// Error type shared by the loaders, writers and config reader
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Extension is neither OBJ nor STL
    #[error("unknown mesh format: {extension:?}")]
    UnknownFormat { extension: String },

    /// `line` is 1-based, or 0 when the format has no line structure
    #[error("parse error: {message}")]
    Parse { line: usize, message: String },

    #[error("unexpected end of file: expected {expected} triangles, got {got}")]
    UnexpectedEof { expected: u32, got: u32 },

    #[error("vehicle entry {name:?} not found in config")]
    VehicleNotFound { name: String },

    #[error("invalid scale factor for {name:?}: {reason}")]
    InvalidScale { name: String, reason: String },

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        let message = message.into();
        let message = if line > 0 {
            format!("line {line}: {message}")
        } else {
            message
        };
        Self::Parse { line, message }
    }

    /// Map a `NotFound` I/O error onto `FileNotFound` with the offending path
    pub fn from_io(err: std::io::Error, path: &std::path::Path) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            Self::Io(err)
        }
    }
}
