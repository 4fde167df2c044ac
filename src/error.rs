use std::path::PathBuf;

use thiserror::Error;

/// Fatal problems with the county table or the boundary catalog.
///
/// Any of these stops the application before a window is opened.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("cannot read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{path}: missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path}: row {row}: {message}")]
    MalformedRow {
        path: PathBuf,
        /// Data row, counting from 1 (the header is not counted).
        row: usize,
        message: String,
    },

    #[error("{path}: {message}")]
    MalformedTable { path: PathBuf, message: String },

    #[error("{path}: county id {id} appears more than once")]
    DuplicateId { path: PathBuf, id: String },

    #[error("{path}: table has no rows")]
    Empty { path: PathBuf },

    #[error("{path}: invalid boundary catalog: {message}")]
    MalformedBoundaries { path: PathBuf, message: String },
}

impl DataLoadError {
    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        DataLoadError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn table(path: &std::path::Path, message: impl Into<String>) -> Self {
        DataLoadError::MalformedTable {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }

    pub(crate) fn row(path: &std::path::Path, row: usize, message: impl Into<String>) -> Self {
        DataLoadError::MalformedRow {
            path: path.to_path_buf(),
            row,
            message: message.into(),
        }
    }

    pub(crate) fn boundaries(path: &std::path::Path, message: impl Into<String>) -> Self {
        DataLoadError::MalformedBoundaries {
            path: path.to_path_buf(),
            message: message.into(),
        }
    }
}
