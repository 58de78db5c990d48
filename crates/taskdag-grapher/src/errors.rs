use std::path::{Path, PathBuf};
use taskdag::DagError;
use thiserror::Error;

/// Errors that abort a trace load.
///
/// Every variant is fatal to the whole multi-file load: no partially built
/// graph is handed back.
#[derive(Error, Debug)]
pub enum LoadError {
    /// Failed to open or read a trace file
    #[error("IO error reading {}: {}", .0.display(), .1)]
    FileAccess(PathBuf, #[source] std::io::Error),

    /// Line matches none of the recognized shapes
    #[error("Line `{text}` does not match node or link (line {line} of {})", .file.display())]
    Format {
        /// Trace file
        file: PathBuf,
        /// 1-based line number within `file`
        line: usize,
        /// The offending line
        text: String,
    },

    /// Line matches a shape but its fields are unusable
    #[error("{message} in `{text}` (line {line} of {})", .file.display())]
    Schema {
        /// Trace file
        file: PathBuf,
        /// 1-based line number within `file`
        line: usize,
        /// What was wrong with the fields
        message: String,
        /// The offending line
        text: String,
    },

    /// A declaration was refused by the configured build policy
    #[error("Rejected declaration at line {line} of {}: {source}", .file.display())]
    Conflict {
        /// Trace file
        file: PathBuf,
        /// 1-based line number within `file`
        line: usize,
        /// The policy violation
        #[source]
        source: DagError,
    },
}

impl LoadError {
    /// File and line the error points at, if it concerns a specific line.
    pub fn location(&self) -> Option<(&Path, usize)> {
        match self {
            LoadError::FileAccess(..) => None,
            LoadError::Format { file, line, .. }
            | LoadError::Schema { file, line, .. }
            | LoadError::Conflict { file, line, .. } => Some((file.as_path(), *line)),
        }
    }

    /// The trace file the error concerns.
    pub fn file(&self) -> &Path {
        match self {
            LoadError::FileAccess(file, _) => file,
            LoadError::Format { file, .. }
            | LoadError::Schema { file, .. }
            | LoadError::Conflict { file, .. } => file,
        }
    }
}

/// Result type for load operations
pub type LoadResult<T> = Result<T, LoadError>;
