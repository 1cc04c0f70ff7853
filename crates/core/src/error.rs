//! Error taxonomy shared by the scan, analyze, organize and extract stages.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlrError {
    #[error("path does not exist: {}", .0.display())]
    NotFound(PathBuf),
    #[error("cannot access {}: {source}", path.display())]
    Access {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid archive {}: {message}", path.display())]
    Format { path: PathBuf, message: String },
    #[error("target already exists: {}", .0.display())]
    Collision(PathBuf),
    #[error("source and target are the same file: {}", .0.display())]
    SameFile(PathBuf),
    #[error("path denied by safety policy: {}", .0.display())]
    Denied(PathBuf),
    #[error("unsafe archive entry rejected: {entry}")]
    Security { entry: String },
    #[error("archive exceeds extraction limit: {0}")]
    Limit(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl PlrError {
    /// Wraps an io error with the path it happened on, keeping "not found" distinct.
    pub fn access(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            PlrError::NotFound(path)
        } else {
            PlrError::Access { path, source }
        }
    }

    pub fn format(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        PlrError::Format {
            path: path.into(),
            message: message.to_string(),
        }
    }

    /// Stable machine-readable category, used in logs and bridge payloads.
    pub fn kind(&self) -> &'static str {
        match self {
            PlrError::NotFound(_) => "not_found",
            PlrError::Access { .. } | PlrError::Io(_) => "access",
            PlrError::Format { .. } => "format",
            PlrError::Collision(_) | PlrError::SameFile(_) => "collision",
            PlrError::Denied(_) => "denied",
            PlrError::Security { .. } => "security",
            PlrError::Limit(_) => "limit",
        }
    }
}

pub type PlrResult<T> = Result<T, PlrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_io_error_maps_to_not_found() {
        let err = PlrError::access("/nope", io::Error::from(io::ErrorKind::NotFound));
        assert_eq!(err.kind(), "not_found");
        let err = PlrError::access("/nope", io::Error::from(io::ErrorKind::PermissionDenied));
        assert_eq!(err.kind(), "access");
    }
}
