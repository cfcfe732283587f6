//! Error types shared by the library.
//!
//! [`TranscodeError`] covers a single image transform (codec and metadata failures).
//! [`TgaPakError`] is what every public operation returns; it attaches the entry or
//! path involved so the shell can report it without extra context.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// The kind of filesystem entry an operation expected to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    File,
    Directory,
}

impl fmt::Display for PathKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKind::File => f.write_str("file"),
            PathKind::Directory => f.write_str("directory"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TranscodeError {
    #[error("cannot decode TGA data: {0}")]
    Decode(#[source] image::ImageError),

    #[error("cannot encode TGA data: {0}")]
    Encode(#[source] image::ImageError),

    #[error("malformed crop metadata: {0}")]
    MalformedMetadata(#[from] serde_json::Error),

    #[error("invalid crop metadata: {0}")]
    InvalidMetadata(String),
}

#[derive(Debug, Error)]
pub enum TgaPakError {
    #[error("input not found: {}", .0.display())]
    InputNotFound(PathBuf),

    #[error("{} is not a {expected}", path.display())]
    WrongKind { path: PathBuf, expected: PathKind },

    #[error("no .tga files found in {}", .0.display())]
    NoMatchingFiles(PathBuf),

    #[error("overwrite of {} declined", .0.display())]
    OverwriteDeclined(PathBuf),

    #[error("{name}: {source}")]
    Transcode {
        name: String,
        #[source]
        source: TranscodeError,
    },

    #[error("archive error: {0}")]
    Container(#[from] zip::result::ZipError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl TgaPakError {
    pub(crate) fn transcode(name: impl Into<String>, source: TranscodeError) -> Self {
        TgaPakError::Transcode {
            name: name.into(),
            source,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TgaPakError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = TgaPakError> = std::result::Result<T, E>;
