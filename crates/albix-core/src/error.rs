use std::path::PathBuf;
use thiserror::Error;

/// Errors from playlist editing and playlist file I/O.
#[derive(Error, Debug)]
pub enum PlaylistError {
    #[error("Unsupported file type: {0}")]
    UnsupportedExtension(PathBuf),

    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Index {index} out of range (playlist has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Malformed playlist: {0}")]
    Malformed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlaylistError {
    fn from(err: serde_json::Error) -> Self {
        PlaylistError::Malformed(err.to_string())
    }
}

#[derive(Error, Debug)]
pub enum StationError {
    #[error("Station name must not be empty")]
    EmptyName,

    #[error("Invalid stream URL: {0}")]
    InvalidUrl(String),

    #[error("Station not found: {0}")]
    NotFound(String),

    #[error("Built-in station cannot be removed: {0}")]
    BuiltIn(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Station file parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Station file write error: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Error, Debug)]
pub enum LyricsError {
    #[error("No lyrics found for {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T, E = PlaylistError> = std::result::Result<T, E>;
