//! Crate error type.
//!
//! Every failure is raised synchronously at the call that detects it and
//! propagated to the caller; nothing in the engine swallows an error into a
//! log line.

use crate::config::ConfigError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing geometry, color, flip or resize-mode parameter.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    /// Output format could not be resolved from a filename extension.
    #[error("Invalid extension \"{0}\"")]
    InvalidExtension(String),
    /// The codec was asked to decode a mime type it does not handle.
    #[error("Invalid mime type \"{0}\"")]
    InvalidMime(String),
    #[error("File does not exist: {0}")]
    FileNotExist(PathBuf),
    /// A raster capability required by the engine is not compiled in.
    #[error("Required image support unavailable: {0}")]
    ExtensionUnavailable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Codec error: {0}")]
    Codec(String),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Self::Codec(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
