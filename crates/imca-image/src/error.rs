//! Error types for imca-image.

use std::path::PathBuf;

use rhizome_imca_rps::{ConfigError, RunError};
use thiserror::Error;

/// Errors from loading, discretizing, storing or assembling images.
#[derive(Debug, Error)]
pub enum ImagingError {
    /// Failed to decode or encode an image.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Filesystem failure.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The run itself failed.
    #[error(transparent)]
    Run(#[from] RunError),

    /// The source image could not be read.
    #[error("cannot read source image {path}: {source}")]
    Source {
        /// Path of the source image.
        path: PathBuf,
        /// Underlying decode error.
        source: image::ImageError,
    },

    /// A directory holds no numbered frames.
    #[error("no frames found in {dir}")]
    NoFrames {
        /// The directory searched.
        dir: PathBuf,
    },

    /// The output directory of a derived product already exists.
    #[error("{path} already exists")]
    AlreadyExists {
        /// The existing path.
        path: PathBuf,
    },

    /// The external encoder failed.
    #[error("encoder failed: {0}")]
    Encoder(String),
}
