use std::path::PathBuf;
use thiserror::Error;

/// Codec-level failure, produced by [`crate::converter::codec::ImageCodec`]
/// implementations.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Image(#[from] image::ImageError),

    #[cfg(feature = "heif")]
    #[error("HEIF decoder error: {0}")]
    Heif(#[from] libheif_rs::HeifError),
}

/// Per-file conversion failure. These never abort a batch: the worker logs
/// the error, counts the file as failed, and moves on.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("Failed to decode {}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Failed to encode {}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Source file has no usable name: {}", .0.display())]
    InvalidFileName(PathBuf),
}

/// Precondition violation detected before a worker is spawned. The job is
/// rejected and reported to the user; no thread starts.
#[derive(Error, Debug)]
pub enum JobError {
    #[error("No files selected for conversion")]
    EmptyFileList,

    #[error("Output directory does not exist: {}", .0.display())]
    OutputDirMissing(PathBuf),

    #[error("Output path is not a directory: {}", .0.display())]
    OutputDirNotADirectory(PathBuf),

    #[error("Output directory is read-only: {}", .0.display())]
    OutputDirReadOnly(PathBuf),
}
