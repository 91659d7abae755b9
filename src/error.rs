use std::path::PathBuf;
use thiserror::Error;

/// Broad classification used by the batch runner to decide between
/// skipping a file and reporting it as a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The input violates a precondition (no alpha, mismatched mask, bad region)
    InvalidInput,
    /// Reading, decoding, encoding or writing failed
    Io,
    /// The image has no visible content to trim
    DegenerateImage,
}

#[derive(Error, Debug)]
pub enum PrepError {
    #[error("Failed to load image '{path}'")]
    ImageLoad {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to save image '{path}'")]
    ImageSave {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("No valid images found in input")]
    NoImages,

    #[error("Failed to write output file '{path}'")]
    OutputWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to compress PNG '{path}': {message}")]
    PngCompress { path: PathBuf, message: String },

    #[error("Input path does not exist: {0}")]
    InputNotFound(PathBuf),

    #[error("Image has no 8-bit alpha channel (color type {color})")]
    MissingAlpha { color: String },

    #[error("Image has zero width or height")]
    EmptyImage,

    #[error(
        "Mask size {mask_width}x{mask_height} does not match sprite size {width}x{height}"
    )]
    DimensionMismatch {
        width: u32,
        height: u32,
        mask_width: u32,
        mask_height: u32,
    },

    #[error("Image ({width}x{height}) is fully transparent")]
    FullyTransparent { width: u32, height: u32 },

    #[error(
        "Crop region for '{name}' ({x},{y} {region_width}x{region_height}) does not fit inside {width}x{height}"
    )]
    RegionOutOfBounds {
        name: String,
        x: u32,
        y: u32,
        region_width: u32,
        region_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Tile size {tile_width}x{tile_height} is invalid for a {width}x{height} sheet")]
    InvalidTileSize {
        tile_width: u32,
        tile_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Tint gamma must be a positive finite number, got {0}")]
    InvalidGamma(f32),
}

impl PrepError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            PrepError::ImageLoad { .. }
            | PrepError::ImageSave { .. }
            | PrepError::OutputWrite { .. }
            | PrepError::PngCompress { .. }
            | PrepError::InputNotFound(_)
            | PrepError::NoImages => ErrorKind::Io,
            PrepError::MissingAlpha { .. }
            | PrepError::EmptyImage
            | PrepError::DimensionMismatch { .. }
            | PrepError::RegionOutOfBounds { .. }
            | PrepError::InvalidTileSize { .. }
            | PrepError::InvalidGamma(_) => ErrorKind::InvalidInput,
            PrepError::FullyTransparent { .. } => ErrorKind::DegenerateImage,
        }
    }
}

/// Classify an error coming out of a per-file operation.
///
/// Errors that did not originate from [`PrepError`] (plain I/O failures wrapped
/// by `anyhow` context) count as [`ErrorKind::Io`].
pub fn classify(err: &anyhow::Error) -> ErrorKind {
    err.chain()
        .find_map(|cause| cause.downcast_ref::<PrepError>())
        .map(PrepError::kind)
        .unwrap_or(ErrorKind::Io)
}
