//! Error types for hpxtools.
//!
//! Every tool fails fast: errors propagate to `main`, get logged once and
//! terminate the run with a non-zero exit status.

use thiserror::Error;

/// The main error type for hpxtools operations.
#[derive(Error, Debug)]
pub enum HpxError {
    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TIFF decoding errors
    #[error("TIFF error: {0}")]
    Tiff(#[from] tiff::TiffError),

    /// A tile raster with a sample layout we cannot use as elevation data
    #[error("Unsupported raster in {path}: {message}")]
    UnsupportedRaster { path: String, message: String },

    /// A tile whose shape differs from the configured tile dimensions
    #[error("Unexpected shape for tile {tile}: expected {expected_height}x{expected_width}, found {height}x{width}")]
    TileShape {
        tile: char,
        expected_height: usize,
        expected_width: usize,
        height: usize,
        width: usize,
    },

    /// Malformed RGB lookup table
    #[error("Lookup table error at line {line}: {message}")]
    LookupTable { line: usize, message: String },

    /// Invalid gradient definition
    #[error("Gradient error: {message}")]
    Gradient { message: String },

    /// cfitsio failures while reading or writing a map
    #[error("FITS I/O error: {0}")]
    FitsIo(#[from] fitsio::errors::Error),

    /// Malformed or unsupported HEALPix FITS file
    #[error("FITS error: {message}")]
    Fits { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Invalid parameter errors
    #[error("Invalid parameter: {param} - {message}")]
    InvalidParameter { param: String, message: String },

    /// Image encoding errors
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Array shape errors
    #[error("Array shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results with HpxError
pub type Result<T> = std::result::Result<T, HpxError>;
