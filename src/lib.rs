//! # hpxtools
//!
//! Data preparation for a HEALPix sphere viewer.
//!
//! - **earth**: resample a mosaic of Earth elevation tiles into a nested
//!   HEALPix map stored as a FITS binary table, with a Mollweide preview.
//! - **gradient**: sample a color gradient into an array literal.
//! - **lut**: turn an RGB lookup table into the same array literal syntax.
//!
//! Logs go to stderr; the color tools print their tables on stdout.

pub mod colormaps;
pub mod config;
pub mod dem;
pub mod error;
pub mod healpix;
pub mod logging;
pub mod preview;

pub use config::Config;
pub use error::{HpxError, Result};
pub use logging::{
    generate_run_id, init_tracing, log_error, log_operation_end, log_operation_start,
    log_resample_stats, log_timed_operation,
};
