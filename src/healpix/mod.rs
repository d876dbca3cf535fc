//! HEALPix pixelization support.
//!
//! Only the pieces the data tools need: nested `ang2pix`, resolution
//! bookkeeping and reading/writing single-column HEALPix FITS maps.

pub mod fits;
pub mod nested;

pub use fits::{read_map, write_map, HealpixMap, MapHeader, BAD_DATA};
pub use nested::NestedGrid;

use std::fmt;

/// Largest resolution whose nested indices fit the 64-bit scheme
pub const MAX_NSIDE: u32 = 1 << 29;

/// Pixel ordering scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Hierarchical (quad-tree) ordering
    Nested,
    /// Iso-latitude ring ordering
    Ring,
}

impl Ordering {
    /// Keyword value used in the `ORDERING` header card
    pub fn as_str(&self) -> &'static str {
        match self {
            Ordering::Nested => "NESTED",
            Ordering::Ring => "RING",
        }
    }

    /// Parse an `ORDERING` header value
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "NESTED" => Some(Ordering::Nested),
            "RING" => Some(Ordering::Ring),
            _ => None,
        }
    }
}

impl fmt::Display for Ordering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Total number of pixels for a resolution
pub fn nside2npix(nside: u32) -> u64 {
    12 * nside as u64 * nside as u64
}

/// Summary of the valid pixels of a map
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapStats {
    /// Pixels holding a finite value other than the bad-data sentinel
    pub valid: usize,
    /// Remaining pixels
    pub bad: usize,
    pub min: f32,
    pub max: f32,
    pub mean: f64,
}

impl MapStats {
    pub fn compute(data: &[f32], bad_data: f32) -> Self {
        let mut stats = MapStats {
            valid: 0,
            bad: 0,
            min: f32::INFINITY,
            max: f32::NEG_INFINITY,
            mean: 0.0,
        };
        let mut sum = 0.0f64;

        for &value in data {
            if is_valid(value, bad_data) {
                stats.valid += 1;
                stats.min = stats.min.min(value);
                stats.max = stats.max.max(value);
                sum += value as f64;
            } else {
                stats.bad += 1;
            }
        }

        if stats.valid > 0 {
            stats.mean = sum / stats.valid as f64;
        } else {
            stats.min = f32::NAN;
            stats.max = f32::NAN;
            stats.mean = f64::NAN;
        }
        stats
    }
}

/// Whether a pixel value carries data
pub fn is_valid(value: f32, bad_data: f32) -> bool {
    value.is_finite() && value != bad_data
}

/// Index assignment on a sphere tessellation.
///
/// Angles are colatitude `theta` in [0, π] and longitude `phi` in radians;
/// any real `phi` is accepted and wrapped.
pub trait Pixelization: Send + Sync {
    /// Resolution parameter
    fn nside(&self) -> u32;

    /// Ordering scheme of the returned indices
    fn ordering(&self) -> Ordering;

    /// Pixel index containing the direction, always below `npix()`
    fn ang2pix(&self, theta: f64, phi: f64) -> u64;

    /// Index a row of longitudes sharing one colatitude
    fn ang2pix_row(&self, theta: f64, phi: &[f64], out: &mut [u64]) {
        for (pix, &phi) in out.iter_mut().zip(phi) {
            *pix = self.ang2pix(theta, phi);
        }
    }

    /// Total number of pixels
    fn npix(&self) -> u64 {
        nside2npix(self.nside())
    }
}
