//! Nested HEALPix indexing backed by `cdshealpix`.

use std::f64::consts::{FRAC_PI_2, PI};

use cdshealpix::nested::{self, Layer};

use super::{nside2npix, Ordering, Pixelization, MAX_NSIDE};
use crate::error::{HpxError, Result};

/// HEALPix tessellation at a fixed resolution, nested ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NestedGrid {
    nside: u32,
    depth: u8,
}

impl NestedGrid {
    /// Create a grid, checking that `nside` is a supported power of two
    pub fn new(nside: u32) -> Result<Self> {
        if nside == 0 || !nside.is_power_of_two() || nside > MAX_NSIDE {
            return Err(HpxError::InvalidParameter {
                param: "nside".to_string(),
                message: format!("{} is not a power of two in [1, {}]", nside, MAX_NSIDE),
            });
        }
        Ok(Self {
            nside,
            depth: nside.trailing_zeros() as u8,
        })
    }

    fn layer(&self) -> &'static Layer {
        nested::get(self.depth)
    }
}

/// Latitude of a colatitude, kept inside [-π/2, π/2] against rounding
fn latitude(theta: f64) -> f64 {
    (FRAC_PI_2 - theta).clamp(-FRAC_PI_2, FRAC_PI_2)
}

impl Pixelization for NestedGrid {
    fn nside(&self) -> u32 {
        self.nside
    }

    fn ordering(&self) -> Ordering {
        Ordering::Nested
    }

    fn ang2pix(&self, theta: f64, phi: f64) -> u64 {
        self.layer().hash(wrap_phi(phi), latitude(theta))
    }

    fn ang2pix_row(&self, theta: f64, phi: &[f64], out: &mut [u64]) {
        let layer = self.layer();
        let lat = latitude(theta);
        for (pix, &phi) in out.iter_mut().zip(phi) {
            *pix = layer.hash(wrap_phi(phi), lat);
        }
    }

    fn npix(&self) -> u64 {
        nside2npix(self.nside)
    }
}

/// Wrap a longitude into [0, 2π)
fn wrap_phi(phi: f64) -> f64 {
    let wrapped = phi.rem_euclid(2.0 * PI);
    if wrapped >= 2.0 * PI {
        0.0
    } else {
        wrapped
    }
}
