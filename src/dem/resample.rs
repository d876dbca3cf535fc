//! Binning of raster samples into HEALPix pixels.
//!
//! Pixel indices for a band of rows are computed in parallel, then the
//! samples are added to the accumulator sequentially in row-major order.
//! The resulting sums therefore do not depend on the number of workers.
//! Every sample is accumulated, NaN included, unless skipping non-finite
//! samples is switched on.

use ndarray::{ArrayView1, ArrayView2, Axis};
use rayon::prelude::*;
use tracing::debug;

use super::accumulator::Accumulator;
use crate::error::{HpxError, Result};
use crate::healpix::Pixelization;

/// Rows indexed per parallel batch
pub const DEFAULT_BAND_ROWS: usize = 256;

/// Sample counters for one or more tiles
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResampleStats {
    /// Samples added to the accumulator
    pub samples: u64,
    /// Non-finite samples left out when skipping is enabled
    pub skipped: u64,
}

impl std::ops::AddAssign for ResampleStats {
    fn add_assign(&mut self, other: Self) {
        self.samples += other.samples;
        self.skipped += other.skipped;
    }
}

/// Assigns raster samples to pixels of a pixelization
pub struct Resampler<'a, P: Pixelization + ?Sized> {
    pixelization: &'a P,
    band_rows: usize,
    skip_non_finite: bool,
}

impl<'a, P: Pixelization + ?Sized> Resampler<'a, P> {
    pub fn new(pixelization: &'a P) -> Self {
        Self {
            pixelization,
            band_rows: DEFAULT_BAND_ROWS,
            skip_non_finite: false,
        }
    }

    pub fn with_band_rows(mut self, band_rows: usize) -> Self {
        self.band_rows = band_rows.max(1);
        self
    }

    /// Leave NaN and infinite samples out of the sums instead of propagating them
    pub fn with_skip_non_finite(mut self, skip: bool) -> Self {
        self.skip_non_finite = skip;
        self
    }

    /// Add every sample of a raster to the pixel containing its direction.
    ///
    /// `samples[[i, j]]` lies at colatitude `theta[i]` and longitude `phi[j]`.
    pub fn resample_tile(
        &self,
        samples: ArrayView2<'_, f32>,
        theta: ArrayView1<'_, f64>,
        phi: ArrayView1<'_, f64>,
        acc: &mut Accumulator,
    ) -> Result<ResampleStats> {
        let (height, width) = samples.dim();
        if height != theta.len() || width != phi.len() {
            return Err(HpxError::InvalidParameter {
                param: "samples".to_string(),
                message: format!(
                    "raster is {}x{} but coordinates are {}x{}",
                    height,
                    width,
                    theta.len(),
                    phi.len()
                ),
            });
        }
        if acc.len() as u64 != self.pixelization.npix() {
            return Err(HpxError::InvalidParameter {
                param: "accumulator".to_string(),
                message: format!(
                    "accumulator has {} pixels, pixelization has {}",
                    acc.len(),
                    self.pixelization.npix()
                ),
            });
        }

        let phi = phi.to_vec();
        let mut stats = ResampleStats::default();
        let mut indices = vec![0u64; self.band_rows.min(height.max(1)) * width];

        for (band, rows) in samples
            .axis_chunks_iter(Axis(0), self.band_rows)
            .enumerate()
        {
            let first_row = band * self.band_rows;
            let band_len = rows.nrows() * width;
            let band_theta = theta.slice(ndarray::s![first_row..first_row + rows.nrows()]);

            indices[..band_len]
                .par_chunks_mut(width)
                .zip(band_theta.to_vec().into_par_iter())
                .for_each(|(out, t)| self.pixelization.ang2pix_row(t, &phi, out));

            for (row, pix_row) in rows.outer_iter().zip(indices[..band_len].chunks(width)) {
                for (&value, &pix) in row.iter().zip(pix_row) {
                    if self.skip_non_finite && !value.is_finite() {
                        stats.skipped += 1;
                        continue;
                    }
                    acc.add(pix, value)?;
                    stats.samples += 1;
                }
            }
        }

        debug!(
            rows = height,
            columns = width,
            samples = stats.samples,
            skipped = stats.skipped,
            "Resampled raster"
        );

        Ok(stats)
    }
}
