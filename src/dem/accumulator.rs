//! Per-pixel running sums and sample counts.

use ndarray::{Array1, ArrayView1, Zip};
use serde::{Deserialize, Serialize};

use crate::error::{HpxError, Result};
use crate::healpix::BAD_DATA;

/// Value stored in map pixels that received no samples
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum EmptyPixelPolicy {
    /// HEALPix sentinel `-1.6375e30`, understood by map viewers as missing
    #[default]
    BadData,
    /// IEEE NaN
    Nan,
    /// Zero elevation
    Zero,
}

impl EmptyPixelPolicy {
    pub fn fill_value(&self) -> f32 {
        match self {
            EmptyPixelPolicy::BadData => BAD_DATA,
            EmptyPixelPolicy::Nan => f32::NAN,
            EmptyPixelPolicy::Zero => 0.0,
        }
    }
}

/// Sum and count of the samples that fell into each pixel
#[derive(Debug, Clone, PartialEq)]
pub struct Accumulator {
    sum: Array1<f64>,
    count: Array1<u32>,
}

impl Accumulator {
    /// Zeroed accumulator for `npix` pixels
    pub fn new(npix: usize) -> Self {
        Self {
            sum: Array1::zeros(npix),
            count: Array1::zeros(npix),
        }
    }

    pub fn len(&self) -> usize {
        self.sum.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sum.is_empty()
    }

    /// Add one sample to a pixel
    pub fn add(&mut self, pix: u64, value: f32) -> Result<()> {
        let index = pix as usize;
        if index >= self.len() {
            return Err(HpxError::InvalidParameter {
                param: "pix".to_string(),
                message: format!("pixel {} outside map of {} pixels", pix, self.len()),
            });
        }
        self.sum[index] += value as f64;
        self.count[index] += 1;
        Ok(())
    }

    /// Fold another accumulator of the same size into this one
    pub fn merge(&mut self, other: &Accumulator) -> Result<()> {
        if other.len() != self.len() {
            return Err(HpxError::InvalidParameter {
                param: "accumulator".to_string(),
                message: format!("cannot merge {} pixels into {}", other.len(), self.len()),
            });
        }
        self.sum += &other.sum;
        self.count += &other.count;
        Ok(())
    }

    pub fn sum(&self) -> ArrayView1<'_, f64> {
        self.sum.view()
    }

    pub fn count(&self) -> ArrayView1<'_, u32> {
        self.count.view()
    }

    /// Total number of samples added
    pub fn total_count(&self) -> u64 {
        self.count.iter().map(|&c| c as u64).sum()
    }

    /// Number of pixels with no samples
    pub fn empty_pixels(&self) -> usize {
        self.count.iter().filter(|&&c| c == 0).count()
    }

    /// Mean sample value per pixel, with empty pixels set by `policy`
    pub fn normalize(&self, policy: EmptyPixelPolicy) -> Vec<f32> {
        let fill = policy.fill_value();
        let mut map = Vec::with_capacity(self.len());
        Zip::from(&self.sum).and(&self.count).for_each(|&sum, &count| {
            map.push(if count == 0 {
                fill
            } else {
                (sum / count as f64) as f32
            });
        });
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_normalize() -> Result<()> {
        let mut acc = Accumulator::new(4);
        acc.add(0, 10.0)?;
        acc.add(0, 20.0)?;
        acc.add(2, -5.0)?;

        assert_eq!(acc.count().to_vec(), vec![2, 0, 1, 0]);
        assert_eq!(acc.total_count(), 3);
        assert_eq!(acc.empty_pixels(), 2);

        let map = acc.normalize(EmptyPixelPolicy::Zero);
        assert_eq!(map, vec![15.0, 0.0, -5.0, 0.0]);
        Ok(())
    }

    #[test]
    fn test_empty_pixel_policies() -> Result<()> {
        let mut acc = Accumulator::new(2);
        acc.add(1, 3.0)?;

        assert_eq!(acc.normalize(EmptyPixelPolicy::BadData)[0], BAD_DATA);
        assert!(acc.normalize(EmptyPixelPolicy::Nan)[0].is_nan());
        assert_eq!(acc.normalize(EmptyPixelPolicy::default())[0], BAD_DATA);
        assert_eq!(acc.normalize(EmptyPixelPolicy::Nan)[1], 3.0);
        Ok(())
    }

    #[test]
    fn test_normalize_is_idempotent() -> Result<()> {
        let mut acc = Accumulator::new(3);
        acc.add(1, 7.0)?;
        acc.add(1, 8.0)?;

        let first = acc.normalize(EmptyPixelPolicy::Zero);
        let second = acc.normalize(EmptyPixelPolicy::Zero);
        assert_eq!(first, second);
        assert_eq!(acc.sum()[1], 15.0);
        Ok(())
    }

    #[test]
    fn test_out_of_range_pixel() {
        let mut acc = Accumulator::new(12);
        assert!(matches!(
            acc.add(12, 1.0),
            Err(HpxError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_merge() -> Result<()> {
        let mut a = Accumulator::new(3);
        let mut b = Accumulator::new(3);
        a.add(0, 1.0)?;
        b.add(0, 3.0)?;
        b.add(2, 4.0)?;

        a.merge(&b)?;
        assert_eq!(a.count().to_vec(), vec![2, 0, 1]);
        assert_eq!(a.normalize(EmptyPixelPolicy::Zero), vec![2.0, 0.0, 4.0]);

        assert!(a.merge(&Accumulator::new(4)).is_err());
        Ok(())
    }

    #[test]
    fn test_policy_names() {
        let policy: EmptyPixelPolicy = serde_json::from_str("\"bad_data\"").unwrap();
        assert_eq!(policy, EmptyPixelPolicy::BadData);
        let policy: EmptyPixelPolicy = serde_json::from_str("\"nan\"").unwrap();
        assert_eq!(policy, EmptyPixelPolicy::Nan);
    }
}
