//! Smooth color gradients built from named color stops.
//!
//! Stops are spread evenly over [0, 1] and interpolated linearly in sRGB,
//! which is what matplotlib's `LinearSegmentedColormap.from_list` does.

use ndarray::Array1;

use super::colormap::{lerp_color, Colormap};
use crate::error::{HpxError, Result};

/// Number of entries in a gradient colormap's lookup table
const TABLE_SIZE: usize = 256;

/// A color with floating-point channels in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Rgba {
    pub fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize to 8-bit channels
    pub fn to_rgba8(&self) -> [u8; 4] {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }
}

impl From<colorgrad::Color> for Rgba {
    fn from(c: colorgrad::Color) -> Self {
        Self::new(c.r, c.g, c.b, c.a)
    }
}

/// Build a linear gradient through the given CSS color names or hex codes
pub fn build_gradient<S: AsRef<str>>(stops: &[S]) -> Result<colorgrad::Gradient> {
    if stops.len() < 2 {
        return Err(HpxError::Gradient {
            message: format!("need at least two color stops, got {}", stops.len()),
        });
    }

    let stops: Vec<&str> = stops.iter().map(|s| s.as_ref()).collect();
    colorgrad::CustomGradient::new()
        .html_colors(&stops)
        .build()
        .map_err(|e| HpxError::Gradient {
            message: format!("{} (stops: {})", e, stops.join(", ")),
        })
}

/// Sample a gradient at `count` evenly spaced positions in [0, 1], both ends included
pub fn sample_gradient(gradient: &colorgrad::Gradient, count: usize) -> Vec<Rgba> {
    Array1::linspace(0.0, 1.0, count)
        .iter()
        .map(|&t| Rgba::from(gradient.at(t)))
        .collect()
}

/// Colormap backed by a sampled gradient
pub struct GradientColormap {
    name: String,
    table: Vec<Rgba>,
}

impl GradientColormap {
    /// Tabulate an existing gradient
    pub fn new(name: &str, gradient: &colorgrad::Gradient) -> Self {
        Self {
            name: name.to_string(),
            table: sample_gradient(gradient, TABLE_SIZE),
        }
    }

    /// Tabulate a gradient through the given color stops
    pub fn from_stops<S: AsRef<str>>(name: &str, stops: &[S]) -> Result<Self> {
        Ok(Self::new(name, &build_gradient(stops)?))
    }
}

impl Colormap for GradientColormap {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let last = self.table.len() - 1;
        let position = value.clamp(0.0, 1.0) as f64 * last as f64;
        let index = position.floor() as usize;

        if index >= last {
            return self.table[last].to_rgba8();
        }

        let t = position - index as f64;
        lerp_color(self.table[index], self.table[index + 1], t).to_rgba8()
    }

    fn name(&self) -> &str {
        &self.name
    }
}
