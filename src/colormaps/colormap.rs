//! Colormap trait and utilities.
//!
//! This module defines the common interface for all colormaps used to render
//! map previews.

use super::gradient::{GradientColormap, Rgba};
use crate::error::{HpxError, Result};

/// Trait for color mapping implementations
pub trait Colormap: Send + Sync {
    /// Map a normalized value (0.0 to 1.0) to an RGBA color
    fn map_normalized(&self, value: f32) -> [u8; 4];

    /// Map a value to an RGBA color given the data range
    fn map(&self, value: f32, min: f32, max: f32) -> [u8; 4] {
        let normalized = if max > min {
            ((value - min) / (max - min)).clamp(0.0, 1.0)
        } else {
            0.5
        };
        self.map_normalized(normalized)
    }

    /// Get the name of this colormap
    fn name(&self) -> &str;
}

/// Linear grayscale from black to white
pub struct Gray;

impl Colormap for Gray {
    fn map_normalized(&self, value: f32) -> [u8; 4] {
        let v = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        [v, v, v, 255]
    }

    fn name(&self) -> &str {
        "gray"
    }
}

/// Get a colormap by name
pub fn get_colormap(name: &str) -> Result<Box<dyn Colormap>> {
    let name = name.to_lowercase();
    let gradient = match name.as_str() {
        "gray" | "grey" => return Ok(Box::new(Gray)),
        "viridis" => colorgrad::viridis(),
        "plasma" => colorgrad::plasma(),
        "inferno" => colorgrad::inferno(),
        "magma" => colorgrad::magma(),
        "cividis" => colorgrad::cividis(),
        "turbo" => colorgrad::turbo(),
        "rdbu" => colorgrad::rd_bu(),
        "difference" => {
            return Ok(Box::new(GradientColormap::from_stops(
                "difference",
                &["blue", "white", "red"],
            )?))
        }
        _ => {
            return Err(HpxError::InvalidParameter {
                param: "colormap".to_string(),
                message: format!("Unknown colormap: {}", name),
            })
        }
    };
    Ok(Box::new(GradientColormap::new(&name, &gradient)))
}

/// Linear interpolation between two colors
pub fn lerp_color(c1: Rgba, c2: Rgba, t: f64) -> Rgba {
    Rgba {
        r: c1.r * (1.0 - t) + c2.r * t,
        g: c1.g * (1.0 - t) + c2.g * t,
        b: c1.b * (1.0 - t) + c2.b * t,
        a: c1.a * (1.0 - t) + c2.a * t,
    }
}
