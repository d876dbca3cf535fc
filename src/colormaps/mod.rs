//! Colormaps and color table export.
//!
//! This module provides the colormaps used for map previews and the
//! samplers that turn gradients or RGB lookup tables into array literals.

pub mod colormap;
pub mod gradient;
pub mod literal;
pub mod lut;

pub use colormap::{get_colormap, Colormap, Gray};
pub use gradient::{build_gradient, sample_gradient, GradientColormap, Rgba};
pub use literal::ArrayLiteral;
pub use lut::LookupTable;
