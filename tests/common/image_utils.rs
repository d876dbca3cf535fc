//! Image utilities for testing previews.

use image::{DynamicImage, GenericImageView, ImageError};
use std::path::Path;

/// Load an image from a file
pub fn load_image(path: &Path) -> Result<DynamicImage, ImageError> {
    image::open(path)
}

/// Count pixels of exactly the given RGBA color
pub fn count_pixels(img: &DynamicImage, color: [u8; 4]) -> usize {
    img.pixels().filter(|(_, _, p)| p.0 == color).count()
}

/// Count fully transparent pixels
pub fn count_transparent(img: &DynamicImage) -> usize {
    img.pixels().filter(|(_, _, p)| p.0[3] == 0).count()
}
