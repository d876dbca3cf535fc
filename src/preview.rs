//! Mollweide preview images of HEALPix maps.

use image::{ImageBuffer, RgbaImage};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

use crate::colormaps::{get_colormap, Colormap};
use crate::config::PreviewConfig;
use crate::error::{HpxError, Result};
use crate::healpix::{is_valid, MapStats, Pixelization};
use crate::logging::{log_operation_end, log_operation_start};

/// Color of pixels without data, outside every gray scale
pub const MISSING_COLOR: [u8; 4] = [255, 0, 255, 255];

/// Color outside the projection ellipse
pub const BACKGROUND: [u8; 4] = [0, 0, 0, 0];

/// Horizontal orientation of the projection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
#[value(rename_all = "lowercase")]
pub enum Flip {
    /// Longitude increases to the right, as on a terrestrial map
    #[default]
    Geo,
    /// Longitude increases to the left, as seen from inside the sphere
    Astro,
}

/// Inverse Mollweide projection of an image pixel center.
///
/// Returns `(theta, phi)` with `phi` in [-π, π] increasing eastward, or
/// `None` outside the ellipse.
pub fn mollweide_inverse(x: u32, y: u32, width: u32, height: u32, flip: Flip) -> Option<(f64, f64)> {
    let u = ((x as f64 + 0.5) / width as f64) * 2.0 - 1.0;
    let v = 1.0 - ((y as f64 + 0.5) / height as f64) * 2.0;
    if u * u + v * v > 1.0 {
        return None;
    }

    // Projection plane coordinates: X in [-2√2, 2√2], Y in [-√2, √2]
    let px = u * 2.0 * SQRT_2;
    let py = v * SQRT_2;

    let aux = (py / SQRT_2).clamp(-1.0, 1.0).asin();
    let lat = ((2.0 * aux + (2.0 * aux).sin()) / PI).clamp(-1.0, 1.0).asin();
    let cos_aux = aux.cos();
    let lon = if cos_aux > 0.0 {
        (PI * px / (2.0 * SQRT_2 * cos_aux)).clamp(-PI, PI)
    } else {
        0.0
    };

    let phi = match flip {
        Flip::Geo => lon,
        Flip::Astro => -lon,
    };
    Some((FRAC_PI_2 - lat, phi))
}

/// Render a full-sky map in Mollweide projection, `width` by `width / 2`
pub fn render_mollweide<P: Pixelization + ?Sized>(
    map: &[f32],
    pixelization: &P,
    bad_data: f32,
    width: u32,
    colormap: &dyn Colormap,
    flip: Flip,
) -> Result<RgbaImage> {
    if map.len() as u64 != pixelization.npix() {
        return Err(HpxError::InvalidParameter {
            param: "map".to_string(),
            message: format!(
                "map has {} pixels, expected {}",
                map.len(),
                pixelization.npix()
            ),
        });
    }
    let height = width / 2;
    if width < 2 {
        return Err(HpxError::InvalidParameter {
            param: "width".to_string(),
            message: format!("preview width must be at least 2, got {}", width),
        });
    }

    let stats = MapStats::compute(map, bad_data);
    let row_bytes = width as usize * 4;
    let mut buffer = vec![0u8; row_bytes * height as usize];

    buffer
        .par_chunks_mut(row_bytes)
        .enumerate()
        .for_each(|(y, row)| {
            for (x, out) in row.chunks_mut(4).enumerate() {
                let color = match mollweide_inverse(x as u32, y as u32, width, height, flip) {
                    None => BACKGROUND,
                    Some((theta, phi)) => {
                        let value = map[pixelization.ang2pix(theta, phi) as usize];
                        if is_valid(value, bad_data) {
                            colormap.map(value, stats.min, stats.max)
                        } else {
                            MISSING_COLOR
                        }
                    }
                };
                out.copy_from_slice(&color);
            }
        });

    ImageBuffer::from_raw(width, height, buffer).ok_or_else(|| HpxError::InvalidParameter {
        param: "width".to_string(),
        message: "image buffer does not match preview dimensions".to_string(),
    })
}

/// Render the preview described by `config` and save it as PNG
pub fn write_preview<P: Pixelization + ?Sized>(
    config: &PreviewConfig,
    map: &[f32],
    pixelization: &P,
    bad_data: f32,
) -> Result<PathBuf> {
    let start = Instant::now();
    let path = config.output_path(pixelization.nside());
    log_operation_start("preview", Some(&path.display().to_string()));

    let colormap = get_colormap(&config.colormap)?;
    let img = render_mollweide(
        map,
        pixelization,
        bad_data,
        config.width,
        colormap.as_ref(),
        config.flip,
    )?;
    save_png(&img, &path)?;

    info!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        colormap = colormap.name(),
        "Preview written"
    );
    log_operation_end("preview", start, true);
    Ok(path)
}

fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    img.save_with_format(path, image::ImageFormat::Png)?;
    Ok(())
}
