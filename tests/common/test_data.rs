//! Test data generation utilities.
//!
//! This module writes small DEM tile mosaics and lookup tables with known
//! values so that the tools can be run end to end in a temporary directory.

use hpxtools::config::{Config, DemConfig, PreviewConfig};
use hpxtools::dem::{tile_ids, TileId};
use std::fs::File;
use std::path::Path;
use tiff::encoder::{colortype, TiffEncoder};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Tile width used by the small test mosaics
pub const TILE_WIDTH: usize = 9;

/// Tile height used by the small test mosaics
pub const TILE_HEIGHT: usize = 7;

/// Configuration for a 6x4 mosaic of small tiles, writing into `dir`
pub fn small_config(dir: &Path, nside: u32) -> Config {
    Config {
        dem: DemConfig {
            nside,
            tile_width: TILE_WIDTH,
            tile_height: TILE_HEIGHT,
            tile_dir: dir.to_path_buf(),
            output: dir.join("earth-{nside}.fits").to_string_lossy().into_owned(),
            ..Default::default()
        },
        preview: PreviewConfig {
            width: 64,
            output: dir.join("earth-{nside}.png").to_string_lossy().into_owned(),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Write an unsigned 16-bit single-channel tile
pub fn write_u16_tile(path: &Path, width: usize, height: usize, data: &[u16]) -> Result<()> {
    let mut file = File::create(path)?;
    TiffEncoder::new(&mut file)?.write_image::<colortype::Gray16>(
        width as u32,
        height as u32,
        data,
    )?;
    Ok(())
}

/// Write a 32-bit float single-channel tile
pub fn write_f32_tile(path: &Path, width: usize, height: usize, data: &[f32]) -> Result<()> {
    let mut file = File::create(path)?;
    TiffEncoder::new(&mut file)?.write_image::<colortype::Gray32Float>(
        width as u32,
        height as u32,
        data,
    )?;
    Ok(())
}

/// Fill every tile of the mosaic with one elevation
pub fn create_constant_mosaic(config: &DemConfig, value: u16) -> Result<()> {
    let data = vec![value; config.tile_width * config.tile_height];
    for id in tile_ids(config.tile_rows, config.tile_columns) {
        write_u16_tile(
            &config.tile_path(id.letter()),
            config.tile_width,
            config.tile_height,
            &data,
        )?;
    }
    Ok(())
}

/// Integer elevations that differ per tile and per sample
pub fn create_varied_mosaic(config: &DemConfig) -> Result<()> {
    for id in tile_ids(config.tile_rows, config.tile_columns) {
        let data: Vec<u16> = (0..config.tile_width * config.tile_height)
            .map(|i| (tile_index(config, id) * 1000 + i * 7 % 500) as u16)
            .collect();
        write_u16_tile(
            &config.tile_path(id.letter()),
            config.tile_width,
            config.tile_height,
            &data,
        )?;
    }
    Ok(())
}

/// Fractional elevations, including below sea level
pub fn create_float_mosaic(config: &DemConfig) -> Result<()> {
    for id in tile_ids(config.tile_rows, config.tile_columns) {
        let offset = tile_index(config, id) as f32;
        let data: Vec<f32> = (0..config.tile_width * config.tile_height)
            .map(|i| (i as f32 * 0.731 - 20.0) * (offset + 1.0) / 3.0)
            .collect();
        write_f32_tile(
            &config.tile_path(id.letter()),
            config.tile_width,
            config.tile_height,
            &data,
        )?;
    }
    Ok(())
}

/// Write a lookup table file, one `r g b` row per entry
pub fn write_lut(path: &Path, rows: &[[u8; 3]]) -> Result<()> {
    let text: String = rows
        .iter()
        .map(|[r, g, b]| format!("{} {} {}\n", r, g, b))
        .collect();
    std::fs::write(path, text)?;
    Ok(())
}

fn tile_index(config: &DemConfig, id: TileId) -> usize {
    id.row * config.tile_columns + id.col
}
