//! DEM tile loading.
//!
//! Tiles form a `rows x columns` mosaic. Each one is a single-channel TIFF
//! raster identified by a letter, counted row by row from `A` in the
//! north-west corner.

use ndarray::Array2;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult, Limits};
use tiff::ColorType;
use tracing::{debug, info};

use crate::config::DemConfig;
use crate::error::{HpxError, Result};

/// Position of a tile in the mosaic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TileId {
    /// Row in the mosaic, counted from the north
    pub row: usize,
    /// Column in the mosaic, counted from longitude -180
    pub col: usize,
    columns: usize,
}

impl TileId {
    pub fn new(row: usize, col: usize, columns: usize) -> Self {
        Self { row, col, columns }
    }

    /// Letter naming this tile
    pub fn letter(&self) -> char {
        char::from(b'A' + (self.col + self.columns * self.row) as u8)
    }
}

/// All tiles of a mosaic in loading order (row by row)
pub fn tile_ids(rows: usize, columns: usize) -> Vec<TileId> {
    (0..rows)
        .flat_map(|row| (0..columns).map(move |col| TileId::new(row, col, columns)))
        .collect()
}

/// Elevation samples of one tile, indexed `[row, column]`
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    pub samples: Array2<f32>,
}

/// Load a tile and check it has the configured dimensions
pub fn load_tile(config: &DemConfig, id: TileId) -> Result<Tile> {
    let path = config.tile_path(id.letter());
    let samples = read_raster(&path)?;

    let (height, width) = samples.dim();
    if (height, width) != (config.tile_height, config.tile_width) {
        return Err(HpxError::TileShape {
            tile: id.letter(),
            expected_height: config.tile_height,
            expected_width: config.tile_width,
            height,
            width,
        });
    }

    info!("Sampling tile {}", id.letter());
    Ok(Tile { id, samples })
}

/// Read a single-channel TIFF raster as `f32` samples
pub fn read_raster(path: &Path) -> Result<Array2<f32>> {
    // Check if the file exists
    if !path.exists() {
        return Err(HpxError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("File not found: {}", path.display()),
        )));
    }

    // Full-resolution DEM tiles exceed the decoder's default buffer limit
    let mut decoder =
        Decoder::new(BufReader::new(File::open(path)?))?.with_limits(Limits::unlimited());

    let (width, height) = decoder.dimensions()?;
    let colortype = decoder.colortype()?;
    if !matches!(colortype, ColorType::Gray(_)) {
        return Err(HpxError::UnsupportedRaster {
            path: path.display().to_string(),
            message: format!("expected a single-channel raster, found {:?}", colortype),
        });
    }

    debug!(
        path = %path.display(),
        width = width,
        height = height,
        colortype = ?colortype,
        "Decoding raster"
    );

    let samples: Vec<f32> = match decoder.read_image()? {
        DecodingResult::U8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::U32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::U64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I8(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I16(data) => data.into_iter().map(f32::from).collect(),
        DecodingResult::I32(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::I64(data) => data.into_iter().map(|v| v as f32).collect(),
        DecodingResult::F32(data) => data,
        DecodingResult::F64(data) => data.into_iter().map(|v| v as f32).collect(),
    };

    let array = Array2::from_shape_vec((height as usize, width as usize), samples)?;
    Ok(array)
}
