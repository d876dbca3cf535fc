//! Global colatitude/longitude grid covering the whole tile mosaic.

use ndarray::{s, Array1, ArrayView1};

use super::tiles::TileId;
use crate::config::DemConfig;

/// Sample coordinates of the full mosaic.
///
/// `theta` runs from 0 (north pole) to π over every mosaic row and `phi`
/// from -π to π over every mosaic column, endpoints included.
#[derive(Debug, Clone)]
pub struct CoordinateGrid {
    theta: Array1<f64>,
    phi: Array1<f64>,
    tile_width: usize,
    tile_height: usize,
}

impl CoordinateGrid {
    pub fn new(tile_rows: usize, tile_columns: usize, tile_height: usize, tile_width: usize) -> Self {
        Self {
            theta: Array1::linspace(0.0, std::f64::consts::PI, tile_rows * tile_height),
            phi: Array1::linspace(
                -std::f64::consts::PI,
                std::f64::consts::PI,
                tile_columns * tile_width,
            ),
            tile_width,
            tile_height,
        }
    }

    pub fn from_config(config: &DemConfig) -> Self {
        Self::new(
            config.tile_rows,
            config.tile_columns,
            config.tile_height,
            config.tile_width,
        )
    }

    pub fn theta(&self) -> ArrayView1<'_, f64> {
        self.theta.view()
    }

    pub fn phi(&self) -> ArrayView1<'_, f64> {
        self.phi.view()
    }

    /// Colatitudes of the rows of one tile
    pub fn tile_theta(&self, id: TileId) -> ArrayView1<'_, f64> {
        let start = id.row * self.tile_height;
        self.theta.slice(s![start..start + self.tile_height])
    }

    /// Longitudes of the columns of one tile
    pub fn tile_phi(&self, id: TileId) -> ArrayView1<'_, f64> {
        let start = id.col * self.tile_width;
        self.phi.slice(s![start..start + self.tile_width])
    }
}
