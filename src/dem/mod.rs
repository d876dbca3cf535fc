//! Earth elevation tiles to HEALPix.
//!
//! The mosaic is read tile by tile, every sample is binned into the nested
//! pixel containing its direction and the pixel mean becomes the map value.

pub mod accumulator;
pub mod grid;
pub mod pipeline;
pub mod resample;
pub mod tiles;

pub use accumulator::{Accumulator, EmptyPixelPolicy};
pub use grid::CoordinateGrid;
pub use pipeline::{accumulate_tiles, run, PipelineReport};
pub use resample::{ResampleStats, Resampler};
pub use tiles::{load_tile, read_raster, tile_ids, Tile, TileId};
