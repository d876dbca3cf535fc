//! End-to-end conversion of a DEM tile mosaic into a HEALPix map.

use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, warn};

use super::accumulator::Accumulator;
use super::grid::CoordinateGrid;
use super::resample::{ResampleStats, Resampler};
use super::tiles::{load_tile, tile_ids, TileId};
use crate::config::{Config, DemConfig};
use crate::error::{HpxError, Result};
use crate::healpix::{write_map, MapHeader, NestedGrid, Pixelization};
use crate::logging::{
    generate_run_id, log_error, log_operation_end, log_operation_start, log_resample_stats,
};
use crate::preview::write_preview;

/// Outcome of a conversion run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub run_id: String,
    pub map_path: PathBuf,
    /// Set when a preview image was written
    pub preview_path: Option<PathBuf>,
    pub tiles: usize,
    pub samples: u64,
    pub skipped: u64,
    pub npix: usize,
    pub empty_pixels: usize,
}

/// Bin the samples of the given tiles into a fresh accumulator.
///
/// Tiles are loaded one at a time, so only a single raster is held in
/// memory. The result does not depend on the order of `tiles` up to
/// floating-point summation order.
pub fn accumulate_tiles<P: Pixelization + ?Sized>(
    dem: &DemConfig,
    pixelization: &P,
    tiles: &[TileId],
) -> Result<(Accumulator, ResampleStats)> {
    let grid = CoordinateGrid::from_config(dem);
    let resampler = Resampler::new(pixelization).with_skip_non_finite(dem.skip_non_finite);
    let mut acc = Accumulator::new(pixelization.npix() as usize);
    let mut stats = ResampleStats::default();

    for &id in tiles {
        let tile = load_tile(dem, id)?;
        stats += resampler.resample_tile(
            tile.samples.view(),
            grid.tile_theta(id),
            grid.tile_phi(id),
            &mut acc,
        )?;
    }

    Ok((acc, stats))
}

/// Convert the configured mosaic, write the map and optionally a preview
pub fn run(config: &Config) -> Result<PipelineReport> {
    let start = Instant::now();
    let run_id = generate_run_id();
    let dem = &config.dem;

    log_operation_start(
        "earth",
        Some(&format!(
            "nside={} tiles={}x{} dir={}",
            dem.nside,
            dem.tile_columns,
            dem.tile_rows,
            dem.tile_dir.display()
        )),
    );

    let grid = NestedGrid::new(dem.nside)?;
    let tiles = tile_ids(dem.tile_rows, dem.tile_columns);

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(workers) = dem.workers {
        builder = builder.num_threads(workers);
    }
    let pool = builder.build().map_err(|e| HpxError::Config {
        message: format!("Failed to build worker pool: {}", e),
    })?;
    info!(
        run_id = %run_id,
        workers = pool.current_num_threads(),
        npix = grid.npix(),
        "Resampling tiles"
    );

    let (acc, stats) = pool.install(|| accumulate_tiles(dem, &grid, &tiles))?;

    let map = acc.normalize(dem.empty_pixels);
    let empty_pixels = acc.empty_pixels();
    drop(acc);

    log_resample_stats(
        &run_id,
        tiles.len(),
        stats.samples,
        stats.skipped,
        map.len(),
        empty_pixels,
    );
    if empty_pixels > 0 {
        warn!(
            empty_pixels = empty_pixels,
            fill = ?dem.empty_pixels,
            "Some pixels received no samples"
        );
    }

    let map_path = dem.output_path();
    let header = MapHeader::nested(dem.nside, &dem.column_name, &dem.unit);
    write_map(&map_path, &map, &header)?;
    info!(path = %map_path.display(), nside = dem.nside, "Map written");

    let preview_path = if config.preview.enabled {
        match pool.install(|| write_preview(&config.preview, &map, &grid, header.bad_data)) {
            Ok(path) => Some(path),
            Err(e) => {
                log_error(&e, "preview");
                None
            }
        }
    } else {
        None
    };

    log_operation_end("earth", start, true);

    Ok(PipelineReport {
        run_id,
        map_path,
        preview_path,
        tiles: tiles.len(),
        samples: stats.samples,
        skipped: stats.skipped,
        npix: map.len(),
        empty_pixels,
    })
}
