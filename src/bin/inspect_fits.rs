use anyhow::{bail, Context};
use std::path::PathBuf;

use hpxtools::healpix::{nside2npix, read_map, MapStats};

fn main() -> anyhow::Result<()> {
    // Path to the FITS map
    let Some(file_path) = std::env::args_os().nth(1).map(PathBuf::from) else {
        bail!("usage: inspect_fits <map.fits>");
    };

    println!("Inspecting HEALPix map: {}", file_path.display());

    let map = read_map(&file_path)
        .with_context(|| format!("Failed to read {}", file_path.display()))?;

    // HEALPix keywords of the table extension
    println!("\n=== HEADER ===");
    for (keyword, value) in &map.cards {
        println!("  {:<8} = {}", keyword, value);
    }

    let header = &map.header;
    println!("\n=== MAP ===");
    println!("  nside    = {}", header.nside);
    println!("  npix     = {}", nside2npix(header.nside));
    println!("  ordering = {}", header.ordering);
    println!("  column   = {} [{}]", header.column_name, header.unit);
    println!("  bad_data = {:E}", header.bad_data);

    let stats = MapStats::compute(&map.data, header.bad_data);
    println!("\n=== STATISTICS ===");
    println!("  valid pixels = {}", stats.valid);
    println!("  bad pixels   = {}", stats.bad);
    if stats.valid > 0 {
        println!("  min          = {}", stats.min);
        println!("  max          = {}", stats.max);
        println!("  mean         = {}", stats.mean);
    }

    println!("\nSample Data Values:");
    let shown = map.data.len().min(8);
    println!("  {:?}", &map.data[..shown]);

    Ok(())
}
