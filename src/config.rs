//! Configuration management for hpxtools.
//!
//! This module handles the layered configuration system with the following precedence:
//! 1. Command-line arguments (highest priority)
//! 2. Environment variables
//! 3. JSON config file
//! 4. Default values (lowest priority)
//!
//! The defaults reproduce the reference Earth dataset: a 6x4 mosaic of
//! 14401x10801 tiles resampled to nside 8192.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::dem::EmptyPixelPolicy;
use crate::error::{HpxError, Result};
use crate::healpix::MAX_NSIDE;
use crate::preview::Flip;

/// Command-line arguments for hpxtools
#[derive(Parser, Debug)]
#[command(name = "hpxtools")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to JSON configuration file
    #[arg(short, long, env = "HPXTOOLS_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "HPXTOOLS_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Tool to run
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Resample the tiled Earth DEM into a nested HEALPix map
    Earth(EarthArgs),
    /// Print a color gradient sampled at evenly spaced points as an array literal
    Gradient(GradientArgs),
    /// Print an RGB lookup table as an array literal
    Lut(LutArgs),
}

/// Overrides for the DEM pipeline
#[derive(clap::Args, Debug, Clone, Default)]
pub struct EarthArgs {
    /// HEALPix resolution parameter (power of two)
    #[arg(long, env = "HPXTOOLS_NSIDE")]
    pub nside: Option<u32>,

    /// Directory holding the DEM tiles
    #[arg(long, env = "HPXTOOLS_TILE_DIR")]
    pub tile_dir: Option<PathBuf>,

    /// Output map path; `{nside}` is replaced by the resolution
    #[arg(short, long)]
    pub output: Option<String>,

    /// Number of worker threads used for pixel indexing
    #[arg(short, long, env = "HPXTOOLS_WORKERS")]
    pub workers: Option<usize>,

    /// Value written to pixels that received no samples
    #[arg(long, value_enum)]
    pub empty_pixels: Option<EmptyPixelPolicy>,

    /// Leave NaN and infinite samples out instead of propagating them
    #[arg(long, env = "HPXTOOLS_SKIP_NON_FINITE")]
    pub skip_non_finite: bool,

    /// Longitude orientation of the preview
    #[arg(long, value_enum)]
    pub flip: Option<Flip>,

    /// Skip rendering the preview image
    #[arg(long)]
    pub no_preview: bool,
}

/// Overrides for the gradient sampler
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GradientArgs {
    /// Color stops (CSS names or hex codes), evenly spaced over [0, 1]
    pub stops: Vec<String>,

    /// Number of samples
    #[arg(short = 'n', long)]
    pub samples: Option<usize>,

    /// Name of the emitted array
    #[arg(long)]
    pub name: Option<String>,
}

/// Arguments for the lookup-table sampler
#[derive(clap::Args, Debug, Clone)]
pub struct LutArgs {
    /// Whitespace-delimited table of red/green/blue values in [0, 255]
    pub table: PathBuf,

    /// Name of the emitted array
    #[arg(long)]
    pub name: Option<String>,
}

/// DEM resampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemConfig {
    /// HEALPix resolution of the output map
    #[serde(default = "default_nside")]
    pub nside: u32,

    /// Number of tile columns in the mosaic (longitude direction)
    #[serde(default = "default_tile_columns")]
    pub tile_columns: usize,

    /// Number of tile rows in the mosaic (colatitude direction)
    #[serde(default = "default_tile_rows")]
    pub tile_rows: usize,

    /// Samples per tile row
    #[serde(default = "default_tile_width")]
    pub tile_width: usize,

    /// Sample rows per tile
    #[serde(default = "default_tile_height")]
    pub tile_height: usize,

    /// Directory holding the tiles
    #[serde(default = "default_tile_dir")]
    pub tile_dir: PathBuf,

    /// Tile file name pattern; `{tile}` is replaced by the tile letter
    #[serde(default = "default_tile_pattern")]
    pub tile_pattern: String,

    /// Output map path; `{nside}` is replaced by the resolution
    #[serde(default = "default_map_output")]
    pub output: String,

    /// Value written to pixels that received no samples
    #[serde(default)]
    pub empty_pixels: EmptyPixelPolicy,

    /// Leave non-finite samples out of the pixel means
    #[serde(default)]
    pub skip_non_finite: bool,

    /// Worker threads for pixel indexing (None = number of CPU cores)
    #[serde(default)]
    pub workers: Option<usize>,

    /// Column name recorded in the map file
    #[serde(default = "default_column_name")]
    pub column_name: String,

    /// Physical unit recorded in the map file
    #[serde(default = "default_unit")]
    pub unit: String,
}

/// Preview rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    /// Whether to render a preview after writing the map
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Image width in pixels (height is half of it)
    #[serde(default = "default_preview_width")]
    pub width: u32,

    /// Colormap name
    #[serde(default = "default_preview_colormap")]
    pub colormap: String,

    /// Longitude orientation
    #[serde(default)]
    pub flip: Flip,

    /// Output image path; `{nside}` is replaced by the resolution
    #[serde(default = "default_preview_output")]
    pub output: String,
}

/// Color table export configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    /// Gradient color stops
    #[serde(default = "default_stops")]
    pub stops: Vec<String>,

    /// Number of gradient samples
    #[serde(default = "default_samples")]
    pub samples: usize,

    /// Name of the emitted array
    #[serde(default = "default_array_name")]
    pub array_name: String,

    /// Element constructor wrapped around each color
    #[serde(default = "default_element")]
    pub element: String,
}

/// Complete configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// DEM pipeline configuration
    #[serde(default)]
    pub dem: DemConfig,

    /// Preview configuration
    #[serde(default)]
    pub preview: PreviewConfig,

    /// Color table configuration
    #[serde(default)]
    pub palette: PaletteConfig,

    /// Log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Config {
    /// Load configuration from all sources with proper precedence
    pub fn load() -> Result<(Self, Command)> {
        let args = Args::parse();

        // Start with defaults
        let mut config = Config::default();

        // Load from JSON file if provided
        if let Some(config_path) = &args.config {
            let json_config = Self::load_from_file(config_path)?;
            config.merge(json_config);
        }

        // Override with command-line arguments
        if let Some(log_level) = args.log_level {
            config.log_level = log_level;
        }
        config.apply_overrides(&args.command);

        Ok((config, args.command))
    }

    /// Load configuration from a JSON file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Merge another config into this one (other takes precedence)
    fn merge(&mut self, other: Config) {
        self.dem = other.dem;
        self.preview = other.preview;
        self.palette = other.palette;
        self.log_level = other.log_level;
    }

    /// Apply the subcommand's explicit arguments on top of this config
    pub fn apply_overrides(&mut self, command: &Command) {
        match command {
            Command::Earth(args) => {
                if let Some(nside) = args.nside {
                    self.dem.nside = nside;
                }
                if let Some(tile_dir) = &args.tile_dir {
                    self.dem.tile_dir = tile_dir.clone();
                }
                if let Some(output) = &args.output {
                    self.dem.output = output.clone();
                }
                if args.workers.is_some() {
                    self.dem.workers = args.workers;
                }
                if let Some(policy) = args.empty_pixels {
                    self.dem.empty_pixels = policy;
                }
                if args.skip_non_finite {
                    self.dem.skip_non_finite = true;
                }
                if let Some(flip) = args.flip {
                    self.preview.flip = flip;
                }
                if args.no_preview {
                    self.preview.enabled = false;
                }
            }
            Command::Gradient(args) => {
                if !args.stops.is_empty() {
                    self.palette.stops = args.stops.clone();
                }
                if let Some(samples) = args.samples {
                    self.palette.samples = samples;
                }
                if let Some(name) = &args.name {
                    self.palette.array_name = name.clone();
                }
            }
            Command::Lut(args) => {
                if let Some(name) = &args.name {
                    self.palette.array_name = name.clone();
                }
            }
        }
    }

    /// Validate the sections the given tool reads
    pub fn validate_for(&self, command: &Command) -> Result<()> {
        match command {
            Command::Earth(_) => {
                self.dem.validate()?;
                if self.preview.enabled {
                    self.preview.validate()?;
                }
            }
            Command::Gradient(_) => self.palette.validate()?,
            Command::Lut(_) => self.palette.validate_name()?,
        }

        // Validate log level
        match self.log_level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(HpxError::Config {
                    message: format!(
                        "Invalid log level: {}. Must be one of: trace, debug, info, warn, error",
                        self.log_level
                    ),
                });
            }
        }

        Ok(())
    }
}

impl DemConfig {
    /// Total number of tiles in the mosaic
    pub fn tile_count(&self) -> usize {
        self.tile_rows * self.tile_columns
    }

    /// Path of the tile with the given letter
    pub fn tile_path(&self, letter: char) -> PathBuf {
        self.tile_dir
            .join(self.tile_pattern.replace("{tile}", &letter.to_string()))
    }

    /// Path of the output map for the configured resolution
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(self.output.replace("{nside}", &self.nside.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.nside == 0 || !self.nside.is_power_of_two() || self.nside > MAX_NSIDE {
            return Err(HpxError::Config {
                message: format!(
                    "Invalid nside: {}. Must be a power of two between 1 and {}",
                    self.nside, MAX_NSIDE
                ),
            });
        }

        if self.tile_count() == 0 {
            return Err(HpxError::Config {
                message: "Tile grid must have at least one row and one column".to_string(),
            });
        }

        // Tiles are named by a single letter
        if self.tile_count() > 26 {
            return Err(HpxError::Config {
                message: format!(
                    "Tile grid {}x{} has more tiles than letters A-Z",
                    self.tile_columns, self.tile_rows
                ),
            });
        }

        if self.tile_width == 0 || self.tile_height == 0 {
            return Err(HpxError::Config {
                message: "Tile dimensions cannot be zero".to_string(),
            });
        }

        if !self.tile_pattern.contains("{tile}") {
            return Err(HpxError::Config {
                message: format!(
                    "Tile pattern '{}' must contain the {{tile}} placeholder",
                    self.tile_pattern
                ),
            });
        }

        if self.workers == Some(0) {
            return Err(HpxError::Config {
                message: "Worker count cannot be 0".to_string(),
            });
        }

        Ok(())
    }
}

impl PreviewConfig {
    /// Path of the preview image for the given resolution
    pub fn output_path(&self, nside: u32) -> PathBuf {
        PathBuf::from(self.output.replace("{nside}", &nside.to_string()))
    }

    fn validate(&self) -> Result<()> {
        if self.width < 2 {
            return Err(HpxError::Config {
                message: format!("Preview width must be at least 2, got {}", self.width),
            });
        }

        crate::colormaps::get_colormap(&self.colormap).map_err(|e| HpxError::Config {
            message: e.to_string(),
        })?;

        Ok(())
    }
}

impl PaletteConfig {
    fn validate_name(&self) -> Result<()> {
        if self.array_name.trim().is_empty() {
            return Err(HpxError::Config {
                message: "Array name cannot be empty".to_string(),
            });
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.stops.len() < 2 {
            return Err(HpxError::Config {
                message: format!(
                    "A gradient needs at least two color stops, got {}",
                    self.stops.len()
                ),
            });
        }

        if self.samples == 0 {
            return Err(HpxError::Config {
                message: "Sample count cannot be 0".to_string(),
            });
        }

        self.validate_name()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dem: DemConfig::default(),
            preview: PreviewConfig::default(),
            palette: PaletteConfig::default(),
            log_level: default_log_level(),
        }
    }
}

impl Default for DemConfig {
    fn default() -> Self {
        Self {
            nside: default_nside(),
            tile_columns: default_tile_columns(),
            tile_rows: default_tile_rows(),
            tile_width: default_tile_width(),
            tile_height: default_tile_height(),
            tile_dir: default_tile_dir(),
            tile_pattern: default_tile_pattern(),
            output: default_map_output(),
            empty_pixels: EmptyPixelPolicy::default(),
            skip_non_finite: false,
            workers: None,
            column_name: default_column_name(),
            unit: default_unit(),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            width: default_preview_width(),
            colormap: default_preview_colormap(),
            flip: Flip::default(),
            output: default_preview_output(),
        }
    }
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            stops: default_stops(),
            samples: default_samples(),
            array_name: default_array_name(),
            element: default_element(),
        }
    }
}

// Default value functions for serde
fn default_nside() -> u32 {
    4 * 2048
}

fn default_tile_columns() -> usize {
    6
}

fn default_tile_rows() -> usize {
    4
}

fn default_tile_width() -> usize {
    14401
}

fn default_tile_height() -> usize {
    10801
}

fn default_tile_dir() -> PathBuf {
    PathBuf::from("tiles")
}

fn default_tile_pattern() -> String {
    "15-{tile}.tif".to_string()
}

fn default_map_output() -> String {
    "earth-{nside}.fits".to_string()
}

fn default_column_name() -> String {
    "ELEVATION".to_string()
}

fn default_unit() -> String {
    "m".to_string()
}

fn default_true() -> bool {
    true
}

fn default_preview_width() -> u32 {
    2000
}

fn default_preview_colormap() -> String {
    "gray".to_string()
}

fn default_preview_output() -> String {
    "earth-{nside}.png".to_string()
}

fn default_stops() -> Vec<String> {
    vec!["blue".to_string(), "white".to_string(), "red".to_string()]
}

fn default_samples() -> usize {
    256
}

fn default_array_name() -> String {
    "xxx".to_string()
}

fn default_element() -> String {
    "SIMD4<Float>".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}
