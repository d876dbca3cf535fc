//! hpxtools - HEALPix data preparation tools
//!
//! This is the main entry point for the hpxtools command line.

use std::io::Write;
use std::process::ExitCode;
use tracing::info;

use hpxtools::colormaps::{build_gradient, sample_gradient, ArrayLiteral, LookupTable, Rgba};
use hpxtools::config::Command;
use hpxtools::{dem, init_tracing, log_error, log_timed_operation, Config, Result};

fn main() -> ExitCode {
    // Load configuration
    let (config, command) = match Config::load() {
        Ok(loaded) => loaded,
        Err(e) => {
            init_tracing("info");
            log_error(&e, "configuration");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.log_level);
    info!("Starting hpxtools v{}", env!("CARGO_PKG_VERSION"));

    match run(&config, &command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log_error(&e, command_name(&command));
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config, command: &Command) -> Result<()> {
    config.validate_for(command)?;

    match command {
        Command::Earth(_) => {
            let report = dem::run(config)?;
            info!(
                run_id = %report.run_id,
                map = %report.map_path.display(),
                samples = report.samples,
                empty_pixels = report.empty_pixels,
                "Earth map complete"
            );
        }
        Command::Gradient(_) => {
            let colors = log_timed_operation("gradient", || {
                let gradient = build_gradient(&config.palette.stops)?;
                Ok::<_, hpxtools::HpxError>(sample_gradient(&gradient, config.palette.samples))
            })?;
            print_literal(config, &colors)?;
        }
        Command::Lut(args) => {
            let table = LookupTable::load(&args.table)?;
            print_literal(config, &table.to_colors())?;
        }
    }

    Ok(())
}

fn print_literal(config: &Config, colors: &[Rgba]) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    ArrayLiteral::from(&config.palette).write(&mut out, colors)?;
    out.flush()?;
    Ok(())
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Earth(_) => "earth",
        Command::Gradient(_) => "gradient",
        Command::Lut(_) => "lut",
    }
}
