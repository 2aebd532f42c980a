//! Logging initialisation.
//!
//! Logs go to stderr so that stdout stays free for the filter pipe and the
//! table output. `RUST_LOG` still overrides the verbosity chosen here.

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Map the `-v` count to a level: warnings by default, `-v` debug, `-vv` trace.
pub fn level_for(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

pub fn init_logging(verbose: u8) -> Result<()> {
    let level = level_for(verbose);
    Builder::new()
        .target(Target::Stderr)
        .filter_level(level)
        .format_timestamp_secs()
        .format_module_path(false)
        .parse_default_env()
        .try_init()
        .context("Failed to initialize logger")?;
    log::debug!("logging initialized with level: {:?}", level);
    Ok(())
}
