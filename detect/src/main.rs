use anyhow::{Context, Result};
use clap::Parser;
use detect::config::Config;
use log::LevelFilter;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Parser)]
/// Count objects found by detectors and score them against ground truth counts
struct Args {
    #[clap(long, default_value = "detect.json5")]
    /// configuration file
    pub config_file: PathBuf,
}

fn main() -> Result<()> {
    // setup logger
    {
        let mut builder = pretty_env_logger::formatted_builder();
        match env::var("RUST_LOG") {
            Ok(filters) => builder.parse_filters(&filters),
            Err(_) => builder.filter_level(LevelFilter::Info),
        };
        builder.init();
    }

    // parse arguments
    let Args { config_file } = Args::parse();
    let config = Config::open(&config_file)
        .with_context(|| format!("failed to load config file '{}'", config_file.display()))?;

    // score detectors
    let runs = detect::start(&config)?;
    for (detector, run) in config.detectors.iter().zip(&runs) {
        let num_failures = run.num_failures();
        if num_failures > 0 {
            log::warn!(
                "detector '{}' failed on {} images",
                detector.name,
                num_failures
            );
        }
    }

    Ok(())
}
