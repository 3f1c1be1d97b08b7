pub mod anonymize;
pub mod cli;
pub mod config;
pub mod data;
pub mod discovery;
pub mod error;
pub mod format;
pub mod frame;
pub mod io_utils;
pub mod join;
pub mod merge;
pub mod normalize;
pub mod preview;
pub mod pseudonymize;
pub mod table;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, info};

use crate::{
    cli::{Cli, Commands, ConfigArgs},
    config::PipelineConfig,
    error::PipelineError,
};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("pnl_merge", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    match cli.command {
        Commands::Anonymize(args) => anonymize::execute(&args),
        Commands::Merge(args) => merge::execute(&args),
        Commands::Preview(args) => preview::execute(&args),
        Commands::Config(args) => handle_config(&args),
    }
}

pub fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<PipelineError>() {
        Some(missing) if missing.is_missing_input() => println!("{missing}"),
        _ => eprintln!("error: {err:#}"),
    }
}

fn handle_config(args: &ConfigArgs) -> Result<()> {
    let config = PipelineConfig::default();
    match &args.output {
        Some(path) => {
            config
                .save(path)
                .with_context(|| format!("Writing pipeline profile to {path:?}"))?;
            info!("Default pipeline profile written to {:?}", path);
        }
        None => print!("{}", config.to_yaml_string()?),
    }
    Ok(())
}
