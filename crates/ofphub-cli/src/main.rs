//! ofphub CLI Application
//!
//! Command-line driver for the ofphub flight data pipeline.

mod args;
mod cli;
mod renderer;

use std::time::Duration;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::info;
use ofphub_core::HubBuilder;
use renderer::TerminalRenderer;
use Commands::*;

fn main() -> Result<()> {
    env_logger::init();

    let Args {
        cdm_config,
        default_cdm_config,
        no_cdm,
        timeout,
        no_color,
        command,
    } = Args::parse();

    if let Fields = command {
        cli::list_fields();
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let mut builder = HubBuilder::new()
        .with_cdm_config(cdm_config)
        .with_default_cdm_config(default_cdm_config)
        .with_cdm_disabled(no_cdm);
    if let Some(secs) = timeout {
        builder = builder.with_timeout(Duration::from_secs(secs));
    }
    builder = match &command {
        Ofp(args) => builder
            .with_pilot_id(Some(args.pilot_id.as_str()))
            .with_ofp_format(args.format.into()),
        Watch(args) => builder.with_pilot_id(args.pilot_id.as_deref()),
        _ => builder,
    };

    let hub = builder.build(runtime.handle().clone());
    info!("ofphub started");

    let cli = Cli::new(hub, TerminalRenderer::new(!no_color));
    match command {
        Ofp(_) => cli.fetch_ofp(),
        Cdm(args) => cli.fetch_cdm(&args),
        Watch(args) => cli.watch(&args),
        Servers => {
            cli.list_servers();
            Ok(())
        }
        Fields => Ok(()),
    }
}
