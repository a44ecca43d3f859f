//! luxd - ArtNet lighting daemon
//!
//! Drives lamps and addressable LED stripes over ArtNet from human
//! readable commands on a message bus, while passively relaying genuine
//! ArtNet traffic seen on the network and yielding to it.

mod bus;
mod config;
mod logging_setup;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use luxd_control::{ArtNetTransport, Fixture, Lamp, LightController, Stripe};
use luxd_core::{Palette, ProgramResolver};

use crate::config::{Config, FixtureConfig};

#[derive(Parser, Debug)]
#[command(name = "luxd", version, about = "ArtNet lighting daemon and passive bridge")]
struct Args {
    /// Path to the configuration file
    #[arg(short, long, default_value = "luxd.toml")]
    config: PathBuf,

    /// Default log level (overridden by RUST_LOG)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging_setup::init(&args.log_level)?;

    let config = Config::load(&args.config)?;
    let palette = Palette::load(&config.palette_file)
        .with_context(|| format!("failed to load palette {}", config.palette_file.display()))?;
    let mut resolver = ProgramResolver::new(palette);
    if let Some(dir) = &config.programs_dir {
        resolver = resolver.with_program_dir(dir);
    }
    let resolver = Arc::new(resolver);

    let transport = ArtNetTransport::new(config.transport_config())?;
    let controller = LightController::new(
        Arc::clone(&resolver),
        config.controller_config(),
        transport,
    );

    for fixture in &config.fixtures {
        let (id, built): (u32, Box<dyn Fixture>) = match fixture {
            FixtureConfig::Lamp {
                id,
                universe,
                address,
                default,
            } => {
                let program = resolver
                    .resolve(default)
                    .with_context(|| format!("default program for fixture {id}"))?;
                (
                    *id,
                    Box::new(Lamp::new(*universe, *address, default.as_str(), program)?),
                )
            }
            FixtureConfig::Stripe {
                id,
                start_universe,
                pixels,
                default,
            } => {
                let program = resolver
                    .resolve_for_stripe(default)
                    .with_context(|| format!("default program for fixture {id}"))?;
                (
                    *id,
                    Box::new(Stripe::new(*start_universe, *pixels, default.as_str(), program)?),
                )
            }
        };
        controller.register(id, built)?;
    }
    info!(fixtures = config.fixtures.len(), "fixture table registered");

    controller.turn_on();
    let ticker = controller.spawn_ticker()?;
    let listener = controller.spawn_listener()?;
    info!("luxd running");

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupt received"),
        result = bus::run(&config.mqtt, controller.clone()) => result?,
    }

    controller.shutdown();
    // Both threads observe the flag within their poll interval.
    let _ = ticker.join();
    let _ = listener.join();
    Ok(())
}
