#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that drives the Tanabata energy network.

mod demo;
mod layout_transfer;
mod scatter;

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use layout_transfer::LayoutSnapshot;
use tanabata_system_energy_network::NetworkConfig;
use tanabata_world::{self as world, query, World, DEFAULT_MAP_RADIUS, MAX_MAP_RADIUS};
use tracing::info;
use tracing_subscriber::prelude::*;

/// Command-line arguments accepted by the `tanabata` binary.
#[derive(Debug, Parser)]
#[command(name = "tanabata", about = "Hex-grid energy network playground")]
struct CliArgs {
    /// TOML file overriding the energy network settings.
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    #[command(subcommand)]
    mode: Option<Mode>,
}

#[derive(Debug, Subcommand)]
enum Mode {
    /// Runs a scripted session and prints the resulting network.
    Demo,
    /// Runs the scripted session and prints its layout string.
    Export,
    /// Loads a layout string and prints the network it produces.
    Import {
        /// Layout string produced by `export` or `scatter`.
        layout: String,
    },
    /// Scatters ore veins across an empty map and prints the layout string.
    Scatter {
        /// Radius of the generated map.
        #[arg(
            long,
            default_value_t = DEFAULT_MAP_RADIUS,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_MAP_RADIUS))
        )]
        radius: u32,
        /// Number of veins to place.
        #[arg(long, default_value_t = 12)]
        veins: usize,
        /// Seed for the vein placement.
        #[arg(long, default_value_t = 0)]
        seed: u64,
    },
}

/// Entry point for the Tanabata command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;
    let mut world = World::with_network_config(config);

    match args.mode {
        None => println!("{}", query::welcome_banner(&world)),
        Some(Mode::Demo) => {
            demo::run(&mut world);
            println!("{}", demo::describe(&world));
        }
        Some(Mode::Export) => {
            demo::run(&mut world);
            let layout = LayoutSnapshot::capture(&world)
                .encode()
                .context("failed to encode the demo layout")?;
            println!("{layout}");
        }
        Some(Mode::Import { layout }) => {
            let snapshot =
                LayoutSnapshot::decode(&layout).context("failed to decode layout string")?;
            info!(
                radius = snapshot.radius,
                towers = snapshot.towers.len(),
                veins = snapshot.veins.len(),
                "importing layout"
            );
            let mut events = Vec::new();
            for command in snapshot.into_commands() {
                world::apply(&mut world, command, &mut events);
            }
            println!("{}", demo::describe(&world));
        }
        Some(Mode::Scatter {
            radius,
            veins,
            seed,
        }) => {
            let layout = scatter::scatter(radius, veins, seed)
                .encode()
                .context("failed to encode the scattered layout")?;
            println!("{layout}");
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(path: Option<&Path>) -> Result<NetworkConfig> {
    let Some(path) = path else {
        return Ok(NetworkConfig::default());
    };
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read network config {}", path.display()))?;
    let config: NetworkConfig = toml::from_str(&text)
        .with_context(|| format!("failed to parse network config {}", path.display()))?;
    info!(
        transfer_radius = config.transfer_radius,
        depletion_threshold = config.depletion_threshold,
        reconnect_after_removal = config.reconnect_after_removal,
        "loaded network config"
    );
    Ok(config)
}
