// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use async_trait::async_trait;
use clap::{CommandFactory, Parser};
use common::position::Position;
use location_provider::{
    LocationProviderRegistry, ProviderConfig, config::DEFAULT_GPSD_ADDRESS,
};
use location_telemetry::LocationTelemetry;
use module_core::{Event, EventBus, EventKind, Module, ModuleCtx};
use std::{str::FromStr, sync::Arc, time::Duration};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Use a gpsd daemon as location provider
    #[arg(short = 'd', long)]
    gpsd: bool,
    #[arg(long, default_value = DEFAULT_GPSD_ADDRESS)]
    gpsd_address: String,
    /// Use a fake location provider travelling along the points of `gps_source_file`
    #[arg(short, long)]
    gps_fake: bool,
    /// CSV file with longitude,latitude rows
    #[arg(short = 'f', long)]
    gps_source_file: Option<String>,
    /// Velocity of the fake location provider in m/s
    #[arg(long, default_value_t = 10.0)]
    velocity: f64,
    /// JSON provider configuration, overrides the other provider options
    #[arg(short, long)]
    config: Option<String>,
    #[arg(long, default_value_t = 1000)]
    sample_interval_ms: u64,
}

fn read_track_points_from_file(file_path: &str) -> Result<Vec<Position>, ()> {
    let mut rdr = csv::Reader::from_path(file_path).map_err(|e| {
        error!("Failed to open {}. Error: {}", file_path, e);
    })?;
    let mut positions = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            error!("Failed to read record from {}. Error: {}", file_path, e);
        })?;
        let (Some(longitude), Some(latitude)) = (record.get(0), record.get(1)) else {
            error!("Record {:?} has less than two columns", record);
            return Err(());
        };
        let (Ok(longitude), Ok(latitude)) = (f64::from_str(longitude), f64::from_str(latitude))
        else {
            error!("Record {:?} is not a valid position", record);
            return Err(());
        };
        positions.push(Position {
            longitude,
            latitude,
        });
    }
    debug!("length of positions: {}", positions.len());
    Ok(positions)
}

fn read_config_file(file_path: &str) -> Result<ProviderConfig, ()> {
    let json = std::fs::read_to_string(file_path).map_err(|e| {
        error!("Failed to read provider configuration {}. Error: {}", file_path, e);
    })?;
    ProviderConfig::from_json(&json).map_err(|e| {
        error!("Invalid provider configuration {}. Error: {}", file_path, e);
    })
}

fn provider_config(cli: &Cli) -> Result<ProviderConfig, ()> {
    if let Some(config) = &cli.config {
        read_config_file(config)
    } else if cli.gpsd {
        Ok(ProviderConfig::Gpsd {
            address: cli.gpsd_address.clone(),
        })
    } else if cli.gps_fake {
        let Some(source_file) = &cli.gps_source_file else {
            error!("Failed to create fake location provider. Error: gps_source_file not set");
            let _ = Cli::command().print_help();
            return Err(());
        };
        Ok(ProviderConfig::Constant {
            positions: read_track_points_from_file(source_file)?,
            velocity: cli.velocity,
            interval_ms: 100,
        })
    } else {
        error!("No location provider specified. Use --gpsd, --gps-fake or --config");
        let _ = Cli::command().print_help();
        Err(())
    }
}

/// Logs every location the telemetry publishes.
struct LocationLogger {
    ctx: ModuleCtx,
}

#[async_trait]
impl Module for LocationLogger {
    async fn run(&mut self) -> Result<(), ()> {
        loop {
            match self.ctx.receiver.recv().await {
                Ok(event) => match event.kind {
                    EventKind::QuitEvent => return Ok(()),
                    EventKind::GnssPositionEvent(position) => info!(
                        "Location lat: {}, long: {}, velocity: {}",
                        position.latitude(),
                        position.longitude(),
                        position.velocity()
                    ),
                    EventKind::GnssInformationEvent(information) => info!(
                        "Fix {:?} with {} satellites",
                        information.status, information.satellites
                    ),
                },
                Err(e) => error!("Failed to receive event in LocationLogger. Error:{e}"),
            }
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), ()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let provider = provider_config(&cli)?.build().map_err(|e| {
        error!("Failed to create location provider. Error: {}", e);
    })?;
    provider.start().map_err(|e| {
        error!("Failed to start location provider. Error: {}", e);
    })?;
    let registry = Arc::new(LocationProviderRegistry::new());
    registry.install(provider.clone());

    let eb = EventBus::default();
    let quit_sender = eb.sender();
    ctrlc::set_handler(move || {
        let _ = quit_sender.send(Event {
            kind: EventKind::QuitEvent,
        });
    })
    .map_err(|e| {
        error!("Failed to install Ctrl-C handler. Error: {}", e);
    })?;

    let mut telemetry = LocationTelemetry::new(
        eb.context(),
        registry.clone(),
        Duration::from_millis(cli.sample_interval_ms),
    );
    let mut logger = LocationLogger { ctx: eb.context() };

    info!("Starting modules...");
    let (telemetry_result, logger_result) = tokio::join!(telemetry.run(), logger.run());
    registry.current().stop();
    info!("Stopped location provider {}", provider.name());
    telemetry_result.and(logger_result)
}
