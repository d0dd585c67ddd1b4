// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    ConstantLocationProvider, GpsdLocationProvider, LocationProviderPtr, NoopLocationProvider,
    ProviderError,
};
use common::position::Position;
use serde::{Deserialize, Serialize};
use std::{sync::Arc, time::Duration};
use tracing::debug;

/// The default gpsd address.
pub const DEFAULT_GPSD_ADDRESS: &str = "127.0.0.1:2947";

fn default_gpsd_address() -> String {
    DEFAULT_GPSD_ADDRESS.to_string()
}

fn default_interval_ms() -> u64 {
    100
}

/// Describes which location provider a host wants to install.
///
/// ```json
/// { "kind": "constant", "velocity": 10.0, "positions": [ { "latitude": 52.0, "longitude": 11.0 } ] }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderConfig {
    /// The provider that never reports a location.
    #[default]
    Noop,
    /// A gpsd daemon reachable over TCP.
    Gpsd {
        #[serde(default = "default_gpsd_address")]
        address: String,
    },
    /// A mock provider travelling along `positions`.
    Constant {
        positions: Vec<Position>,
        velocity: f64,
        #[serde(default = "default_interval_ms")]
        interval_ms: u64,
    },
}

impl ProviderConfig {
    pub fn from_json(json: &str) -> Result<Self, ProviderError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Creates the configured provider. The provider is not started.
    pub fn build(&self) -> Result<LocationProviderPtr, ProviderError> {
        debug!("Creating location provider from {:?}", self);
        let provider: LocationProviderPtr = match self {
            ProviderConfig::Noop => Arc::new(NoopLocationProvider::new()),
            ProviderConfig::Gpsd { address } => Arc::new(GpsdLocationProvider::new(address)?),
            ProviderConfig::Constant {
                positions,
                velocity,
                interval_ms,
            } => Arc::new(ConstantLocationProvider::new(
                positions,
                *velocity,
                Duration::from_millis(*interval_ms),
            )?),
        };
        Ok(provider)
    }
}

