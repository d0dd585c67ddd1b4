// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Location provider modul
//!
//! Lets a host application plug its own source of device location updates
//! into the location telemetry. A [`LocationProviderRegistry`] holds the one
//! active [`DeviceLocationProvider`]; consumers fetch it with
//! [`LocationProviderRegistry::current`] whenever they need a location.

use common::position::{GnssInformation, GnssPosition};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

pub mod config;
pub mod constant_source;
pub mod gpsd_source;
pub mod noop;
pub mod registry;

mod task;

pub use config::ProviderConfig;
pub use constant_source::ConstantLocationProvider;
pub use gpsd_source::GpsdLocationProvider;
pub use noop::NoopLocationProvider;
pub use registry::{LocationProviderRegistry, RegistryError};

/// Common interface that every device location provider must support.
///
/// A provider owns its own update loop. [`start`](Self::start) and
/// [`stop`](Self::stop) control that loop, the last produced location is
/// always available through [`last_location`](Self::last_location).
pub trait DeviceLocationProvider: Send + Sync {
    /// Short name of the provider, used for logging.
    fn name(&self) -> &str;

    /// Starts producing location updates.
    ///
    /// Calling `start` on a running provider has no effect.
    fn start(&self) -> Result<(), ProviderError>;

    /// Stops producing location updates. The last known location stays
    /// available.
    fn stop(&self);

    fn is_running(&self) -> bool;

    /// The current or last known location, `None` if the provider never
    /// produced one.
    fn last_location(&self) -> Option<GnssPosition>;

    /// Returns a receiver that is notified on every new location.
    fn subscribe(&self) -> watch::Receiver<Option<GnssPosition>>;

    /// Fix status and satellite information, if the provider knows them.
    fn information(&self) -> Option<GnssInformation> {
        None
    }
}

/// Shared handle to an installed provider.
///
/// Holding the handle keeps the provider alive even after the registry
/// replaced it.
pub type LocationProviderPtr = Arc<dyn DeviceLocationProvider>;

/// Errors reported while creating or starting a location provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("No tokio runtime available to run the location provider")]
    NoRuntime,

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid gpsd address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),

    #[error("Position lat: {latitude}, long: {longitude} can't be converted to an UTM zone")]
    Projection { latitude: f64, longitude: f64 },

    #[error("Failed to parse provider configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
