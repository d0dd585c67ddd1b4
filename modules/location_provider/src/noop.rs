// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{DeviceLocationProvider, ProviderError};
use common::position::GnssPosition;
use tokio::sync::watch;

/// The provider a registry is bound to before the host installs its own.
///
/// It never produces a location. `start` and `stop` succeed but do nothing,
/// so consumers can always call into the current provider.
pub struct NoopLocationProvider {
    position: watch::Sender<Option<GnssPosition>>,
}

impl NoopLocationProvider {
    pub fn new() -> Self {
        let (position, _) = watch::channel(None);
        NoopLocationProvider { position }
    }
}

impl Default for NoopLocationProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl DeviceLocationProvider for NoopLocationProvider {
    fn name(&self) -> &str {
        "noop"
    }

    fn start(&self) -> Result<(), ProviderError> {
        Ok(())
    }

    fn stop(&self) {}

    fn is_running(&self) -> bool {
        false
    }

    fn last_location(&self) -> Option<GnssPosition> {
        None
    }

    fn subscribe(&self) -> watch::Receiver<Option<GnssPosition>> {
        self.position.subscribe()
    }
}
