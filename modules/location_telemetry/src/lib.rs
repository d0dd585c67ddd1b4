// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use async_trait::async_trait;
use common::position::{GnssInformation, GnssPosition};
use location_provider::{LocationProviderPtr, LocationProviderRegistry};
use module_core::{EventKind, Module, ModuleCtx};
use std::{sync::Arc, time::Duration};
use tracing::{debug, error, info};

/// The `LocationTelemetry` module samples the active location provider and
/// publishes its locations on the event bus.
///
/// The provider is fetched from the registry on every sample, so a provider
/// installed while the module is running is picked up with the next sample.
/// A location is only published when its coordinate or velocity differs from
/// the last published one.
pub struct LocationTelemetry {
    ctx: ModuleCtx,
    registry: Arc<LocationProviderRegistry>,
    interval: Duration,
    provider_name: Option<String>,
    last_position: Option<GnssPosition>,
    last_information: Option<GnssInformation>,
}

impl LocationTelemetry {
    /// Creates the module.
    ///
    /// # Arguments
    ///
    /// * `ctx` - The module context to publish the location events
    /// * `registry` - The registry the active provider is taken from
    /// * `interval` - The time between two samples, must not be zero
    pub fn new(
        ctx: ModuleCtx,
        registry: Arc<LocationProviderRegistry>,
        interval: Duration,
    ) -> Self {
        LocationTelemetry {
            ctx,
            registry,
            interval,
            provider_name: None,
            last_position: None,
            last_information: None,
        }
    }

    fn on_provider(&mut self, provider: &LocationProviderPtr) {
        if self.provider_name.as_deref() != Some(provider.name()) {
            info!("Sampling location provider {}", provider.name());
            self.provider_name = Some(provider.name().to_owned());
        }
    }

    fn sample(&mut self) {
        let provider = self.registry.current();
        self.on_provider(&provider);

        if let Some(position) = provider.last_location()
            && !self
                .last_position
                .is_some_and(|last| last.same_fix(&position))
        {
            debug!("Publishing location {:?}", position);
            self.last_position = Some(position);
            let _ = self
                .ctx
                .publish_event(EventKind::GnssPositionEvent(Arc::new(position)));
        }

        if let Some(information) = provider.information()
            && self.last_information.as_ref() != Some(&information)
        {
            debug!("Publishing location information {:?}", information);
            self.last_information = Some(information.clone());
            let _ = self
                .ctx
                .publish_event(EventKind::GnssInformationEvent(Arc::new(information)));
        }
    }
}

#[async_trait]
impl Module for LocationTelemetry {
    async fn run(&mut self) -> Result<(), ()> {
        if self.interval.is_zero() {
            error!("LocationTelemetry sample interval must not be zero");
            return Err(());
        }
        let mut timer = tokio::time::interval(self.interval);
        let mut run = true;
        while run {
            tokio::select! {
                _ = timer.tick() => self.sample(),
                event = self.ctx.receiver.recv() => {
                    match event {
                        Ok(event) => {
                            if let EventKind::QuitEvent = event.kind {
                                run = false;
                            }
                        }
                        Err(e) => {
                            error!("Failed to receive event in module LocationTelemetry. Error:{e}");
                        }
                    }
                }
            }
        }
        Ok(())
    }
}
