// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{GnssPosition, Position};
use location_provider::{
    ConstantLocationProvider, DeviceLocationProvider, LocationProviderPtr,
    LocationProviderRegistry, NoopLocationProvider, RegistryError,
};
use std::{
    sync::{Arc, Barrier},
    time::Duration,
};

fn constant_provider() -> LocationProviderPtr {
    Arc::new(
        ConstantLocationProvider::new(
            &[Position::new(&52.026649, &11.282535)],
            1.0,
            Duration::from_millis(10),
        )
        .expect("Failed to create constant provider"),
    )
}

#[test]
pub fn default_provider_before_any_install() {
    let registry = LocationProviderRegistry::new();
    let provider = registry.current();
    assert!(registry.is_default());
    assert_eq!(provider.name(), "noop");
    assert!(provider.last_location().is_none());
    assert!(provider.start().is_ok());
    provider.stop();
}

#[test]
pub fn current_returns_last_installed_provider() {
    let registry = LocationProviderRegistry::new();
    let providers: Vec<LocationProviderPtr> = vec![
        Arc::new(NoopLocationProvider::new()),
        constant_provider(),
        Arc::new(NoopLocationProvider::new()),
    ];
    for provider in providers.iter() {
        registry.install(provider.clone());
    }
    assert!(Arc::ptr_eq(&registry.current(), providers.last().unwrap()));
    assert!(!registry.is_default());
}

#[test]
pub fn install_same_provider_twice() {
    let registry = LocationProviderRegistry::new();
    let provider = constant_provider();
    registry.install(provider.clone());
    registry.install(provider.clone());
    assert!(Arc::ptr_eq(&registry.current(), &provider));
    // test + registry
    assert_eq!(Arc::strong_count(&provider), 2);
}

#[test]
pub fn replaced_provider_is_released_by_registry() {
    let registry = LocationProviderRegistry::new();
    let first = constant_provider();
    registry.install(first.clone());
    registry.install(constant_provider());
    assert_eq!(Arc::strong_count(&first), 1);
}

#[test]
pub fn current_keeps_provider_alive_after_replacement() {
    let registry = LocationProviderRegistry::new();
    registry.install(constant_provider());
    let retained = registry.current();
    registry.install(Arc::new(NoopLocationProvider::new()));
    assert_eq!(retained.name(), "constant");
    assert_eq!(Arc::strong_count(&retained), 1);
}

#[test]
pub fn try_install_without_provider_is_a_contract_violation() {
    let registry = LocationProviderRegistry::new();
    let provider = constant_provider();
    registry.install(provider.clone());

    let result = registry.try_install(None);

    assert!(matches!(result, Err(RegistryError::ContractViolation(_))));
    assert!(Arc::ptr_eq(&registry.current(), &provider));
}

#[test]
pub fn try_install_with_provider() {
    let registry = LocationProviderRegistry::new();
    let provider = constant_provider();
    assert_eq!(registry.try_install(Some(provider.clone())), Ok(()));
    assert!(Arc::ptr_eq(&registry.current(), &provider));
}

#[test]
pub fn reinstall_default_provider() {
    let registry = LocationProviderRegistry::with_provider(constant_provider());
    assert!(!registry.is_default());
    registry.install(registry.default_provider());
    assert!(registry.is_default());
}

#[test]
pub fn readers_observe_old_or_new_provider_during_install() {
    const READERS: usize = 8;
    const READS: usize = 1000;

    let registry = LocationProviderRegistry::new();
    let before = registry.current();
    let after = constant_provider();
    let barrier = Barrier::new(READERS + 1);

    std::thread::scope(|scope| {
        let readers: Vec<_> = (0..READERS)
            .map(|_| {
                scope.spawn(|| {
                    barrier.wait();
                    (0..READS)
                        .map(|_| registry.current())
                        .filter(|p| !Arc::ptr_eq(p, &before) && !Arc::ptr_eq(p, &after))
                        .count()
                })
            })
            .collect();
        barrier.wait();
        registry.install(after.clone());
        for reader in readers {
            assert_eq!(reader.join().expect("Reader thread panicked"), 0);
        }
    });
    assert!(Arc::ptr_eq(&registry.current(), &after));
}

#[test]
pub fn global_registry_is_shared() {
    let provider = constant_provider();
    LocationProviderRegistry::global().install(provider.clone());
    assert!(Arc::ptr_eq(
        &LocationProviderRegistry::global().current(),
        &provider
    ));
}

struct FixedLocationProvider {
    position: GnssPosition,
    updates: tokio::sync::watch::Sender<Option<GnssPosition>>,
}

impl DeviceLocationProvider for FixedLocationProvider {
    fn name(&self) -> &str {
        "fixed"
    }

    fn start(&self) -> Result<(), location_provider::ProviderError> {
        self.updates.send_replace(Some(self.position));
        Ok(())
    }

    fn stop(&self) {}

    fn is_running(&self) -> bool {
        true
    }

    fn last_location(&self) -> Option<GnssPosition> {
        Some(self.position)
    }

    fn subscribe(&self) -> tokio::sync::watch::Receiver<Option<GnssPosition>> {
        self.updates.subscribe()
    }
}

#[test]
pub fn host_defined_provider_can_be_installed() {
    let position = GnssPosition::now(48.137154, 11.576124, 0.0);
    let (updates, _) = tokio::sync::watch::channel(None);
    let registry = LocationProviderRegistry::new();
    registry.install(Arc::new(FixedLocationProvider { position, updates }));

    let current = registry.current();
    assert_eq!(current.name(), "fixed");
    assert_eq!(current.last_location(), Some(position));
    assert!(current.information().is_none());
}
