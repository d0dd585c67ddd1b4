// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use common::position::{GnssInformation, GnssStatus, Position};
use location_provider::{
    ConstantLocationProvider, DeviceLocationProvider, LocationProviderPtr,
    LocationProviderRegistry,
};
use location_telemetry::LocationTelemetry;
use module_core::{
    EventBus, EventKind, EventKindType, Module, payload_ref,
    test_helper::{expect_no_event, stop_module, wait_for_event},
};
use std::{sync::Arc, time::Duration};

const SAMPLE_INTERVAL: Duration = Duration::from_millis(10);
const TIMEOUT: Duration = Duration::from_millis(200);

fn started_provider(latitude: f64, longitude: f64) -> LocationProviderPtr {
    let provider = ConstantLocationProvider::new(
        &[Position::new(&latitude, &longitude)],
        0.0,
        Duration::from_millis(10),
    )
    .expect("Failed to create constant provider");
    provider.start().expect("Failed to start constant provider");
    Arc::new(provider)
}

fn start_module(
    eb: &EventBus,
    registry: Arc<LocationProviderRegistry>,
) -> tokio::task::JoinHandle<Result<(), ()>> {
    let mut telemetry = LocationTelemetry::new(eb.context(), registry, SAMPLE_INTERVAL);
    tokio::spawn(async move { telemetry.run().await })
}

async fn wait_for_latitude(eb: &EventBus, latitude: f64) {
    let mut receiver = eb.subscribe();
    for _ in 0..20 {
        let event = wait_for_event(&mut receiver, TIMEOUT, EventKindType::GnssPositionEvent).await;
        let position = payload_ref!(event.kind, EventKind::GnssPositionEvent).unwrap();
        if (position.latitude() - latitude).abs() < 1e-6 {
            return;
        }
    }
    panic!("No position with latitude {latitude} published");
}

#[test_log::test(tokio::test)]
async fn publish_location_of_installed_provider() {
    let eb = EventBus::default();
    let registry = Arc::new(LocationProviderRegistry::new());
    registry.install(started_provider(52.026649, 11.282535));
    let mut handle = start_module(&eb, registry);

    wait_for_latitude(&eb, 52.026649).await;

    stop_module(&eb, &mut handle).await;
}

#[test_log::test(tokio::test)]
async fn publish_unchanged_location_once() {
    let eb = EventBus::default();
    let registry = Arc::new(LocationProviderRegistry::new());
    registry.install(started_provider(52.026649, 11.282535));
    let mut receiver = eb.subscribe();
    let mut handle = start_module(&eb, registry);

    wait_for_event(&mut receiver, TIMEOUT, EventKindType::GnssPositionEvent).await;
    expect_no_event(
        &mut receiver,
        Duration::from_millis(50),
        EventKindType::GnssPositionEvent,
    )
    .await;

    stop_module(&eb, &mut handle).await;
}

#[test_log::test(tokio::test)]
async fn publish_information_of_installed_provider() {
    let eb = EventBus::default();
    let registry = Arc::new(LocationProviderRegistry::new());
    registry.install(started_provider(52.026649, 11.282535));
    let mut receiver = eb.subscribe();
    let mut handle = start_module(&eb, registry);

    let event = wait_for_event(&mut receiver, TIMEOUT, EventKindType::GnssInformationEvent).await;
    assert_eq!(
        **payload_ref!(event.kind, EventKind::GnssInformationEvent).unwrap(),
        GnssInformation::new(&GnssStatus::Fix3d, 8)
    );

    stop_module(&eb, &mut handle).await;
}

#[test_log::test(tokio::test)]
async fn follow_provider_installed_while_running() {
    let eb = EventBus::default();
    let registry = Arc::new(LocationProviderRegistry::new());
    registry.install(started_provider(52.026649, 11.282535));
    let mut handle = start_module(&eb, registry.clone());
    wait_for_latitude(&eb, 52.026649).await;

    registry.install(started_provider(48.137154, 11.576124));

    wait_for_latitude(&eb, 48.137154).await;
    stop_module(&eb, &mut handle).await;
}

#[test_log::test(tokio::test)]
async fn no_location_from_default_provider() {
    let eb = EventBus::default();
    let registry = Arc::new(LocationProviderRegistry::new());
    let mut receiver = eb.subscribe();
    let mut handle = start_module(&eb, registry);

    expect_no_event(
        &mut receiver,
        Duration::from_millis(50),
        EventKindType::GnssPositionEvent,
    )
    .await;

    stop_module(&eb, &mut handle).await;
}

#[test_log::test(tokio::test)]
async fn reject_zero_sample_interval() {
    let eb = EventBus::default();
    let registry = Arc::new(LocationProviderRegistry::new());
    let mut telemetry = LocationTelemetry::new(eb.context(), registry, Duration::ZERO);
    assert!(telemetry.run().await.is_err());
}
