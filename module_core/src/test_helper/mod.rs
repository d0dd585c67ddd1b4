// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{Event, EventBus, EventKind, EventKindType};
use tokio::{sync::broadcast::error::RecvError, time::timeout};
use tracing::debug;

/// Sends a quit signal to a running module and waits for it to stop gracefully.
///
/// Publishes a [`QuitEvent`](EventKind::QuitEvent) through `event_bus` and
/// waits up to 100ms for the module task behind `handle` to finish.
///
/// # Panics
/// This function panics if:
/// - The module does not stop within the timeout.
/// - The task returns an error (`Err(())`).
pub async fn stop_module(
    event_bus: &EventBus,
    handle: &mut tokio::task::JoinHandle<Result<(), ()>>,
) {
    event_bus.publish(&Event {
        kind: EventKind::QuitEvent,
    });
    timeout(std::time::Duration::from_millis(100), handle)
        .await
        .expect("Module doesn't handle quit event in timeout")
        .expect("Module task panicked")
        .expect("Module returned an error");
}

/// Waits for an [`Event`] of type `exp_event` on `rx` within `duration`.
///
/// The total waiting time is divided into ten polling steps so that events
/// of other types do not consume the whole budget of a single receive call.
///
/// # Panics
///
/// Panics if no matching event is received within `duration`.
pub async fn wait_for_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    exp_event: EventKindType,
) -> Event {
    let step_duration = duration / 10;
    for _ in 0..10 {
        if let Ok(Ok(event)) = timeout(step_duration, rx.recv()).await {
            if event.event_type() == exp_event {
                return event;
            }
            debug!("Skipping event {:?} while waiting for {:?}", event, exp_event);
        }
    }
    panic!("Failed to receive event of type {:?}", exp_event);
}

/// Asserts that no event of type `unexp_event` arrives on `rx` within
/// `duration`.
///
/// # Panics
///
/// Panics as soon as a matching event is received.
pub async fn expect_no_event(
    rx: &mut tokio::sync::broadcast::Receiver<Event>,
    duration: std::time::Duration,
    unexp_event: EventKindType,
) {
    let deadline = tokio::time::Instant::now() + duration;
    loop {
        match tokio::time::timeout_at(deadline, rx.recv()).await {
            Ok(Ok(event)) => {
                if event.event_type() == unexp_event {
                    panic!("Received unexpected event {:?}", event);
                }
            }
            Ok(Err(RecvError::Lagged(skipped))) => {
                debug!("expect_no_event lagged behind by {skipped} events");
            }
            Ok(Err(RecvError::Closed)) | Err(_) => return,
        }
    }
}
