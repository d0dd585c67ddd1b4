// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::ProviderError;
use common::position::{GnssInformation, GnssPosition};
use std::{future::Future, sync::Mutex};
use tokio::{sync::watch, task::JoinHandle};
use tracing::debug;

/// Latest values published by a provider.
///
/// The senders keep the last value even without any receiver, so
/// `last_location` works before anybody subscribed.
pub(crate) struct Updates {
    position: watch::Sender<Option<GnssPosition>>,
    information: watch::Sender<Option<GnssInformation>>,
}

impl Updates {
    pub fn new() -> Self {
        let (position, _) = watch::channel(None);
        let (information, _) = watch::channel(None);
        Updates {
            position,
            information,
        }
    }

    pub fn publish_position(&self, position: GnssPosition) {
        self.position.send_replace(Some(position));
    }

    pub fn publish_information(&self, information: GnssInformation) {
        self.information.send_replace(Some(information));
    }

    pub fn position(&self) -> Option<GnssPosition> {
        *self.position.borrow()
    }

    pub fn information(&self) -> Option<GnssInformation> {
        self.information.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<GnssPosition>> {
        self.position.subscribe()
    }
}

/// Holds the update task of a provider. The task is aborted on
/// [`abort`](Self::abort) and when the slot is dropped.
pub(crate) struct TaskSlot {
    handle: Mutex<Option<JoinHandle<()>>>,
}

impl TaskSlot {
    pub fn new() -> Self {
        TaskSlot {
            handle: Mutex::new(None),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .lock()
            .unwrap_or_else(|handle| handle.into_inner())
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Spawns `task` on the current tokio runtime unless a task is still
    /// running.
    pub fn spawn<F>(&self, task: F) -> Result<(), ProviderError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let mut slot = self
            .handle
            .lock()
            .unwrap_or_else(|handle| handle.into_inner());
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return Ok(());
        }
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| ProviderError::NoRuntime)?;
        *slot = Some(runtime.spawn(task));
        Ok(())
    }

    pub fn abort(&self) {
        let handle = self
            .handle
            .lock()
            .unwrap_or_else(|handle| handle.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for TaskSlot {
    fn drop(&mut self) {
        self.abort();
        debug!("Provider task slot dropped and update task aborted.");
    }
}
