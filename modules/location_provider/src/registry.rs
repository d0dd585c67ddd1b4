// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{LocationProviderPtr, NoopLocationProvider};
use arc_swap::ArcSwap;
use std::sync::{Arc, LazyLock};
use thiserror::Error;
use tracing::{debug, info};

static GLOBAL_REGISTRY: LazyLock<LocationProviderRegistry> =
    LazyLock::new(LocationProviderRegistry::new);

/// Errors reported by the [`LocationProviderRegistry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The caller broke the install contract, e.g. handed over no provider.
    #[error("Location provider contract violation: {0}")]
    ContractViolation(&'static str),
}

/// Holds the single active [`DeviceLocationProvider`](crate::DeviceLocationProvider).
///
/// The registry is always bound: it starts with a [`NoopLocationProvider`]
/// and every [`install`](Self::install) replaces the binding. There is no way
/// back to an unbound state.
///
/// [`install`](Self::install) and [`current`](Self::current) swap and load an
/// immutable handle atomically, so a reader racing an install sees either
/// the old or the new provider and never blocks.
///
/// # Example
///
/// ```rust
/// use location_provider::{LocationProviderRegistry, NoopLocationProvider};
/// use std::sync::Arc;
///
/// let registry = LocationProviderRegistry::new();
/// let provider = Arc::new(NoopLocationProvider::new());
/// registry.install(provider.clone());
/// assert_eq!(registry.current().name(), "noop");
/// ```
pub struct LocationProviderRegistry {
    current: ArcSwap<LocationProviderPtr>,
    default: LocationProviderPtr,
}

impl LocationProviderRegistry {
    /// Creates a registry bound to a [`NoopLocationProvider`].
    pub fn new() -> Self {
        let default: LocationProviderPtr = Arc::new(NoopLocationProvider::new());
        LocationProviderRegistry {
            current: ArcSwap::from_pointee(default.clone()),
            default,
        }
    }

    /// Creates a registry that is bound to `provider` from the start.
    pub fn with_provider(provider: LocationProviderPtr) -> Self {
        let registry = Self::new();
        registry.install(provider);
        registry
    }

    /// The process wide registry.
    ///
    /// Prefer passing an own [`LocationProviderRegistry`] to the consumers;
    /// the global instance exists for hosts that can't do that.
    pub fn global() -> &'static LocationProviderRegistry {
        &GLOBAL_REGISTRY
    }

    /// Replaces the active provider with `provider`.
    ///
    /// The registry drops its handle to the previous provider. The previous
    /// provider is not stopped, its update loop belongs to whoever created it.
    /// Installing the already active provider keeps it bound.
    pub fn install(&self, provider: LocationProviderPtr) {
        let previous = self.current.swap(Arc::new(provider.clone()));
        if Arc::ptr_eq(&*previous, &provider) {
            debug!("Location provider {} is already installed", provider.name());
        } else {
            info!(
                "Installed location provider {}, replacing {}",
                provider.name(),
                previous.name()
            );
        }
    }

    /// Replaces the active provider if one is given.
    ///
    /// This is the entry point for hosts that hand over an optional handle.
    /// `None` fails with [`RegistryError::ContractViolation`] and leaves the
    /// current binding untouched.
    pub fn try_install(
        &self,
        provider: Option<LocationProviderPtr>,
    ) -> Result<(), RegistryError> {
        let Some(provider) = provider else {
            return Err(RegistryError::ContractViolation(
                "no location provider given to install",
            ));
        };
        self.install(provider);
        Ok(())
    }

    /// Returns the active provider.
    ///
    /// The returned handle stays valid for as long as the caller holds it,
    /// independent of later installs. Consumers that need the latest binding
    /// must call `current` again instead of caching the handle.
    pub fn current(&self) -> LocationProviderPtr {
        let current = self.current.load();
        Arc::clone(&**current)
    }

    /// `true` while no provider has been installed, or the built in default
    /// has been installed again.
    pub fn is_default(&self) -> bool {
        Arc::ptr_eq(&**self.current.load(), &self.default)
    }

    /// The built in provider the registry starts with.
    pub fn default_provider(&self) -> LocationProviderPtr {
        self.default.clone()
    }
}

impl Default for LocationProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for LocationProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocationProviderRegistry")
            .field("current", &self.current.load().name())
            .field("is_default", &self.is_default())
            .finish()
    }
}
