// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Common Modul for the location SDK
//!
//! Provides the value types that are shared between the location provider,
//! the telemetry consumer and the rendering facing types.

pub mod depth_range;
pub mod position;
pub mod serde;
