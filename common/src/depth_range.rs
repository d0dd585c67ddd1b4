// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use serde::{Deserialize, Serialize};

/// Depth range (min & max) used to render 3D content.
///
/// Both values conventionally range between 0 and 1. The bound is a
/// convention of the rendering pipeline and is not enforced here.
///
/// The value is immutable once created; the fields are only reachable
/// through the accessors.
///
/// # Example
///
/// ```rust
/// use common::depth_range::DepthRange;
///
/// let range = DepthRange::new(0.2, 0.8);
/// assert_eq!(range.min(), 0.2);
/// assert_eq!(range.max(), 0.8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DepthRange {
    min: f32,
    max: f32,
}

impl DepthRange {
    pub fn new(min: f32, max: f32) -> Self {
        DepthRange { min, max }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Minimum depth value.
    pub fn min(&self) -> f32 {
        self.min
    }

    /// Maximum depth value.
    pub fn max(&self) -> f32 {
        self.max
    }

    /// Returns `true` if `depth` lies within `[min, max]`.
    pub fn contains(&self, depth: f32) -> bool {
        depth >= self.min && depth <= self.max
    }
}
