// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::serde::{date, time};
use chrono::{NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

/// A geographical coordinate in decimal degrees.
///
/// Latitude ranges from -90.0 to 90.0 and longitude from -180.0 to 180.0.
/// Used as a plain track point, e.g. for the points a mock location
/// provider travels along.
///
/// # Example
///
/// ```rust
/// use common::position::Position;
///
/// let pos = Position::new(&52.5200, &13.4050);
/// assert_eq!(pos.latitude, 52.5200);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    /// Creates a new [`Position`] with the given latitude and longitude.
    pub fn new(latitude: &f64, longitude: &f64) -> Self {
        Position {
            latitude: *latitude,
            longitude: *longitude,
        }
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// A location update as reported by a device location provider.
///
/// Stores latitude, longitude, velocity and the UTC timestamp of the fix.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GnssPosition {
    latitude: f64,
    longitude: f64,
    velocity: f64,
    #[serde(with = "time")]
    time: NaiveTime,
    #[serde(with = "date")]
    date: NaiveDate,
}

impl GnssPosition {
    /// Creates a new [`GnssPosition`].
    ///
    /// # Arguments
    ///
    /// * `latitude` – Latitude in decimal degrees. Positive for northern hemisphere.
    /// * `longitude` – Longitude in decimal degrees. Positive for eastern hemisphere.
    /// * `velocity` – Speed in meters per second.
    /// * `time` – UTC time of the fix.
    /// * `date` – UTC date of the fix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use common::position::GnssPosition;
    ///
    /// let now = chrono::Utc::now();
    /// let pos = GnssPosition::new(52.0, 13.0, 15.5, &now.time(), &now.date_naive());
    /// assert_eq!(pos.velocity(), 15.5);
    /// ```
    pub fn new(
        latitude: f64,
        longitude: f64,
        velocity: f64,
        time: &NaiveTime,
        date: &NaiveDate,
    ) -> GnssPosition {
        GnssPosition {
            latitude,
            longitude,
            velocity,
            time: *time,
            date: *date,
        }
    }

    /// Creates a [`GnssPosition`] stamped with the current UTC time.
    pub fn now(latitude: f64, longitude: f64, velocity: f64) -> GnssPosition {
        let now = Utc::now();
        GnssPosition::new(
            latitude,
            longitude,
            velocity,
            &now.time(),
            &now.date_naive(),
        )
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Returns the latitude in decimal degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Returns the longitude in decimal degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns the velocity in meters per second.
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    pub fn time(&self) -> NaiveTime {
        self.time
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns `true` when both positions describe the same coordinate and
    /// velocity, ignoring the timestamp.
    pub fn same_fix(&self, other: &GnssPosition) -> bool {
        self.latitude == other.latitude
            && self.longitude == other.longitude
            && self.velocity == other.velocity
    }
}

/// The fix status of a location source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GnssStatus {
    /// The status of the receiver is unknown
    Unknown,
    /// No fix, reported positions may be wrong
    NoFix,
    /// Only latitude and longitude are valid
    Fix2d,
    /// Latitude, longitude and altitude are valid
    Fix3d,
}

/// Receiver information: the fix status and the amount of satellites used
/// for the reported positions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GnssInformation {
    pub status: GnssStatus,
    pub satellites: usize,
}

impl GnssInformation {
    pub fn new(status: &GnssStatus, satellites: usize) -> GnssInformation {
        GnssInformation {
            status: *status,
            satellites,
        }
    }
}
