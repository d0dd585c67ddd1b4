// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    DeviceLocationProvider, ProviderError,
    task::{TaskSlot, Updates},
};
use common::position::{GnssInformation, GnssPosition, GnssStatus, Position};
use std::{sync::Arc, time::Duration};
use tokio::sync::watch;
use tracing::{debug, warn};
use utm::{lat_lon_to_zone_number, lat_to_zone_letter, to_utm_wgs84, wsg84_utm_to_lat_lon};

/// Satellites reported by the constant provider together with a 3D fix.
const SATELLITES: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct UtmPoint {
    northing: f64,
    easting: f64,
    zone: u8,
    zone_letter: char,
}

#[derive(Debug)]
struct Track {
    points: Vec<UtmPoint>,
    velocity: f64,
    interval: Duration,
}

/// A mock location provider that travels along a list of track points.
///
/// On every interval the provider reports its current position and then
/// moves `velocity * interval` meters towards the next track point. After
/// the last point it continues with the first one.
///
/// The first reported position is the first track point.
pub struct ConstantLocationProvider {
    track: Arc<Track>,
    updates: Arc<Updates>,
    task: TaskSlot,
}

impl ConstantLocationProvider {
    /// Creates a new ConstantLocationProvider
    ///
    /// # Arguments
    ///
    /// * `positions` - The track points the provider travels along
    /// * `velocity` - The constant velocity in m/s, also reported with every position
    /// * `interval` - The time between two reported positions
    ///
    /// # Returns
    ///
    /// * `Ok(ConstantLocationProvider)` - The created provider, not yet started
    /// * `Err(ProviderError)` - If `positions` is empty, `velocity` is negative,
    ///   `interval` is zero or a position can't be projected to UTM
    pub fn new(
        positions: &[Position],
        velocity: f64,
        interval: Duration,
    ) -> Result<Self, ProviderError> {
        if positions.is_empty() {
            return Err(ProviderError::InvalidConfig(
                "positions parameter is empty".to_string(),
            ));
        }
        if !velocity.is_finite() || velocity < 0.0 {
            return Err(ProviderError::InvalidConfig(format!(
                "velocity {velocity} is not a positive number"
            )));
        }
        if interval.is_zero() {
            return Err(ProviderError::InvalidConfig(
                "position interval must not be zero".to_string(),
            ));
        }
        let points = convert_track_points(positions)?;
        Ok(ConstantLocationProvider {
            track: Arc::new(Track {
                points,
                velocity,
                interval,
            }),
            updates: Arc::new(Updates::new()),
            task: TaskSlot::new(),
        })
    }
}

impl DeviceLocationProvider for ConstantLocationProvider {
    fn name(&self) -> &str {
        "constant"
    }

    fn start(&self) -> Result<(), ProviderError> {
        let track = self.track.clone();
        let updates = self.updates.clone();
        self.task.spawn(constant_position_task(track, updates))?;
        self.updates
            .publish_information(GnssInformation::new(&GnssStatus::Fix3d, SATELLITES));
        Ok(())
    }

    fn stop(&self) {
        self.task.abort();
    }

    fn is_running(&self) -> bool {
        self.task.is_running()
    }

    fn last_location(&self) -> Option<GnssPosition> {
        self.updates.position()
    }

    fn subscribe(&self) -> watch::Receiver<Option<GnssPosition>> {
        self.updates.subscribe()
    }

    fn information(&self) -> Option<GnssInformation> {
        self.updates.information()
    }
}

struct ConstantPositionRuntime {
    track: Arc<Track>,
    current: UtmPoint,
    next_point: usize,
}

impl ConstantPositionRuntime {
    fn new(track: Arc<Track>) -> Self {
        let current = track.points[0];
        let next_point = 1 % track.points.len();
        ConstantPositionRuntime {
            track,
            current,
            next_point,
        }
    }

    fn position(&self) -> Option<GnssPosition> {
        let Ok((latitude, longitude)) = wsg84_utm_to_lat_lon(
            self.current.easting,
            self.current.northing,
            self.current.zone,
            self.current.zone_letter,
        ) else {
            warn!("Failed to convert {:?} to latitude and longitude", self.current);
            return None;
        };
        Some(GnssPosition::now(latitude, longitude, self.track.velocity))
    }

    /// Moves the current point `velocity * interval` meters along the track.
    fn advance(&mut self) {
        let mut remaining = self.track.velocity * self.track.interval.as_secs_f64();
        // A single tick never passes more than every track point once.
        for _ in 0..self.track.points.len() {
            if remaining <= 0.0 {
                break;
            }
            let target = self.track.points[self.next_point];
            let delta_north = target.northing - self.current.northing;
            let delta_east = target.easting - self.current.easting;
            let distance = (delta_north * delta_north + delta_east * delta_east).sqrt();
            if distance <= remaining {
                self.current = target;
                remaining -= distance;
                self.next_point = (self.next_point + 1) % self.track.points.len();
            } else {
                self.current.northing += delta_north / distance * remaining;
                self.current.easting += delta_east / distance * remaining;
                remaining = 0.0;
            }
        }
    }
}

/// Projects all track points into the UTM zone of the first point, so the
/// eastings of a track crossing a zone border stay comparable.
fn convert_track_points(positions: &[Position]) -> Result<Vec<UtmPoint>, ProviderError> {
    let Some(first) = positions.first() else {
        return Ok(Vec::new());
    };
    let zone = lat_lon_to_zone_number(first.latitude, first.longitude);
    let zone_letter = zone_letter_of(first)?;
    positions
        .iter()
        .map(|pos| -> Result<UtmPoint, ProviderError> {
            zone_letter_of(pos)?;
            let (northing, easting, _) = to_utm_wgs84(pos.latitude, pos.longitude, zone);
            Ok(UtmPoint {
                northing,
                easting,
                zone,
                zone_letter,
            })
        })
        .collect()
}

fn zone_letter_of(pos: &Position) -> Result<char, ProviderError> {
    lat_to_zone_letter(pos.latitude).ok_or(ProviderError::Projection {
        latitude: pos.latitude,
        longitude: pos.longitude,
    })
}

async fn constant_position_task(track: Arc<Track>, updates: Arc<Updates>) {
    let mut timer = tokio::time::interval(track.interval);
    let mut runtime = ConstantPositionRuntime::new(track);
    loop {
        timer.tick().await;
        if let Some(position) = runtime.position() {
            debug!("Constant provider reports {:?}", position);
            updates.publish_position(position);
        }
        runtime.advance();
    }
}
