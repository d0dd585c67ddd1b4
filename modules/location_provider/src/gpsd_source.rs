// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

use crate::{
    DeviceLocationProvider, ProviderError,
    task::{TaskSlot, Updates},
};
use common::position::{GnssInformation, GnssPosition, GnssStatus};
use futures::StreamExt;
use gpsd_proto::{Mode, Satellite, Sky, Tpv};
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{io::AsyncWriteExt, net::TcpStream, sync::watch};
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, error, info, warn};

/// Device location provider backed by a gpsd daemon.
///
/// Every start opens a new connection to the daemon, enables the JSON watch
/// mode and turns TPV messages into location updates and SKY messages into
/// satellite information.
pub struct GpsdLocationProvider {
    address: SocketAddr,
    updates: Arc<Updates>,
    task: TaskSlot,
}

impl GpsdLocationProvider {
    /// Creates a new, not yet connected, gpsd provider.
    ///
    /// # Arguments
    ///
    /// * `address` - The address of the gpsd daemon, e.g. `127.0.0.1:2947`.
    ///
    /// # Returns
    ///
    /// * `Err(ProviderError::InvalidAddress)` - If `address` is not a socket address.
    pub fn new(address: &str) -> Result<Self, ProviderError> {
        let address: SocketAddr = address.parse()?;
        Ok(GpsdLocationProvider {
            address,
            updates: Arc::new(Updates::new()),
            task: TaskSlot::new(),
        })
    }
}

impl DeviceLocationProvider for GpsdLocationProvider {
    fn name(&self) -> &str {
        "gpsd"
    }

    fn start(&self) -> Result<(), ProviderError> {
        let runtime = GpsdRuntime::new(self.updates.clone());
        self.task.spawn(gpsd_reader(self.address, runtime))
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

/// State of one gpsd connection.
struct GpsdRuntime {
    /// The fix status of the last TPV message
    mode: GnssStatus,
    /// The amount of satellites used for the fix
    sats: usize,
    updates: Arc<Updates>,
}

impl GpsdRuntime {
    fn new(updates: Arc<Updates>) -> Self {
        GpsdRuntime {
            mode: GnssStatus::Unknown,
            sats: 0,
            updates,
        }
    }

    fn process_tpv_msg(&mut self, tpv: &Tpv) {
        let Some(lat) = tpv.lat else { return };
        let Some(lon) = tpv.lon else { return };
        let Some(speed) = tpv.speed else { return };
        let Some(ref time) = tpv.time else { return };
        let Ok(datetime) = chrono::DateTime::<chrono::Utc>::from_str(time) else {
            warn!("Dropping TPV message with invalid time {}", time);
            return;
        };
        self.mode = convert_mode(&tpv.mode);
        self.updates
            .publish_information(GnssInformation::new(&self.mode, self.sats));
        self.updates.publish_position(GnssPosition::new(
            lat,
            lon,
            speed.into(),
            &datetime.time(),
            &datetime.date_naive(),
        ));
    }

    fn process_sky_msg(&mut self, sky: &Sky) {
        let Some(ref sat) = sky.satellites else {
            return;
        };
        self.sats = used_satellites(sat);
        self.updates
            .publish_information(GnssInformation::new(&self.mode, self.sats));
    }

    fn process_line(&mut self, line: &str) {
        if let Ok(tpv) = serde_json::from_str::<Tpv>(line) {
            self.process_tpv_msg(&tpv);
        } else if let Ok(sky) = serde_json::from_str::<Sky>(line) {
            self.process_sky_msg(&sky);
        } else {
            debug!("Ignoring gpsd message {}", line);
        }
    }
}

fn convert_mode(mode: &Mode) -> GnssStatus {
    match mode {
        Mode::NoFix => GnssStatus::NoFix,
        Mode::Fix2d => GnssStatus::Fix2d,
        Mode::Fix3d => GnssStatus::Fix3d,
    }
}

fn used_satellites(satellites: &[Satellite]) -> usize {
    satellites.iter().filter(|s| s.used).count()
}

async fn gpsd_reader(address: SocketAddr, mut runtime: GpsdRuntime) {
    let mut stream = match TcpStream::connect(address).await {
        Ok(stream) => stream,
        Err(e) => {
            error!("Failed to connect to gpsd at {}. Error: {}", address, e);
            return;
        }
    };
    if let Err(e) = stream
        .write_all(gpsd_proto::ENABLE_WATCH_CMD.as_bytes())
        .await
    {
        error!("Failed to enable gpsd watch mode. Error: {}", e);
        return;
    }
    info!("Connected to gpsd at {}", address);

    let mut framed = Framed::new(stream, LinesCodec::new());
    while let Some(result) = framed.next().await {
        match result {
            Ok(ref line) => runtime.process_line(line),
            Err(e) => error!("gpsd receive error {e:?}"),
        }
    }
    info!("gpsd at {} closed the connection", address);
}
